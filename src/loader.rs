use crate::error::{DrResult, DrillRankError};
use crate::model::{validate_drills, DrillSchema, Player};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const ID_COLUMN: &str = "id";
const NAME_COLUMN: &str = "name";
const GROUP_COLUMN: &str = "age_group";
const UPDATED_COLUMN: &str = "updated_at";

/// Reads players from CSV. The header row names the reserved columns
/// (`id`, `name`, `age_group`, `updated_at`) in any order; every other
/// header is a drill key. Empty or non-numeric drill cells become absent
/// values, and rows without an id are skipped with a count, never an
/// error.
pub fn load_players<R: Read>(reader: R) -> DrResult<Vec<Player>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if !headers.iter().any(|h| h == ID_COLUMN) {
        return Err(DrillRankError::Validation(
            "Player CSV is missing an 'id' column".to_string(),
        ));
    }

    let mut players = Vec::new();
    let mut skipped_count = 0;

    for result in rdr.records() {
        let rec = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping unreadable player row: {}", e);
                skipped_count += 1;
                continue;
            }
        };

        let mut id = String::new();
        let mut name = String::new();
        let mut age_group = None;
        let mut updated_at = None;
        let mut results = BTreeMap::new();

        for (header, cell) in headers.iter().zip(rec.iter()) {
            let cell = cell.trim();
            match header.as_str() {
                ID_COLUMN => id = cell.to_string(),
                NAME_COLUMN => name = cell.to_string(),
                GROUP_COLUMN => {
                    if !cell.is_empty() {
                        age_group = Some(cell.to_string());
                    }
                }
                UPDATED_COLUMN => {
                    if !cell.is_empty() {
                        updated_at = Some(cell.to_string());
                    }
                }
                _ => {
                    if let Ok(v) = cell.parse::<f64>() {
                        if let Some(n) = serde_json::Number::from_f64(v) {
                            results.insert(header.clone(), Value::Number(n));
                        }
                    }
                }
            }
        }

        if id.is_empty() {
            skipped_count += 1;
            continue;
        }

        players.push(Player {
            id,
            name,
            age_group,
            updated_at,
            results,
        });
    }

    if skipped_count > 0 {
        debug!("Skipped {} invalid player rows", skipped_count);
    }

    Ok(players)
}

pub fn load_players_from_file<P: AsRef<Path>>(path: P) -> DrResult<Vec<Player>> {
    load_players(File::open(path)?)
}

/// Reads a drill schema list from a JSON array and rejects duplicate keys.
pub fn load_drills<R: Read>(mut reader: R) -> DrResult<Vec<DrillSchema>> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    let drills: Vec<DrillSchema> = serde_json::from_str(&raw)?;
    validate_drills(&drills)?;
    Ok(drills)
}

pub fn load_drills_from_file<P: AsRef<Path>>(path: P) -> DrResult<Vec<DrillSchema>> {
    load_drills(File::open(path)?)
}
