use crate::reports;
use clap::Args;
use drillrank::error::{DrResult, DrillRankError};
use drillrank::loader::{load_drills_from_file, load_players_from_file};
use drillrank::presets::builtin_presets;
use drillrank::ranking::RankingEngine;
use drillrank::weights::{JsonFileStore, WeightManager};
use std::str::FromStr;
use std::time::Instant;
use strum_macros::{Display, EnumString};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum RankMode {
    WithinGroups,
    AcrossAll,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Player roster CSV (id,name,age_group,<drill keys...>)
    #[arg(short, long, default_value = "data/players.csv")]
    pub players: String,

    /// Drill schema JSON
    #[arg(short, long, default_value = "data/drills.json")]
    pub drills: String,

    /// within_groups or across_all
    #[arg(short, long, default_value = "within_groups")]
    pub mode: String,

    /// Apply a named preset before ranking
    #[arg(long)]
    pub preset: Option<String>,

    /// Directory holding the persisted weight record
    #[arg(long, default_value = "data/weights")]
    pub store: String,

    /// One-off weight overrides, e.g. --set 40m_dash=80
    #[arg(long = "set", value_name = "KEY=PCT")]
    pub overrides: Vec<String>,
}

pub fn run(args: RankArgs) -> DrResult<()> {
    let mode = RankMode::from_str(&args.mode).map_err(|_| {
        DrillRankError::Validation(format!(
            "Unknown mode '{}' (expected within_groups or across_all)",
            args.mode
        ))
    })?;

    info!("📂 Loading drills: {}", args.drills);
    let drills = load_drills_from_file(&args.drills)?;

    info!("📂 Loading players: {}", args.players);
    let players = load_players_from_file(&args.players)?;
    info!("   {} players, {} drills", players.len(), drills.len());

    let store = JsonFileStore::new(&args.store);
    let mut manager = WeightManager::new(store, &drills, builtin_presets());

    if let Some(name) = &args.preset {
        if manager.apply_preset(name) {
            info!("⚖️  Applied preset '{}'", name);
        }
    }

    for pair in &args.overrides {
        match parse_override(pair) {
            Some((key, value)) => manager.set_weight(&key, value, Instant::now()),
            None => warn!("⚠️  Ignoring malformed override '{}'", pair),
        }
    }
    if manager.has_pending_commit() {
        manager.commit_edit();
    }

    let mut engine = RankingEngine::new();
    let ranked = match mode {
        RankMode::WithinGroups => {
            engine.rank_within_groups(&players, &drills, manager.persisted())
        }
        RankMode::AcrossAll => engine.rank_across_all(&players, &drills, manager.persisted()),
    };

    if ranked.is_empty() {
        warn!("⚠️  No rankable players (no numeric drill results found)");
        return Ok(());
    }

    reports::print_ranking_table(&ranked, &drills, mode == RankMode::WithinGroups);
    match manager.active_preset() {
        Some(p) => info!("Weights: preset '{}'", p),
        None => info!("Weights: custom"),
    }
    Ok(())
}

fn parse_override(pair: &str) -> Option<(String, f64)> {
    let (key, value) = pair.split_once('=')?;
    let value: f64 = value.trim().parse().ok()?;
    Some((key.trim().to_string(), value))
}
