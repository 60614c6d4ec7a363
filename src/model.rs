use crate::error::{DrResult, DrillRankError};
use crate::ranking::range_cache::DrillRange;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Partition key assigned to players that carry no age group.
pub const UNKNOWN_GROUP: &str = "unknown";

/// Importance per drill key, as percentages in [0,100]. Values are
/// independent sliders and are not required to sum to 100.
pub type WeightVector = BTreeMap<String, f64>;

/// One measured event. `lower_is_better` must be explicit per drill;
/// directionality is never inferred from the key name.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DrillSchema {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub lower_is_better: bool,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub default_weight: Option<f64>,
}

impl DrillSchema {
    /// Schema-authoritative range, present only when BOTH bounds are fixed.
    pub fn fixed_range(&self) -> Option<DrillRange> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(DrillRange { min, max }),
            _ => None,
        }
    }

    /// Default weight normalized to the percentage convention.
    /// Values at or below 1.0 are read as fractions; missing means 50.
    pub fn default_weight_pct(&self) -> f64 {
        match self.default_weight {
            Some(w) if w <= 1.0 => w * 100.0,
            Some(w) => w,
            None => 50.0,
        }
    }
}

/// Duplicate keys poison range lookup and weight addressing, so a schema
/// list is rejected up front.
pub fn validate_drills(drills: &[DrillSchema]) -> DrResult<()> {
    let mut seen = HashSet::new();
    for d in drills {
        if !seen.insert(d.key.as_str()) {
            return Err(DrillRankError::Validation(format!(
                "Duplicate drill key '{}'",
                d.key
            )));
        }
    }
    Ok(())
}

/// One competitor. Drill results are kept as raw JSON values; anything
/// non-numeric is treated as "not measured".
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub results: BTreeMap<String, Value>,
}

impl Player {
    /// Numeric result for a drill, or None for absent/null/non-numeric.
    pub fn drill_value(&self, key: &str) -> Option<f64> {
        self.results.get(key).and_then(Value::as_f64)
    }

    /// A player with no numeric value for any drill cannot be scored and
    /// is excluded from range computation and ranking entirely.
    pub fn has_any_result(&self, drills: &[DrillSchema]) -> bool {
        drills.iter().any(|d| self.drill_value(&d.key).is_some())
    }

    pub fn group_key(&self) -> &str {
        self.age_group.as_deref().unwrap_or(UNKNOWN_GROUP)
    }
}

/// Ranking output: the original player plus score and rank. Inputs are
/// never mutated; this is a fresh value.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub composite_score: f64,
    pub rank: u32,
}
