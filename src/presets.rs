use crate::model::WeightVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named evaluation philosophy. Weights are fractions in [0,1] and are
/// not required to sum to 1; `as_percentages` converts to the WeightVector
/// convention.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub weights: BTreeMap<String, f64>,
}

impl Preset {
    pub fn as_percentages(&self) -> WeightVector {
        self.weights
            .iter()
            .map(|(k, v)| (k.clone(), v * 100.0))
            .collect()
    }
}

fn preset(name: &str, description: &str, weights: &[(&str, f64)]) -> Preset {
    Preset {
        name: name.to_string(),
        description: description.to_string(),
        weights: weights
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
    }
}

/// The shipped preset table over the standard combine drill keys.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        preset(
            "balanced",
            "Equal importance across every drill",
            &[
                ("40m_dash", 0.5),
                ("vertical_jump", 0.5),
                ("agility_5_10_5", 0.5),
                ("passing", 0.5),
                ("dribbling", 0.5),
                ("shooting", 0.5),
            ],
        ),
        preset(
            "athleticism",
            "Speed and explosiveness first, ball work second",
            &[
                ("40m_dash", 0.9),
                ("vertical_jump", 0.8),
                ("agility_5_10_5", 0.8),
                ("passing", 0.3),
                ("dribbling", 0.3),
                ("shooting", 0.3),
            ],
        ),
        preset(
            "technical",
            "Ball mastery first, raw athleticism second",
            &[
                ("40m_dash", 0.3),
                ("vertical_jump", 0.2),
                ("agility_5_10_5", 0.4),
                ("passing", 0.9),
                ("dribbling", 0.9),
                ("shooting", 0.8),
            ],
        ),
    ]
}

pub fn find_preset<'a>(presets: &'a [Preset], name: &str) -> Option<&'a Preset> {
    presets.iter().find(|p| p.name == name)
}
