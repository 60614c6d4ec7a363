use super::normalize::normalize;
use super::range_cache::DrillRange;
use crate::model::{DrillSchema, Player, WeightVector};
use std::collections::HashMap;

/// Weighted sum of normalized per-drill scores for one player.
///
/// Drills the player never measured, and drills with no range in this
/// partition, are skipped. A key missing from the weight vector weighs 0.
/// The sum has no upper bound: weights are independent sliders, so a
/// player excelling on many heavily-weighted drills can exceed 100.
pub fn composite_score(
    player: &Player,
    ranges: &HashMap<String, DrillRange>,
    weights: &WeightVector,
    drills: &[DrillSchema],
) -> f64 {
    let mut total = 0.0;
    for drill in drills {
        let raw = match player.drill_value(&drill.key) {
            Some(v) => v,
            None => continue,
        };
        let range = match ranges.get(&drill.key) {
            Some(r) => *r,
            None => continue,
        };
        let weight = weights.get(&drill.key).copied().unwrap_or(0.0);
        total += normalize(raw, range, drill.lower_is_better) * (weight / 100.0);
    }
    total
}
