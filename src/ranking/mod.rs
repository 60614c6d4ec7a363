pub mod composite;
pub mod normalize;
pub mod range_cache;

use self::composite::composite_score;
use self::range_cache::{RangeCache, ALL_GROUPS};
use crate::model::{DrillSchema, Player, RankedPlayer, WeightVector};
use std::cmp::Ordering;

/// Scores and ranks a competitor snapshot. Owns the range cache, which is
/// shared across calls for the engine's lifetime.
pub struct RankingEngine {
    cache: RangeCache,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingEngine {
    pub fn new() -> Self {
        Self {
            cache: RangeCache::default(),
        }
    }

    pub fn with_cache(cache: RangeCache) -> Self {
        Self { cache }
    }

    /// Ranks each age group independently: ranges are scoped to the group,
    /// ranks restart at 1 per group, and groups are concatenated in order
    /// of first appearance. Players with no measurable drill are omitted.
    pub fn rank_within_groups(
        &mut self,
        players: &[Player],
        drills: &[DrillSchema],
        weights: &WeightVector,
    ) -> Vec<RankedPlayer> {
        let mut group_order: Vec<&str> = Vec::new();
        for p in players {
            let g = p.group_key();
            if !group_order.contains(&g) {
                group_order.push(g);
            }
        }

        let mut out = Vec::new();
        for group in group_order {
            out.extend(self.rank_partition(players, group, drills, weights));
        }
        out
    }

    /// One global partition: ranges span every player and a single rank
    /// sequence compares across age groups.
    pub fn rank_across_all(
        &mut self,
        players: &[Player],
        drills: &[DrillSchema],
        weights: &WeightVector,
    ) -> Vec<RankedPlayer> {
        self.rank_partition(players, ALL_GROUPS, drills, weights)
    }

    /// Drops cached ranges. For callers that know the underlying dataset
    /// changed materially.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    fn rank_partition(
        &mut self,
        players: &[Player],
        partition: &str,
        drills: &[DrillSchema],
        weights: &WeightVector,
    ) -> Vec<RankedPlayer> {
        let ranges = self.cache.ranges(players, partition, drills);

        let mut scored: Vec<RankedPlayer> = players
            .iter()
            .filter(|p| partition == ALL_GROUPS || p.group_key() == partition)
            .filter(|p| p.has_any_result(drills))
            .map(|p| RankedPlayer {
                player: p.clone(),
                composite_score: composite_score(p, &ranges, weights, drills),
                rank: 0,
            })
            .collect();

        // Stable sort: tied scores keep input order, so repeated calls with
        // identical input produce identical orderings.
        scored.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(Ordering::Equal)
        });

        for (i, entry) in scored.iter_mut().enumerate() {
            entry.rank = (i + 1) as u32;
        }
        scored
    }
}
