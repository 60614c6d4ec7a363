use crate::model::{DrillSchema, Player};
use fnv::FnvHasher;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hasher;
use std::sync::Arc;
use tracing::debug;

/// Partition key that selects the whole population.
pub const ALL_GROUPS: &str = "ALL";

/// Entries allowed before the oldest half is evicted.
pub const CACHE_CEILING: usize = 50;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DrillRange {
    pub min: f64,
    pub max: f64,
}

/// Strategy for reducing the competitor data relevant to range computation
/// into a cache-key component. Any change to ids or drill values must
/// change the fingerprint, or the cache will serve stale ranges.
pub trait Fingerprint {
    fn fingerprint(&self, players: &[Player], drills: &[DrillSchema]) -> u64;
}

/// Default strategy: FNV over player ids and the bit patterns of every
/// numeric drill value (absent values hash as a marker so "removed" and
/// "zero" stay distinct).
pub struct FnvFingerprint;

impl Fingerprint for FnvFingerprint {
    fn fingerprint(&self, players: &[Player], drills: &[DrillSchema]) -> u64 {
        let mut hasher = FnvHasher::default();
        for p in players {
            hasher.write(p.id.as_bytes());
            for d in drills {
                match p.drill_value(&d.key) {
                    Some(v) => hasher.write_u64(v.to_bits()),
                    None => hasher.write_u8(0xFF),
                }
            }
        }
        hasher.finish()
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
struct CacheKey {
    partition: String,
    data_fingerprint: u64,
    drill_keys: u64,
}

/// Memoizes per-drill [min,max] per partition. Bounded FIFO: when the entry
/// count exceeds the ceiling the oldest half is dropped (hit value is
/// short-lived, so LRU bookkeeping is not worth it).
pub struct RangeCache {
    entries: Vec<(CacheKey, Arc<HashMap<String, DrillRange>>)>,
    ceiling: usize,
    fingerprinter: Box<dyn Fingerprint + Send + Sync>,
}

impl Default for RangeCache {
    fn default() -> Self {
        Self::new(CACHE_CEILING, Box::new(FnvFingerprint))
    }
}

impl RangeCache {
    pub fn new(ceiling: usize, fingerprinter: Box<dyn Fingerprint + Send + Sync>) -> Self {
        Self {
            entries: Vec::new(),
            ceiling,
            fingerprinter,
        }
    }

    /// Per-drill ranges for one partition. `ALL` selects every player;
    /// any other key filters on age group. Only players with at least one
    /// numeric drill value enter the scan. Drills with a schema-fixed
    /// min and max skip the scan; drills with zero observed values are
    /// omitted from the map.
    pub fn ranges(
        &mut self,
        players: &[Player],
        partition: &str,
        drills: &[DrillSchema],
    ) -> Arc<HashMap<String, DrillRange>> {
        let key = CacheKey {
            partition: partition.to_string(),
            data_fingerprint: self.fingerprinter.fingerprint(players, drills),
            drill_keys: hash_drill_keys(drills),
        };

        if let Some((_, ranges)) = self.entries.iter().find(|(k, _)| *k == key) {
            debug!("Range cache hit for partition '{}'", partition);
            return Arc::clone(ranges);
        }

        debug!("Range cache miss for partition '{}'", partition);
        let ranges = Arc::new(compute_ranges(players, partition, drills));
        self.entries.push((key, Arc::clone(&ranges)));

        if self.entries.len() > self.ceiling {
            let evict = self.ceiling / 2;
            self.entries.drain(..evict);
            debug!("Range cache evicted {} oldest entries", evict);
        }

        ranges
    }

    /// Drops everything. For callers that know the competitor dataset
    /// changed materially and want recomputation without waiting on
    /// fingerprint misses to age old entries out.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn hash_drill_keys(drills: &[DrillSchema]) -> u64 {
    let mut hasher = FnvHasher::default();
    for d in drills {
        hasher.write(d.key.as_bytes());
        // Fixed bounds change the result without a data scan, so they
        // belong in the key too.
        hasher.write_u64(d.min.map_or(0, f64::to_bits));
        hasher.write_u64(d.max.map_or(0, f64::to_bits));
    }
    hasher.finish()
}

fn compute_ranges(
    players: &[Player],
    partition: &str,
    drills: &[DrillSchema],
) -> HashMap<String, DrillRange> {
    let eligible: Vec<&Player> = players
        .iter()
        .filter(|p| partition == ALL_GROUPS || p.group_key() == partition)
        .filter(|p| p.has_any_result(drills))
        .collect();

    let mut ranges = HashMap::new();
    for drill in drills {
        if let Some(fixed) = drill.fixed_range() {
            ranges.insert(drill.key.clone(), fixed);
            continue;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut found = false;
        for p in &eligible {
            if let Some(v) = p.drill_value(&drill.key) {
                min = min.min(v);
                max = max.max(v);
                found = true;
            }
        }
        if found {
            ranges.insert(drill.key.clone(), DrillRange { min, max });
        }
    }
    ranges
}
