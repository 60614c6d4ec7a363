use super::range_cache::DrillRange;

/// Rescales a raw drill value to [0,100] against the partition's range.
///
/// A degenerate range (everyone tied) yields exactly 50 so ties neither
/// reward nor penalize. Values outside a schema-fixed range pass through
/// unclamped; the result can leave [0,100] and that is intentional.
///
/// Callers must not invoke this without a valid range and numeric raw;
/// missing data contributes 0 at the composite level instead.
#[inline]
pub fn normalize(raw: f64, range: DrillRange, lower_is_better: bool) -> f64 {
    if range.max == range.min {
        return 50.0;
    }
    if lower_is_better {
        ((range.max - raw) / (range.max - range.min)) * 100.0
    } else {
        ((raw - range.min) / (range.max - range.min)) * 100.0
    }
}
