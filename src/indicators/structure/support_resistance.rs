//! Support and Resistance levels detection
//!
//! A point is a local extremum when it strictly beats both neighbors on each
//! side within a fixed 5-point symmetric window. Series shorter than the
//! window yield empty results, never an error.

use crate::models::{ExtremaLevel, PricePoint};
use std::cmp::Ordering;

const WINDOW_RADIUS: usize = 2;

/// Find every local support level (strict local minimum on `low`), in scan
/// order.
pub fn find_support_levels(series: &[PricePoint]) -> Vec<ExtremaLevel> {
    scan(series, |candidate, neighbor| candidate.low < neighbor.low)
        .map(|p| ExtremaLevel::support(p.low, p.datetime.clone()))
        .collect()
}

/// Find every local resistance level (strict local maximum on `high`), in scan
/// order.
pub fn find_resistance_levels(series: &[PricePoint]) -> Vec<ExtremaLevel> {
    scan(series, |candidate, neighbor| candidate.high > neighbor.high)
        .map(|p| ExtremaLevel::resistance(p.high, p.datetime.clone()))
        .collect()
}

/// The single lowest support level, or `None` when no point qualifies.
///
/// Ties on price resolve to the lexically lowest datetime, matching
/// `(price, datetime)` tuple order.
pub fn global_support(series: &[PricePoint]) -> Option<ExtremaLevel> {
    find_support_levels(series)
        .into_iter()
        .min_by(compare_by_price_then_datetime)
}

/// The single highest resistance level, or `None` when no point qualifies.
///
/// Ties on price resolve to the lexically highest datetime.
pub fn global_resistance(series: &[PricePoint]) -> Option<ExtremaLevel> {
    find_resistance_levels(series)
        .into_iter()
        .max_by(compare_by_price_then_datetime)
}

fn compare_by_price_then_datetime(a: &ExtremaLevel, b: &ExtremaLevel) -> Ordering {
    a.price
        .partial_cmp(&b.price)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.datetime.cmp(&b.datetime))
}

/// Walk indices 2..len-2 and yield points that strictly beat all four
/// neighbors under `beats`.
fn scan<'a>(
    series: &'a [PricePoint],
    beats: impl Fn(&PricePoint, &PricePoint) -> bool + 'a,
) -> impl Iterator<Item = &'a PricePoint> + 'a {
    let upper = series.len().saturating_sub(WINDOW_RADIUS);
    (WINDOW_RADIUS..upper).filter_map(move |i| {
        let candidate = &series[i];
        let qualifies = (1..=WINDOW_RADIUS)
            .all(|d| beats(candidate, &series[i - d]) && beats(candidate, &series[i + d]));
        qualifies.then_some(candidate)
    })
}
