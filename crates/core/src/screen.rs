use crate::domain::snapshot::StockSnapshot;
use std::cmp::Ordering;

/// Only snapshots priced strictly below this are shown.
pub const PRICE_CEILING: f64 = 50.0;

/// Keeps snapshots under [`PRICE_CEILING`] and orders them by score, highest first.
///
/// The sort is stable, so equal scores keep their input order. The input is left untouched.
pub fn screen(universe: &[StockSnapshot]) -> Vec<StockSnapshot> {
    let mut picks: Vec<StockSnapshot> = universe
        .iter()
        .filter(|s| s.price < PRICE_CEILING)
        .cloned()
        .collect();
    picks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    picks
}

pub fn best_pick(picks: &[StockSnapshot]) -> Option<&StockSnapshot> {
    picks.first()
}
