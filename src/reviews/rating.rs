//! Rating aggregation
//!
//! Pure arithmetic over a restaurant's review set. The stored
//! `average_rating`/`review_count` pair is always the output of this
//! function over the full current set, never an incremental adjustment.

use rust_decimal::{Decimal, RoundingStrategy};

/// Compute the aggregate for a set of restaurant ratings
///
/// Returns `(average rounded to one decimal place, count)`. An empty set
/// yields `(0, 0)`, the state a restaurant starts in.
pub fn aggregate(ratings: &[u8]) -> (Decimal, u64) {
    if ratings.is_empty() {
        return (Decimal::ZERO, 0);
    }
    let sum: Decimal = ratings.iter().map(|r| Decimal::from(*r)).sum();
    let count = ratings.len() as u64;
    let average =
        (sum / Decimal::from(count)).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    (average, count)
}
