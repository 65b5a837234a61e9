//! Fallback resolution across equivalent sources.
//!
//! All candidate fetches for one quantity are issued concurrently by the
//! engine; resolution is then a pure pick over the completed results.
//! Priority is strict: the first candidate with a usable value wins even
//! if a later candidate also answered.

use crate::models::{PriceSource, SpotPrice};

/// Return the first candidate with a positive value, in the given order.
/// All-failed resolves to the `0.0` sentinel, never an error.
pub fn resolve_scalar(candidates: &[(PriceSource, Option<f64>)]) -> SpotPrice {
    for (source, value) in candidates {
        if let Some(v) = value {
            if *v > 0.0 {
                return SpotPrice {
                    raw: *v,
                    source: *source,
                };
            }
        }
    }
    SpotPrice::unavailable()
}
