//! Upstream data sources.
//!
//! Each scraper performs a single timeout-bounded HTTP call and decodes a
//! known JSON shape. A failing source never surfaces an error to the
//! engine: scalar fetchers return `None`, the listing fetcher returns an
//! empty vector, and the caller maps that to the `0.0` sentinel.

pub mod binance_p2p;
pub mod fiat_rates;
pub mod spot_tickers;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use binance_p2p::P2PScraper;
pub use fiat_rates::FiatRateScraper;
pub use spot_tickers::SpotTickerScraper;

/// Per-call timeout for every upstream request.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Upstreams quote numbers inconsistently (`"242000.00"` vs `242000`).
/// Anything unparseable decodes to `0.0`, the unavailable sentinel.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

pub(crate) fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_to_f64_accepts_numbers_and_strings() {
        assert_eq!(value_to_f64(&json!(242000.5)), 242000.5);
        assert_eq!(value_to_f64(&json!("242000.5")), 242000.5);
        assert_eq!(value_to_f64(&json!(" 16250 ")), 16250.0);
    }

    #[test]
    fn value_to_f64_degrades_to_zero() {
        assert_eq!(value_to_f64(&json!(null)), 0.0);
        assert_eq!(value_to_f64(&json!("not a number")), 0.0);
        assert_eq!(value_to_f64(&json!({"nested": 1})), 0.0);
    }
}
