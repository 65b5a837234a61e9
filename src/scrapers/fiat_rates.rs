//! Fiat SAR/IDR exchange-rate providers.
//!
//! Two independent free APIs with the same logical output; the engine's
//! fallback resolver decides which one wins.

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

const EXCHANGERATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest/SAR";
const OPEN_ER_API_URL: &str = "https://open.er-api.com/v6/latest/SAR";

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

impl RatesResponse {
    fn idr(&self) -> Option<f64> {
        self.rates.get("IDR").copied().filter(|v| *v > 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct FiatRateScraper {
    client: Client,
}

impl FiatRateScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// SAR→IDR from exchangerate-api.com (the "Google rate" in reports).
    pub async fn fetch_exchangerate_api(&self) -> Option<f64> {
        self.fetch_rates(EXCHANGERATE_API_URL).await
    }

    /// SAR→IDR from open.er-api.com (the "XE rate" in reports).
    pub async fn fetch_open_er_api(&self) -> Option<f64> {
        self.fetch_rates(OPEN_ER_API_URL).await
    }

    async fn fetch_rates(&self, url: &str) -> Option<f64> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "fiat rate request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(url, status = %response.status(), "fiat rate provider returned non-2xx");
            return None;
        }

        match response.json::<RatesResponse>().await {
            Ok(body) => body.idr(),
            Err(e) => {
                warn!(url, error = %e, "fiat rate body decode failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rates_map() {
        let body: RatesResponse =
            serde_json::from_str(r#"{"provider":"x","rates":{"IDR":4345.1,"USD":0.27}}"#).unwrap();
        assert_eq!(body.idr(), Some(4345.1));
    }

    #[test]
    fn missing_or_zero_idr_is_unavailable() {
        let body: RatesResponse = serde_json::from_str(r#"{"rates":{"USD":0.27}}"#).unwrap();
        assert_eq!(body.idr(), None);

        let body: RatesResponse = serde_json::from_str(r#"{"rates":{"IDR":0.0}}"#).unwrap();
        assert_eq!(body.idr(), None);

        let body: RatesResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(body.idr(), None);
    }
}
