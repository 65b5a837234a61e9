//! Binance P2P advertisement search.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::lenient_f64;
use crate::models::TradeSide;

const P2P_SEARCH_URL: &str = "https://p2p.binance.com/bapi/c2c/v2/friendly/c2c/adv/search";
const SEARCH_ROWS: u32 = 30;

#[derive(Debug, Deserialize)]
struct AdvSearchResponse {
    #[serde(default)]
    data: Vec<RawAdvert>,
}

/// One raw `{adv, advertiser}` record as returned by the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAdvert {
    #[serde(default)]
    pub adv: Adv,
    #[serde(default)]
    pub advertiser: Advertiser,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adv {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    /// Per-transaction cap adjusted for remaining inventory.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dynamic_max_single_trans_amount: f64,
    /// Static per-transaction cap declared by the advertiser.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_single_trans_amount: f64,
    #[serde(default)]
    pub advertiser_no: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    #[serde(default)]
    pub nick_name: String,
    #[serde(default)]
    pub user_no: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub user_identity: Option<String>,
}

#[derive(Debug, Clone)]
pub struct P2PScraper {
    client: Client,
}

impl P2PScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search advertisements for one `(fiat, side)` pair. Any failure
    /// degrades to an empty vector; upstream ordering is preserved.
    pub async fn search(&self, fiat: &str, side: TradeSide) -> Vec<RawAdvert> {
        let payload = json!({
            "asset": "USDT",
            "fiat": fiat,
            "merchantCheck": true,
            "page": 1,
            "rows": SEARCH_ROWS,
            "tradeType": side.api_value(),
        });

        let response = match self
            .client
            .post(P2P_SEARCH_URL)
            .header("User-Agent", "Mozilla/5.0")
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(fiat, side = side.api_value(), error = %e, "p2p search request failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                fiat,
                side = side.api_value(),
                status = %response.status(),
                "p2p search returned non-2xx"
            );
            return Vec::new();
        }

        match response.json::<AdvSearchResponse>().await {
            Ok(body) => body.data,
            Err(e) => {
                warn!(fiat, side = side.api_value(), error = %e, "p2p search body decode failed");
                Vec::new()
            }
        }
    }
}
