//! USDT/IDR spot tickers from centralized exchanges.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::lenient_f64;

const BINANCE_ME_URL: &str = "https://api.binance.me/api/v3/ticker/price?symbol=USDTIDR";
const BINANCE_GLOBAL_URL: &str = "https://api.binance.com/api/v3/ticker/price?symbol=USDTBIDR";
const INDODAX_URL: &str = "https://indodax.com/api/ticker/usdtidr";
const PINTU_URL: &str = "https://api.pintu.co.id/v2/trade/price-changes";

const PINTU_PAIR: &str = "usdt/idr";

/// `{"symbol":"USDTIDR","price":"16250.00"}`
#[derive(Debug, Deserialize)]
struct BinanceTicker {
    #[serde(default, deserialize_with = "lenient_f64")]
    price: f64,
}

/// `{"ticker":{"last":"16240"}}`
#[derive(Debug, Deserialize)]
struct IndodaxResponse {
    #[serde(default)]
    ticker: IndodaxTicker,
}

#[derive(Debug, Default, Deserialize)]
struct IndodaxTicker {
    #[serde(default, deserialize_with = "lenient_f64")]
    last: f64,
}

/// `{"payload":[{"pair":"usdt/idr","latestPrice":"16255"}, ...]}`
#[derive(Debug, Deserialize)]
struct PintuResponse {
    #[serde(default)]
    payload: Vec<PintuPriceChange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PintuPriceChange {
    #[serde(default)]
    pair: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    latest_price: f64,
}

#[derive(Debug, Clone)]
pub struct SpotTickerScraper {
    client: Client,
}

impl SpotTickerScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Primary USDT/IDR ticker (Binance Indonesia / Tokocrypto).
    pub async fn fetch_binance_me(&self) -> Option<f64> {
        let body: BinanceTicker = self.get_json(BINANCE_ME_URL).await?;
        nonzero(body.price)
    }

    /// Global mirror of the same quote, used when binance.me is blocked.
    pub async fn fetch_binance_global(&self) -> Option<f64> {
        let body: BinanceTicker = self.get_json(BINANCE_GLOBAL_URL).await?;
        nonzero(body.price)
    }

    pub async fn fetch_indodax(&self) -> Option<f64> {
        let body: IndodaxResponse = self.get_json(INDODAX_URL).await?;
        nonzero(body.ticker.last)
    }

    pub async fn fetch_pintu(&self) -> Option<f64> {
        let body: PintuResponse = self.get_json(PINTU_URL).await?;
        pintu_usdt_idr(&body)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Option<T> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "spot ticker request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(url, status = %response.status(), "spot ticker returned non-2xx");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "spot ticker body decode failed");
                None
            }
        }
    }
}

fn nonzero(value: f64) -> Option<f64> {
    if value > 0.0 {
        Some(value)
    } else {
        debug!("spot ticker returned zero/absent price");
        None
    }
}

fn pintu_usdt_idr(body: &PintuResponse) -> Option<f64> {
    body.payload
        .iter()
        .find(|item| item.pair == PINTU_PAIR)
        .and_then(|item| nonzero(item.latest_price))
}
