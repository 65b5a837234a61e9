//! Shared domain types for the SAR→IDR market monitor.

use serde::{Deserialize, Serialize};

/// Which upstream finally answered for a resolved quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    BinanceMe,
    BinanceGlobal,
    Indodax,
    Pintu,
    ExchangeRateApi,
    OpenErApi,
    Unavailable,
}

impl PriceSource {
    pub fn as_str(&self) -> &str {
        match self {
            PriceSource::BinanceMe => "binance_me",
            PriceSource::BinanceGlobal => "binance_global",
            PriceSource::Indodax => "indodax",
            PriceSource::Pintu => "pintu",
            PriceSource::ExchangeRateApi => "exchangerate_api",
            PriceSource::OpenErApi => "open_er_api",
            PriceSource::Unavailable => "unavailable",
        }
    }
}

/// A spot price after fallback resolution. `raw == 0.0` means every
/// candidate source failed this cycle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpotPrice {
    pub raw: f64,
    pub source: PriceSource,
}

impl SpotPrice {
    pub fn unavailable() -> Self {
        Self {
            raw: 0.0,
            source: PriceSource::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        self.raw > 0.0
    }
}

/// Trade side on the P2P marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Value expected by the marketplace search endpoint.
    pub fn api_value(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }

    /// Path segment used in public trade links.
    pub fn url_segment(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

/// One advertisement that survived the P2P pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct P2PListing {
    pub advertiser_name: String,
    pub price: f64,
    pub max_volume: f64,
    pub verified: bool,
    pub trade_url: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimParams {
    pub cut: f64,
    pub divisor: f64,
}

/// One row of the divisor-simulation matrix.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRow {
    pub label: String,
    pub value: f64,
    pub params: SimParams,
}

/// Projected profit for one capital amount at the reference divisor.
#[derive(Debug, Clone, Serialize)]
pub struct ProfitRow {
    pub capital_amount: f64,
    pub projected_gain: f64,
    pub roi_percent: f64,
}

/// The aggregate snapshot handed unchanged to the JSON endpoint and the
/// broadcast formatter. Built fresh per request/cycle, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub time: String,
    pub date: String,
    pub google_sar: f64,
    pub xe_sar: f64,
    pub sar_source: PriceSource,
    pub tko_raw: f64,
    pub tko_net: f64,
    pub spot_source: PriceSource,
    pub indodax_raw: f64,
    pub pintu_raw: f64,
    pub osl_raw: f64,
    pub fee_percent: f64,
    pub sim_div: Vec<SimulationRow>,
    pub profit_sim: Vec<ProfitRow>,
    pub p2p_indo_buy: Vec<P2PListing>,
    pub p2p_indo_sell: Vec<P2PListing>,
    pub p2p_saudi_buy: Vec<P2PListing>,
    pub p2p_saudi_sell: Vec<P2PListing>,
}

/// Fixed engine constants. Built once at startup and passed in, so tests
/// can override thresholds without touching globals.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Exchange fee in percent, applied on top of the raw spot price.
    pub fee_percent: f64,
    /// Divisor used for the profit estimate rows.
    pub reference_divisor: f64,
    pub cuts: Vec<f64>,
    pub divisors: Vec<f64>,
    pub capital_amounts: Vec<f64>,
    pub min_p2p_volume_idr: f64,
    pub min_p2p_volume_sar: f64,
    pub p2p_max_results: usize,
    pub p2p_require_verified: bool,
    pub broadcast_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee_percent: 0.2222,
            reference_divisor: 3.79,
            cuts: vec![5.0, 10.0, 15.0],
            divisors: vec![3.78, 3.79, 3.80, 3.81, 3.82],
            capital_amounts: vec![20_000.0, 50_000.0, 100_000.0, 200_000.0, 500_000.0],
            min_p2p_volume_idr: 50_000_000.0,
            min_p2p_volume_sar: 12_000.0,
            p2p_max_results: 10,
            p2p_require_verified: true,
            broadcast_interval_secs: 180,
        }
    }
}

impl EngineConfig {
    /// Minimum advertised per-transaction volume for a fiat currency.
    pub fn min_p2p_volume(&self, fiat: &str) -> f64 {
        if fiat == "IDR" {
            self.min_p2p_volume_idr
        } else {
            self.min_p2p_volume_sar
        }
    }
}

/// Deployment configuration (ports, paths, bot credentials). Engine
/// constants intentionally live in [`EngineConfig`] instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub telegram_token: Option<String>,
    pub admin_chat_id: Option<i64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./riyalbot_members.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let telegram_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let admin_chat_id = std::env::var("ADMIN_CHAT_ID")
            .ok()
            .and_then(|v| v.parse::<i64>().ok());

        Ok(Self {
            database_path,
            port,
            telegram_token,
            admin_chat_id,
        })
    }
}
