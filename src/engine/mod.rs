//! Market data aggregation engine.
//!
//! One invocation = one snapshot: fire every upstream fetch concurrently,
//! resolve fallback chains over the completed results, run the pure
//! derivations, and assemble. Cycles share no state and nothing here is
//! fatal; a snapshot is always structurally complete, degraded fields
//! carry the `0.0` sentinel.

pub mod derive;
pub mod p2p;
pub mod resolver;
pub mod snapshot;

use reqwest::Client;
use tracing::info;

use crate::models::{EngineConfig, MarketSnapshot, PriceSource, TradeSide};
use crate::scrapers::{FiatRateScraper, P2PScraper, SpotTickerScraper};

use p2p::ListingFilter;
use snapshot::{ListingSets, ResolvedRates};

pub struct MarketEngine {
    cfg: EngineConfig,
    fiat: FiatRateScraper,
    spot: SpotTickerScraper,
    p2p: P2PScraper,
}

impl MarketEngine {
    pub fn new(client: Client, cfg: EngineConfig) -> Self {
        Self {
            cfg,
            fiat: FiatRateScraper::new(client.clone()),
            spot: SpotTickerScraper::new(client.clone()),
            p2p: P2PScraper::new(client),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Build one point-in-time snapshot. Total wall clock is bounded by
    /// the slowest single upstream call, not their sum.
    pub async fn build_snapshot(&self) -> MarketSnapshot {
        let (
            google_sar,
            xe_sar,
            binance_me,
            binance_global,
            indodax,
            pintu,
            raw_indo_buy,
            raw_indo_sell,
            raw_saudi_buy,
            raw_saudi_sell,
        ) = tokio::join!(
            self.fiat.fetch_exchangerate_api(),
            self.fiat.fetch_open_er_api(),
            self.spot.fetch_binance_me(),
            self.spot.fetch_binance_global(),
            self.spot.fetch_indodax(),
            self.spot.fetch_pintu(),
            self.p2p.search("IDR", TradeSide::Buy),
            self.p2p.search("IDR", TradeSide::Sell),
            self.p2p.search("SAR", TradeSide::Buy),
            self.p2p.search("SAR", TradeSide::Sell),
        );

        // Strict-priority fallback chains over the completed fetches.
        let sar = resolver::resolve_scalar(&[
            (PriceSource::ExchangeRateApi, google_sar),
            (PriceSource::OpenErApi, xe_sar),
        ]);
        let spot = resolver::resolve_scalar(&[
            (PriceSource::BinanceMe, binance_me),
            (PriceSource::BinanceGlobal, binance_global),
            (PriceSource::Indodax, indodax),
        ]);

        let net = derive::net_price(spot.raw, &self.cfg);
        let sim_div = derive::divisor_matrix(sar.raw, &self.cfg);
        let profit_sim = derive::profit_rows(sar.raw, net, &self.cfg);

        let listings = ListingSets {
            indo_buy: p2p::refine_listings(raw_indo_buy, &self.listing_filter("IDR", TradeSide::Buy)),
            indo_sell: p2p::refine_listings(
                raw_indo_sell,
                &self.listing_filter("IDR", TradeSide::Sell),
            ),
            saudi_buy: p2p::refine_listings(
                raw_saudi_buy,
                &self.listing_filter("SAR", TradeSide::Buy),
            ),
            saudi_sell: p2p::refine_listings(
                raw_saudi_sell,
                &self.listing_filter("SAR", TradeSide::Sell),
            ),
        };

        let rates = ResolvedRates {
            sar,
            google_sar: google_sar.unwrap_or(0.0),
            xe_sar: xe_sar.unwrap_or(0.0),
            spot,
            indodax: indodax.unwrap_or(0.0),
            pintu: pintu.unwrap_or(0.0),
        };

        info!(
            sar_rate = rates.sar.raw,
            sar_source = rates.sar.source.as_str(),
            spot_price = rates.spot.raw,
            spot_source = rates.spot.source.as_str(),
            "snapshot assembled"
        );

        snapshot::assemble(rates, net, sim_div, profit_sim, listings, &self.cfg)
    }

    fn listing_filter<'a>(&'a self, fiat: &'a str, side: TradeSide) -> ListingFilter<'a> {
        ListingFilter {
            fiat,
            side,
            min_volume: self.cfg.min_p2p_volume(fiat),
            require_verified: self.cfg.p2p_require_verified,
            max_results: self.cfg.p2p_max_results,
        }
    }
}
