//! Snapshot assembly. Pure composition plus a WIB (UTC+7) timestamp;
//! assembly itself cannot fail.

use chrono::{DateTime, FixedOffset, Utc};

use crate::models::{EngineConfig, MarketSnapshot, P2PListing, ProfitRow, SimulationRow, SpotPrice};

const WIB_OFFSET_SECS: i32 = 7 * 3600;

/// Resolved scalar inputs for one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRates {
    pub sar: SpotPrice,
    pub google_sar: f64,
    pub xe_sar: f64,
    pub spot: SpotPrice,
    pub indodax: f64,
    pub pintu: f64,
}

#[derive(Debug, Clone)]
pub struct ListingSets {
    pub indo_buy: Vec<P2PListing>,
    pub indo_sell: Vec<P2PListing>,
    pub saudi_buy: Vec<P2PListing>,
    pub saudi_sell: Vec<P2PListing>,
}

pub fn assemble(
    rates: ResolvedRates,
    net_price: f64,
    sim_div: Vec<SimulationRow>,
    profit_sim: Vec<ProfitRow>,
    listings: ListingSets,
    cfg: &EngineConfig,
) -> MarketSnapshot {
    assemble_at(rates, net_price, sim_div, profit_sim, listings, cfg, Utc::now())
}

fn assemble_at(
    rates: ResolvedRates,
    net_price: f64,
    sim_div: Vec<SimulationRow>,
    profit_sim: Vec<ProfitRow>,
    listings: ListingSets,
    cfg: &EngineConfig,
    now: DateTime<Utc>,
) -> MarketSnapshot {
    let wib = now.with_timezone(&wib_offset());

    MarketSnapshot {
        time: wib.format("%H:%M:%S").to_string(),
        date: wib.format("%d/%m/%Y").to_string(),
        google_sar: rates.google_sar,
        xe_sar: rates.xe_sar,
        sar_source: rates.sar.source,
        tko_raw: rates.spot.raw,
        tko_net: net_price,
        spot_source: rates.spot.source,
        indodax_raw: rates.indodax,
        pintu_raw: rates.pintu,
        // No public OSL feed exists; the resolved spot price stands in.
        osl_raw: rates.spot.raw,
        fee_percent: cfg.fee_percent,
        sim_div,
        profit_sim,
        p2p_indo_buy: listings.indo_buy,
        p2p_indo_sell: listings.indo_sell,
        p2p_saudi_buy: listings.saudi_buy,
        p2p_saudi_sell: listings.saudi_sell,
    }
}

fn wib_offset() -> FixedOffset {
    FixedOffset::east_opt(WIB_OFFSET_SECS).expect("UTC+7 is a valid offset")
}
