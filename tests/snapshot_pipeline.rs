//! Integration tests for the aggregation pipeline: resolver, derivation
//! and assembly wired together the way the engine wires them, driven by
//! pre-fetched values instead of live upstreams.

use riyalbot_backend::engine::snapshot::{assemble, ListingSets, ResolvedRates};
use riyalbot_backend::engine::{derive, p2p, resolver};
use riyalbot_backend::models::{EngineConfig, PriceSource, TradeSide};
use riyalbot_backend::scrapers::binance_p2p::{Adv, Advertiser, RawAdvert};

fn empty_listings() -> ListingSets {
    ListingSets {
        indo_buy: Vec::new(),
        indo_sell: Vec::new(),
        saudi_buy: Vec::new(),
        saudi_sell: Vec::new(),
    }
}

/// Fiat provider answers 750000, the primary ticker answers 242000, every
/// other upstream is down.
#[test]
fn degraded_upstreams_still_produce_derived_values() {
    let cfg = EngineConfig::default();

    let sar = resolver::resolve_scalar(&[
        (PriceSource::ExchangeRateApi, Some(750_000.0)),
        (PriceSource::OpenErApi, None),
    ]);
    let spot = resolver::resolve_scalar(&[
        (PriceSource::BinanceMe, Some(242_000.0)),
        (PriceSource::BinanceGlobal, None),
        (PriceSource::Indodax, None),
    ]);

    assert_eq!(sar.source, PriceSource::ExchangeRateApi);
    assert_eq!(spot.source, PriceSource::BinanceMe);

    let net = derive::net_price(spot.raw, &cfg);
    assert!((net - 242_537.8).abs() < 0.1);

    let sim = derive::divisor_matrix(sar.raw, &cfg);
    assert_eq!(sim.len(), cfg.cuts.len() * cfg.divisors.len());
    let first = &sim[0];
    let expected = ((750_000.0 - 5.0) / 3.78) * (1.0 + cfg.fee_percent / 100.0);
    assert!((first.value - expected).abs() < 1e-6);

    let profit = derive::profit_rows(sar.raw, net, &cfg);
    assert_eq!(profit.len(), cfg.capital_amounts.len());

    let snapshot = assemble(
        ResolvedRates {
            sar,
            google_sar: 750_000.0,
            xe_sar: 0.0,
            spot,
            indodax: 0.0,
            pintu: 0.0,
        },
        net,
        sim,
        profit,
        empty_listings(),
        &cfg,
    );

    assert_eq!(snapshot.tko_raw, 242_000.0);
    assert!((snapshot.tko_net - 242_537.8).abs() < 0.1);
    assert_eq!(snapshot.osl_raw, 242_000.0);
    assert_eq!(snapshot.xe_sar, 0.0);
}

/// Every upstream fails: the snapshot is structurally complete with
/// sentinel fields and empty sequences, and it still serializes.
#[test]
fn total_failure_produces_a_complete_sentinel_snapshot() {
    let cfg = EngineConfig::default();

    let sar = resolver::resolve_scalar(&[
        (PriceSource::ExchangeRateApi, None),
        (PriceSource::OpenErApi, None),
    ]);
    let spot = resolver::resolve_scalar(&[
        (PriceSource::BinanceMe, None),
        (PriceSource::BinanceGlobal, None),
        (PriceSource::Indodax, None),
    ]);

    let net = derive::net_price(spot.raw, &cfg);
    let sim = derive::divisor_matrix(sar.raw, &cfg);
    let profit = derive::profit_rows(sar.raw, net, &cfg);

    assert_eq!(net, 0.0);
    assert!(sim.is_empty());
    assert!(profit.is_empty());

    let snapshot = assemble(
        ResolvedRates {
            sar,
            google_sar: 0.0,
            xe_sar: 0.0,
            spot,
            indodax: 0.0,
            pintu: 0.0,
        },
        net,
        sim,
        profit,
        empty_listings(),
        &cfg,
    );

    assert_eq!(snapshot.google_sar, 0.0);
    assert_eq!(snapshot.tko_net, 0.0);
    assert!(snapshot.sim_div.is_empty());
    assert!(snapshot.profit_sim.is_empty());
    assert!(!snapshot.time.is_empty());

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["tko_raw"].as_f64().unwrap(), 0.0);
    assert_eq!(json["sim_div"].as_array().unwrap().len(), 0);
}

/// Identical inputs produce identical outputs apart from the timestamp.
#[test]
fn snapshots_are_idempotent_up_to_timestamp() {
    let cfg = EngineConfig::default();

    let build = || {
        let sar = resolver::resolve_scalar(&[(PriceSource::ExchangeRateApi, Some(4_345.0))]);
        let spot = resolver::resolve_scalar(&[(PriceSource::BinanceMe, Some(16_250.0))]);
        let net = derive::net_price(spot.raw, &cfg);
        assemble(
            ResolvedRates {
                sar,
                google_sar: 4_345.0,
                xe_sar: 4_343.5,
                spot,
                indodax: 16_240.0,
                pintu: 16_255.0,
            },
            net,
            derive::divisor_matrix(sar.raw, &cfg),
            derive::profit_rows(sar.raw, net, &cfg),
            empty_listings(),
            &cfg,
        )
    };

    let mut a = serde_json::to_value(build()).unwrap();
    let mut b = serde_json::to_value(build()).unwrap();
    for key in ["time", "date"] {
        a.as_object_mut().unwrap().remove(key);
        b.as_object_mut().unwrap().remove(key);
    }
    assert_eq!(a, b);
}

/// The refinement stage applies the per-currency thresholds the engine
/// passes in from its config.
#[test]
fn listing_refinement_respects_engine_config_thresholds() {
    let cfg = EngineConfig::default();

    let advert = |cap: f64| RawAdvert {
        adv: Adv {
            price: 4_330.0,
            dynamic_max_single_trans_amount: cap,
            max_single_trans_amount: 0.0,
            advertiser_no: Some("1001".to_string()),
        },
        advertiser: Advertiser {
            nick_name: "SaudiRemit".to_string(),
            user_no: None,
            user_type: Some("merchant".to_string()),
            user_identity: None,
        },
    };

    let filter = p2p::ListingFilter {
        fiat: "SAR",
        side: TradeSide::Sell,
        min_volume: cfg.min_p2p_volume("SAR"),
        require_verified: cfg.p2p_require_verified,
        max_results: cfg.p2p_max_results,
    };

    let kept = p2p::refine_listings(vec![advert(15_000.0), advert(5_000.0)], &filter);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].max_volume, 15_000.0);
    assert!(kept[0].trade_url.contains("/trade/sell/USDT"));
    assert!(kept[0].trade_url.contains("fiat=SAR"));
}
