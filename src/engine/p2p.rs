//! P2P listing refinement: volume filter, verification filter, bounded
//! truncation, trade-link construction. Upstream ordering is preserved
//! (the search endpoint returns best-price-first).

use reqwest::Url;
use tracing::debug;

use crate::models::{P2PListing, TradeSide};
use crate::scrapers::binance_p2p::{Advertiser, RawAdvert};

const NAME_MAX_CHARS: usize = 12;

/// Filter parameters for one `(fiat, side)` pipeline run.
#[derive(Debug, Clone)]
pub struct ListingFilter<'a> {
    pub fiat: &'a str,
    pub side: TradeSide,
    pub min_volume: f64,
    pub require_verified: bool,
    pub max_results: usize,
}

/// Refine raw adverts into presentable listings. An empty input and an
/// all-filtered input both produce an empty vector; callers must not
/// distinguish the two.
pub fn refine_listings(raw: Vec<RawAdvert>, filter: &ListingFilter<'_>) -> Vec<P2PListing> {
    let total = raw.len();
    let mut listings = Vec::new();

    for advert in raw {
        let max_volume = effective_max_volume(&advert);
        if max_volume < filter.min_volume {
            continue;
        }
        if filter.require_verified && !is_verified(&advert.advertiser) {
            continue;
        }
        if advert.adv.price <= 0.0 {
            continue;
        }

        listings.push(P2PListing {
            advertiser_name: truncate_name(&advert.advertiser.nick_name),
            price: advert.adv.price,
            max_volume,
            verified: true,
            trade_url: build_trade_url(filter.fiat, filter.side, &advert),
        });

        if listings.len() >= filter.max_results {
            break;
        }
    }

    debug!(
        fiat = filter.fiat,
        side = filter.side.api_value(),
        total,
        kept = listings.len(),
        "refined p2p listings"
    );
    listings
}

/// Dynamic per-transaction cap when the advertiser publishes one, else
/// the static cap.
fn effective_max_volume(advert: &RawAdvert) -> f64 {
    if advert.adv.dynamic_max_single_trans_amount > 0.0 {
        advert.adv.dynamic_max_single_trans_amount
    } else {
        advert.adv.max_single_trans_amount
    }
}

/// Verification check as the marketplace reports it: an exact
/// `userType == "merchant"` match, or a case-insensitive MERCHANT /
/// VERIFIED marker inside the identity descriptor. The two fields are
/// deliberately checked differently (exact vs substring); see tests.
fn is_verified(advertiser: &Advertiser) -> bool {
    if advertiser.user_type.as_deref() == Some("merchant") {
        return true;
    }
    advertiser
        .user_identity
        .as_deref()
        .map(|identity| {
            let upper = identity.to_uppercase();
            upper.contains("MERCHANT") || upper.contains("VERIFIED")
        })
        .unwrap_or(false)
}

fn truncate_name(nick_name: &str) -> String {
    nick_name.chars().take(NAME_MAX_CHARS).collect()
}

/// Public trade link for an advert. With a known advertiser number the
/// link opens that advertiser's page; otherwise it falls back to a
/// keyword search on the (URL-escaped) nickname.
fn build_trade_url(fiat: &str, side: TradeSide, advert: &RawAdvert) -> String {
    let base = format!(
        "https://p2p.binance.com/en/trade/{}/USDT",
        side.url_segment()
    );

    let advertiser_no = advert
        .adv
        .advertiser_no
        .as_deref()
        .or(advert.advertiser.user_no.as_deref())
        .filter(|no| !no.is_empty());

    let params: [(&str, &str); 3] = match advertiser_no {
        Some(no) => [("fiat", fiat), ("payment", "ALL"), ("publisher", no)],
        None => [
            ("fiat", fiat),
            ("payment", "ALL"),
            ("keyword", advert.advertiser.nick_name.as_str()),
        ],
    };

    match Url::parse_with_params(&base, &params) {
        Ok(url) => url.to_string(),
        Err(_) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::binance_p2p::Adv;

    fn advert(price: f64, dynamic_cap: f64, static_cap: f64) -> RawAdvert {
        RawAdvert {
            adv: Adv {
                price,
                dynamic_max_single_trans_amount: dynamic_cap,
                max_single_trans_amount: static_cap,
                advertiser_no: None,
            },
            advertiser: Advertiser {
                nick_name: "trader".to_string(),
                user_no: None,
                user_type: Some("merchant".to_string()),
                user_identity: None,
            },
        }
    }

    fn filter(min_volume: f64, require_verified: bool, max_results: usize) -> ListingFilter<'static> {
        ListingFilter {
            fiat: "IDR",
            side: TradeSide::Buy,
            min_volume,
            require_verified,
            max_results,
        }
    }

    #[test]
    fn dynamic_cap_preferred_over_static() {
        let kept = refine_listings(
            vec![advert(16_250.0, 75_000_000.0, 100_000_000.0)],
            &filter(50_000_000.0, true, 10),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].max_volume, 75_000_000.0);
    }

    #[test]
    fn static_cap_used_when_dynamic_absent() {
        let kept = refine_listings(
            vec![advert(16_250.0, 0.0, 60_000_000.0)],
            &filter(50_000_000.0, true, 10),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].max_volume, 60_000_000.0);
    }

    #[test]
    fn low_volume_adverts_are_dropped() {
        let kept = refine_listings(
            vec![advert(16_250.0, 0.0, 30_000_000.0)],
            &filter(50_000_000.0, true, 10),
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn every_survivor_meets_the_volume_threshold() {
        let raw = vec![
            advert(16_250.0, 80_000_000.0, 0.0),
            advert(16_245.0, 10_000_000.0, 0.0),
            advert(16_240.0, 0.0, 55_000_000.0),
        ];
        let kept = refine_listings(raw, &filter(50_000_000.0, true, 10));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|l| l.max_volume >= 50_000_000.0));
        // Upstream order preserved among survivors.
        assert_eq!(kept[0].price, 16_250.0);
        assert_eq!(kept[1].price, 16_240.0);
    }

    #[test]
    fn truncates_to_max_results() {
        let raw: Vec<_> = (0..20)
            .map(|i| advert(16_000.0 + i as f64, 80_000_000.0, 0.0))
            .collect();
        let kept = refine_listings(raw, &filter(50_000_000.0, true, 10));
        assert_eq!(kept.len(), 10);
    }

    #[test]
    fn verification_predicate_is_exact_on_user_type() {
        // The userType check is an exact match: "Merchant" does not pass.
        let mut a = advert(16_250.0, 80_000_000.0, 0.0);
        a.advertiser.user_type = Some("Merchant".to_string());
        a.advertiser.user_identity = None;
        assert!(refine_listings(vec![a], &filter(0.0, true, 10)).is_empty());
    }

    #[test]
    fn verification_predicate_is_substring_on_identity() {
        // ...while the identity check is case-insensitive substring.
        let mut a = advert(16_250.0, 80_000_000.0, 0.0);
        a.advertiser.user_type = None;
        a.advertiser.user_identity = Some("block_merchant".to_string());
        assert_eq!(refine_listings(vec![a], &filter(0.0, true, 10)).len(), 1);

        let mut b = advert(16_250.0, 80_000_000.0, 0.0);
        b.advertiser.user_type = None;
        b.advertiser.user_identity = Some("ID_Verified_Gold".to_string());
        assert_eq!(refine_listings(vec![b], &filter(0.0, true, 10)).len(), 1);
    }

    #[test]
    fn unverified_adverts_kept_when_not_required() {
        let mut a = advert(16_250.0, 80_000_000.0, 0.0);
        a.advertiser.user_type = None;
        a.advertiser.user_identity = None;
        assert_eq!(refine_listings(vec![a], &filter(0.0, false, 10)).len(), 1);
    }

    #[test]
    fn zero_price_adverts_never_survive() {
        let kept = refine_listings(
            vec![advert(0.0, 80_000_000.0, 0.0)],
            &filter(0.0, true, 10),
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn advertiser_names_are_capped_at_twelve_chars() {
        let mut a = advert(16_250.0, 80_000_000.0, 0.0);
        a.advertiser.nick_name = "AVeryLongAdvertiserName".to_string();
        let kept = refine_listings(vec![a], &filter(0.0, true, 10));
        assert_eq!(kept[0].advertiser_name, "AVeryLongAdv");
        assert_eq!(kept[0].advertiser_name.chars().count(), 12);
    }

    #[test]
    fn trade_url_uses_publisher_when_number_known() {
        let mut a = advert(16_250.0, 80_000_000.0, 0.0);
        a.adv.advertiser_no = Some("s411".to_string());
        let kept = refine_listings(vec![a], &filter(0.0, true, 10));
        assert_eq!(
            kept[0].trade_url,
            "https://p2p.binance.com/en/trade/buy/USDT?fiat=IDR&payment=ALL&publisher=s411"
        );
    }

    #[test]
    fn trade_url_falls_back_to_user_no_then_keyword() {
        let mut a = advert(16_250.0, 80_000_000.0, 0.0);
        a.adv.advertiser_no = None;
        a.advertiser.user_no = Some("u777".to_string());
        let kept = refine_listings(vec![a], &filter(0.0, true, 10));
        assert!(kept[0].trade_url.ends_with("publisher=u777"));

        let mut b = advert(16_250.0, 80_000_000.0, 0.0);
        b.advertiser.nick_name = "Juragan Dolar".to_string();
        let kept = refine_listings(vec![b], &filter(0.0, true, 10));
        assert!(kept[0].trade_url.contains("keyword=Juragan+Dolar"));
    }
}
