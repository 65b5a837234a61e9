//! Markdown report rendering for chat delivery. Pure function of a
//! snapshot; all rounding happens here, at presentation time.

use crate::models::{MarketSnapshot, P2PListing};

const EMPTY_SECTION: &str = "- Belum ada seller dengan volume di atas batas.";

pub fn render_report(s: &MarketSnapshot) -> String {
    let mut msg = String::new();

    msg.push_str("*RIYALBOT UPDATE*\n");
    msg.push_str(&format!("`{} WIB | {}`\n", s.time, s.date));
    msg.push_str("----------------------\n");

    msg.push_str("*CURRENCY RATES*\n");
    msg.push_str(&format!("- Google SAR  : Rp {}\n", thousands(s.google_sar, 2)));
    msg.push_str(&format!("- XE SAR      : Rp {}\n", thousands(s.xe_sar, 2)));
    msg.push_str(&format!("- Tokocrypto  : Rp {}\n", thousands(s.tko_raw, 2)));
    msg.push_str(&format!(
        "- + Biaya {}%: Rp {}\n\n",
        s.fee_percent,
        thousands(s.tko_net, 2)
    ));

    msg.push_str("*SIMULASI SAR (NET + FEE)*\n");
    if s.sim_div.is_empty() {
        msg.push_str("- Kurs SAR tidak tersedia.\n");
    }
    for row in &s.sim_div {
        msg.push_str(&format!("- {}: Rp {}\n", row.label, thousands(row.value, 2)));
    }

    msg.push_str("----------------------\n");
    msg.push_str("*ESTIMASI CUAN (Rate 3.79)*\n");
    msg.push_str("_Untung Google SAR - Simulasi_\n");
    if s.profit_sim.is_empty() {
        msg.push_str("- Data belum lengkap.\n");
    }
    for row in &s.profit_sim {
        msg.push_str(&format!(
            "- {}rb Riyal: +Rp {} (ROI {:.2}%)\n",
            (row.capital_amount / 1000.0) as i64,
            thousands(row.projected_gain, 0),
            row.roi_percent
        ));
    }

    msg.push_str("----------------------\n");
    msg.push_str("*INDONESIA SPOT*\n");
    msg.push_str(&format!("- Tokocrypto : Rp {}\n", thousands(s.tko_raw, 0)));
    msg.push_str(&format!("- Indodax    : Rp {}\n", thousands(s.indodax_raw, 0)));
    msg.push_str(&format!("- Pintu      : Rp {}\n", thousands(s.pintu_raw, 0)));
    msg.push_str(&format!("- OSL        : Rp {}\n\n", thousands(s.osl_raw, 0)));

    msg.push_str("*P2P Buy (Indo) - seller volume > 50jt:*\n");
    msg.push_str(&listing_section(&s.p2p_indo_buy, "Rp"));
    msg.push_str("*P2P Sell (Indo) - seller volume > 50jt:*\n");
    msg.push_str(&listing_section(&s.p2p_indo_sell, "Rp"));
    msg.push_str("----------------------\n");
    msg.push_str("*SAUDI ARABIA P2P*\n");
    msg.push_str("*P2P Buy (Saudi):*\n");
    msg.push_str(&listing_section(&s.p2p_saudi_buy, "SAR"));
    msg.push_str("*P2P Sell (Saudi):*\n");
    msg.push_str(&listing_section(&s.p2p_saudi_sell, "SAR"));

    msg
}

fn listing_section(listings: &[P2PListing], currency: &str) -> String {
    if listings.is_empty() {
        return format!("{EMPTY_SECTION}\n");
    }

    let mut out = String::new();
    for listing in listings {
        out.push_str(&format!(
            "- [{}]({}) | {currency} {} | Limit {currency} {}\n",
            safe_md(&listing.advertiser_name),
            listing.trade_url,
            thousands(listing.price, 2),
            thousands(listing.max_volume, 0),
        ));
    }
    out
}

/// Strip the characters that would break the Markdown link syntax.
fn safe_md(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')' | '`'))
        .collect()
}

/// `1234567.891` → `"1,234,567.89"`. Standard formatting has no grouping.
fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    let digits = int_part.len();
    for (idx, c) in int_part.chars().enumerate() {
        if idx > 0 && (digits - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
