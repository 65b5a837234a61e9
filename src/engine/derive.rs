//! Pure derivations over resolved rates. No I/O, no rounding; display
//! formatting decides decimal places.

use crate::models::{EngineConfig, ProfitRow, SimParams, SimulationRow};

/// Fee-adjusted spot price. The `0.0` sentinel stays `0.0` so an
/// unavailable price never turns into a plausible-looking number.
pub fn net_price(raw: f64, cfg: &EngineConfig) -> f64 {
    if raw == 0.0 {
        return 0.0;
    }
    raw * fee_multiplier(cfg)
}

/// Divisor-simulation matrix: every `(cut, divisor)` pair applied to the
/// resolved SAR rate. Empty when the rate is unavailable.
pub fn divisor_matrix(sar_rate: f64, cfg: &EngineConfig) -> Vec<SimulationRow> {
    if sar_rate == 0.0 {
        return Vec::new();
    }

    let multiplier = fee_multiplier(cfg);
    let mut rows = Vec::with_capacity(cfg.cuts.len() * cfg.divisors.len());
    for &cut in &cfg.cuts {
        for &divisor in &cfg.divisors {
            rows.push(SimulationRow {
                label: format!("(SAR - {cut}) / {divisor}"),
                value: ((sar_rate - cut) / divisor) * multiplier,
                params: SimParams { cut, divisor },
            });
        }
    }
    rows
}

/// Profit rows at the reference divisor, one per configured capital
/// amount. Empty when either input is unavailable.
pub fn profit_rows(sar_rate: f64, net_price: f64, cfg: &EngineConfig) -> Vec<ProfitRow> {
    let base = if net_price == 0.0 {
        0.0
    } else {
        net_price / cfg.reference_divisor
    };
    if sar_rate == 0.0 || base == 0.0 {
        return Vec::new();
    }
    let gain_per_unit = sar_rate - base;

    cfg.capital_amounts
        .iter()
        .map(|&capital| ProfitRow {
            capital_amount: capital,
            projected_gain: gain_per_unit * capital,
            roi_percent: gain_per_unit / base * 100.0,
        })
        .collect()
}

fn fee_multiplier(cfg: &EngineConfig) -> f64 {
    1.0 + cfg.fee_percent / 100.0
}
