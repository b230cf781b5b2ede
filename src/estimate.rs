//! Next-rate estimation from bank fixed-rate products.
//!
//! The institution sets its next fixed rate from the cheapest bank offers for
//! the same tenor, less a fixed margin. For each tenor we average the cheapest
//! `top_n` effective rates and subtract `lender_margin`.

use crate::config::MarketParams;
use crate::domain::{BankProduct, MarketEstimate, RateSnapshot, Tenor};
use crate::signal::scorer::round_to;

/// Cheapest `top_n` products per tenor, ascending by effective rate.
pub fn cheapest_by_tenor(products: &[BankProduct], tenor: Tenor, top_n: usize) -> Vec<BankProduct> {
    let mut matching: Vec<BankProduct> = products
        .iter()
        .filter(|p| p.bound_years == tenor.years() && p.effective_rate.is_finite())
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.effective_rate.total_cmp(&b.effective_rate));
    matching.truncate(top_n);
    matching
}

/// Estimate the next fixed rate for each configured tenor.
///
/// Tenors without any matching product get no estimate.
pub fn estimate_next_rates(
    products: &[BankProduct],
    snapshot: Option<&RateSnapshot>,
    params: &MarketParams,
) -> Vec<MarketEstimate> {
    let mut out = Vec::new();
    for tenor in Tenor::ALL {
        let top = cheapest_by_tenor(products, tenor, params.top_n);
        if top.is_empty() {
            continue;
        }

        let rates: Vec<f64> = top.iter().map(|p| p.effective_rate).collect();
        let average = mean(&rates);
        let estimated = round_to(average - params.lender_margin, 3);
        let current = snapshot.and_then(|s| s.fixed_rate(tenor));
        let diff = current.map(|c| round_to(estimated - c, 3));

        out.push(MarketEstimate {
            tenor,
            estimated,
            current,
            diff,
            sample_count: top.len() as u32,
            dispersion: round_to(population_std(&rates, average), 3),
        });
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
