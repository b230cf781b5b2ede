//! Money comparison between binding now and binding at the estimated next rate.
//!
//! Independent of the scorer: the risk label reuses the same dispersion and
//! sample-count inputs but with its own thresholds, so the two may disagree.

use crate::config::RiskParams;
use crate::domain::{MarketEstimate, RateSnapshot, RiskLevel, Savings, Tenor};

/// One `Savings` per tenor in `tenors` that has both a current fixed rate and an estimate.
pub fn compute_savings(
    snapshot: &RateSnapshot,
    tenors: &[Tenor],
    estimates: &[MarketEstimate],
    loan_amount: f64,
    params: &RiskParams,
) -> Vec<Savings> {
    tenors
        .iter()
        .filter_map(|&tenor| {
            let fixed = snapshot.fixed_rate(tenor)?;
            let estimate = estimates.iter().find(|e| e.tenor == tenor)?;
            Some(savings_for(tenor, fixed, estimate, loan_amount, params))
        })
        .collect()
}

/// Savings for one tenor. Amounts are rounded to whole currency units.
pub fn savings_for(
    tenor: Tenor,
    fixed_rate: f64,
    estimate: &MarketEstimate,
    loan_amount: f64,
    params: &RiskParams,
) -> Savings {
    let years = tenor.years();
    let annual_diff = (estimate.estimated - fixed_rate) / 100.0 * loan_amount;
    Savings {
        tenor,
        fixed_rate,
        estimated_next_rate: estimate.estimated,
        loan_amount,
        annual_diff: annual_diff.round(),
        total_diff: (annual_diff * years as f64).round(),
        years,
        bind_now: annual_diff > 0.0,
        risk: risk_level(estimate, years, params),
    }
}

/// Additive risk points: dispersion, sample size and tenor length.
pub fn risk_level(estimate: &MarketEstimate, years: u32, params: &RiskParams) -> RiskLevel {
    let mut points = 0;
    if estimate.dispersion > params.high_dispersion {
        points += 2;
    } else if estimate.dispersion > params.elevated_dispersion {
        points += 1;
    }
    if estimate.sample_count < params.min_samples {
        points += 2;
    } else if estimate.sample_count < params.good_samples {
        points += 1;
    }
    if years >= params.long_tenor_years {
        points += 1;
    }

    if points <= params.low_max {
        RiskLevel::Low
    } else if points <= params.medium_max {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
