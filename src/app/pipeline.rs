//! Shared decision-cycle logic used by every CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! estimates -> history windows -> per-tenor scoring (parallel) -> composition -> savings
//!
//! The inputs are assembled once and only read from here on; the composer runs
//! after every tenor has been scored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{AggregateSignal, MarketEstimate, Savings, SwapHistoryPoint, Tenor};
use crate::estimate::estimate_next_rates;
use crate::history::SwapHistoryBook;
use crate::io::ingest::DecisionInput;
use crate::savings::compute_savings;
use crate::signal::{TenorInput, compose, score_tenors};
use crate::window::{Window, days_until_next_window, next_window};

/// All computed outputs of a single decision cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutput {
    pub as_of: DateTime<Utc>,
    pub period: Option<String>,
    pub loan_amount: f64,
    pub estimates: Vec<MarketEstimate>,
    pub signal: AggregateSignal,
    pub savings: Vec<Savings>,
    pub next_window: Option<Window>,
    pub days_to_window: Option<i64>,
}

/// Execute one decision cycle.
///
/// `loan_amount` is used when the input does not carry its own.
pub fn run_cycle(input: &DecisionInput, loan_amount: f64, config: &EngineConfig) -> DecisionOutput {
    let loan_amount = input.loan_amount.unwrap_or(loan_amount);
    let snapshot = input.snapshot.as_ref();

    tracing::info!(as_of = %input.as_of, loan_amount, "starting decision cycle");

    // 1) Estimates: supplied, or derived from bank offers.
    let estimates = match &input.estimates {
        Some(estimates) => estimates.clone(),
        None => {
            let derived = estimate_next_rates(&input.bank_products, snapshot, &config.market);
            tracing::debug!(
                products = input.bank_products.len(),
                estimates = derived.len(),
                "derived estimates from bank products"
            );
            derived
        }
    };

    // 2) Swap history, windowed per tenor.
    let book = SwapHistoryBook::from_points(input.swap_history.iter().cloned());
    let tenors = scored_tenors(&estimates);
    let histories: Vec<(Tenor, Vec<SwapHistoryPoint>)> = tenors
        .iter()
        .map(|&tenor| {
            (
                tenor,
                book.window(tenor, input.as_of, config.market.swap_lookback_days),
            )
        })
        .collect();

    // 3) Score each tenor independently.
    let inputs: Vec<TenorInput<'_>> = histories
        .iter()
        .map(|(tenor, history)| TenorInput {
            tenor: *tenor,
            current_rate: snapshot.and_then(|s| s.fixed_rate(*tenor)),
            estimate: estimates.iter().find(|e| e.tenor == *tenor),
            history: history.as_slice(),
            loan_amount: Some(loan_amount),
        })
        .collect();
    let per_tenor = score_tenors(&inputs, config);

    // 4) Compose once all tenors are in.
    let signal = compose(per_tenor, &estimates, config);

    // 5) Money comparison (independent of the verdict).
    let savings = snapshot
        .map(|s| compute_savings(s, &tenors, &estimates, loan_amount, &config.risk))
        .unwrap_or_default();

    let today = input.as_of.date_naive();

    DecisionOutput {
        as_of: input.as_of,
        period: snapshot.map(|s| s.period.clone()),
        loan_amount,
        estimates,
        signal,
        savings,
        next_window: next_window(today),
        days_to_window: days_until_next_window(today),
    }
}

/// The configured tenors, then any other tenor that has an estimate.
fn scored_tenors(estimates: &[MarketEstimate]) -> Vec<Tenor> {
    let mut tenors = Tenor::ALL.to_vec();
    for estimate in estimates {
        if !tenors.contains(&estimate.tenor) {
            tenors.push(estimate.tenor);
        }
    }
    tenors
}
