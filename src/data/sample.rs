//! Synthetic decision-cycle inputs for demos and tests.
//!
//! Each configured tenor gets a latent market move (pp). The swap history drifts
//! by that move over the lookback, and bank offers are priced off the current
//! fixed rate plus the move, so the generated estimate and trend usually agree
//! in direction. Noise and the occasional missing tenor keep the engine honest.

use chrono::{DateTime, Duration, Utc};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::config::MAX_LOOKBACK_DAYS;
use crate::domain::{BankProduct, FixedRate, RateSnapshot, SwapHistoryPoint, Tenor};
use crate::error::AppError;
use crate::io::ingest::DecisionInput;
use crate::signal::scorer::round_to;

const BANKS: [&str; 8] = [
    "Nordbank", "Fjordkreditt", "Kystsparebank", "Vestlandsbanken",
    "Innlandet Spare", "Polarbanken", "Midtbank", "Sorlandet Kreditt",
];

/// Swap level (percent) per configured tenor at the as-of date.
fn base_swap(tenor: Tenor) -> f64 {
    match tenor.years() {
        3 => 3.90,
        5 => 3.95,
        _ => 4.10,
    }
}

/// Institutional fixed rates sit roughly this far above swaps.
const FIXED_OVER_SWAP: f64 = 0.60;
/// Bank offers sit roughly this far above the institution's rate.
const BANK_OVER_FIXED: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub as_of: DateTime<Utc>,
    pub loan_amount: f64,
    /// Expected next-rate move shared by all tenors (pp).
    pub drift: f64,
    /// Std dev of per-tenor idiosyncratic moves and quote noise (pp).
    pub noise: f64,
    pub banks_per_tenor: usize,
    pub history_days: i64,
    /// Probability a tenor has no bank offers at all.
    pub missing_tenor_prob: f64,
}

impl ScenarioConfig {
    pub fn new(seed: u64, as_of: DateTime<Utc>) -> Self {
        Self {
            seed,
            as_of,
            loan_amount: crate::config::DEFAULT_LOAN_AMOUNT,
            drift: 0.0,
            noise: 0.10,
            banks_per_tenor: 6,
            history_days: 90,
            missing_tenor_prob: 0.10,
        }
    }
}

/// Generate a complete, deterministic (per seed) decision input.
pub fn generate_scenario(config: &ScenarioConfig) -> Result<DecisionInput, AppError> {
    if config.banks_per_tenor == 0 || config.banks_per_tenor > BANKS.len() {
        return Err(AppError::Config(format!(
            "banks_per_tenor must be in 1..={}.",
            BANKS.len()
        )));
    }
    if !(0..=MAX_LOOKBACK_DAYS).contains(&config.history_days) {
        return Err(AppError::Config(format!(
            "history_days must be in 0..={MAX_LOOKBACK_DAYS}."
        )));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0 && config.drift.is_finite()) {
        return Err(AppError::Config("Invalid drift/noise settings.".to_string()));
    }
    if !(0.0..1.0).contains(&config.missing_tenor_prob) {
        return Err(AppError::Config("missing_tenor_prob must be in [0, 1).".to_string()));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::Data(format!("Noise distribution error: {e}")))?;

    let mut fixed = Vec::with_capacity(Tenor::ALL.len());
    let mut bank_products = Vec::new();
    let mut swap_history = Vec::new();

    for tenor in Tenor::ALL {
        let swap_now = base_swap(tenor);
        let current = round_to(swap_now + FIXED_OVER_SWAP, 3);
        fixed.push(FixedRate { tenor, rate: current });

        // Longer tenors move a little more.
        let scale = (tenor.years() as f64 / 5.0).sqrt();
        let market_move = config.drift + config.noise * scale * normal.sample(&mut rng);

        swap_history.extend(swap_path(&mut rng, &normal, tenor, swap_now, market_move, config));

        if rng.r#gen::<f64>() < config.missing_tenor_prob {
            continue;
        }
        for bank in BANKS.iter().take(config.banks_per_tenor) {
            let quote_noise = config.noise * normal.sample(&mut rng);
            let effective = round_to(current + BANK_OVER_FIXED + market_move + quote_noise, 3);
            bank_products.push(BankProduct {
                bank: bank.to_string(),
                product_name: format!("Fixed {}", tenor.label()),
                nominal_rate: round_to(effective - 0.08, 3),
                effective_rate: effective,
                bound_years: tenor.years(),
            });
        }
    }

    Ok(DecisionInput {
        as_of: config.as_of,
        loan_amount: Some(config.loan_amount),
        snapshot: Some(RateSnapshot {
            period: config.as_of.format("%B %Y").to_string(),
            floating: round_to(base_swap(Tenor::THREE) + 0.9, 3),
            fixed,
        }),
        estimates: None,
        bank_products,
        swap_history,
    })
}

/// Daily swap path ending near `swap_now`, having moved `market_move` over the window.
fn swap_path(
    rng: &mut StdRng,
    normal: &Normal<f64>,
    tenor: Tenor,
    swap_now: f64,
    market_move: f64,
    config: &ScenarioConfig,
) -> Vec<SwapHistoryPoint> {
    let days = config.history_days;
    (0..=days)
        .map(|i| {
            let remaining = if days == 0 { 0.0 } else { 1.0 - i as f64 / days as f64 };
            let jitter = 0.2 * config.noise * normal.sample(&mut *rng);
            SwapHistoryPoint {
                observed_at: config.as_of - Duration::days(days - i),
                tenor,
                value: round_to(swap_now - market_move * remaining + jitter, 3),
                source: "synthetic".to_string(),
            }
        })
        .collect()
}
