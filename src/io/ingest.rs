//! Decision-cycle input loading and validation.
//!
//! The input JSON is the snapshot an upstream assembler produced for one
//! cycle. Thin data is fine (everything but `as_of` may be missing); values
//! that are present must be finite.
//!
//! ```json
//! {
//!   "as_of": "2026-10-17T08:00:00Z",
//!   "loan_amount": 500000,
//!   "snapshot": { "period": "October 2026", "floating": 4.8,
//!                 "fixed": [{ "tenor": 3, "rate": 4.5 }] },
//!   "estimates": [{ "tenor": 3, "estimated": 4.7, "current": 4.5, "diff": 0.2,
//!                   "sample_count": 5, "dispersion": 0.05 }],
//!   "bank_products": [],
//!   "swap_history": [{ "observed_at": "2026-08-01T12:00:00Z", "tenor": 3,
//!                      "value": 3.91, "source": "seb" }]
//! }
//! ```
//!
//! When `estimates` is absent they are derived from `bank_products`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BankProduct, MarketEstimate, RateSnapshot, SwapHistoryPoint, Tenor};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionInput {
    pub as_of: DateTime<Utc>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub snapshot: Option<RateSnapshot>,
    #[serde(default)]
    pub estimates: Option<Vec<MarketEstimate>>,
    #[serde(default)]
    pub bank_products: Vec<BankProduct>,
    #[serde(default)]
    pub swap_history: Vec<SwapHistoryPoint>,
}

/// Read and validate a decision input file.
pub fn read_input(path: &Path) -> Result<DecisionInput, AppError> {
    let file = File::open(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let input: DecisionInput =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| AppError::InputFormat {
            path: path.to_path_buf(),
            source,
        })?;
    validate_input(&input)?;

    tracing::info!(
        path = %path.display(),
        estimates = input.estimates.as_ref().map(Vec::len),
        bank_products = input.bank_products.len(),
        swap_points = input.swap_history.len(),
        "loaded decision input"
    );
    Ok(input)
}

pub fn validate_input(input: &DecisionInput) -> Result<(), AppError> {
    if let Some(amount) = input.loan_amount {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(AppError::Data(format!("loan_amount must be positive (got {amount}).")));
        }
    }

    if let Some(snapshot) = &input.snapshot {
        if !snapshot.floating.is_finite() {
            return Err(AppError::Data("Non-finite floating rate in snapshot.".to_string()));
        }
        for fixed in &snapshot.fixed {
            if !fixed.rate.is_finite() {
                return Err(AppError::Data(format!(
                    "Non-finite {} fixed rate in snapshot.",
                    fixed.tenor
                )));
            }
            if !Tenor::ALL.contains(&fixed.tenor) {
                tracing::warn!(tenor = %fixed.tenor, "non-standard tenor in snapshot; only scored if an estimate exists");
            }
        }
    }

    for estimate in input.estimates.iter().flatten() {
        let finite = estimate.estimated.is_finite()
            && estimate.current.is_none_or(f64::is_finite)
            && estimate.diff.is_none_or(f64::is_finite)
            && estimate.dispersion.is_finite()
            && estimate.dispersion >= 0.0;
        if !finite {
            return Err(AppError::Data(format!(
                "Invalid {} estimate: values must be finite and dispersion >= 0.",
                estimate.tenor
            )));
        }
        if !Tenor::ALL.contains(&estimate.tenor) {
            tracing::warn!(tenor = %estimate.tenor, "non-standard tenor in estimates; scored with the default tenor penalty");
        }
    }

    Ok(())
}
