//! Domain types used throughout the decision cycle.
//!
//! This module defines:
//!
//! - market inputs (`RateSnapshot`, `MarketEstimate`, `SwapHistoryPoint`, `BankProduct`)
//! - scorer/composer outputs (`TenorSignal`, `AggregateSignal`, `Opportunity`)
//! - the savings comparison (`Savings`, `RiskLevel`)

pub mod types;

pub use types::*;
