//! Recommendation engine: per-tenor scoring and cross-tenor composition.
//!
//! - `scorer`: one tenor's inputs -> `TenorSignal`
//! - `composer`: all `TenorSignal`s -> `AggregateSignal`

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::domain::TenorSignal;

pub mod composer;
pub mod scorer;

pub use composer::{compose, max_opportunity};
pub use scorer::{TenorInput, TrendReading, score_tenor};

/// Score every tenor independently (parallel). Output order matches `inputs`.
pub fn score_tenors(inputs: &[TenorInput<'_>], config: &EngineConfig) -> Vec<TenorSignal> {
    inputs.par_iter().map(|input| score_tenor(input, config)).collect()
}
