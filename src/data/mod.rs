//! Input data sources.

pub mod sample;

pub use sample::{ScenarioConfig, generate_scenario};
