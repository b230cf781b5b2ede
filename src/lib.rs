//! `fixrate` library crate.
//!
//! Advises, per fixed-rate tenor, whether to lock in a rate now or wait for the
//! next rate-setting window, by fusing a market estimate of the next rate, the
//! benchmark swap trend, and the statistical quality of the estimate.
//!
//! The binary (`fixrate`) is a thin wrapper around this library so that:
//!
//! - the scoring engine is testable without spawning processes
//! - the engine is reusable by other front-ends (HTTP, scheduled jobs)

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod history;
pub mod io;
pub mod report;
pub mod savings;
pub mod signal;
pub mod window;
