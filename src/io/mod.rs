//! Input/output helpers.
//!
//! - decision input JSON load + validation (`ingest`)
//! - decision output JSON export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
