//! Reporting utilities: terminal summaries for decisions and windows.

pub mod format;

pub use format::{format_decision, format_windows};
