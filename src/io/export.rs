//! Export a decision-cycle result to JSON.
//!
//! The export is meant for downstream presentation layers; it carries the full
//! per-tenor audit trail alongside the aggregate verdict.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::app::pipeline::DecisionOutput;
use crate::error::AppError;

/// Write the decision output as pretty-printed JSON.
pub fn write_output_json(path: &Path, output: &DecisionOutput) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, output)?;
    writer.flush().map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote decision export");
    Ok(())
}
