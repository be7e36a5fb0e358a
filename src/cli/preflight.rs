//! Pre-flight checks before expensive operations.
//!
//! Validates that configuration is usable before starting a run that would
//! otherwise fail after the first network call.

use crate::config::Settings;
use crate::error::{NewscasterError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Producing a briefing requires an API key and a writable output directory.
    Produce,
    /// Serving needs an API key for the runs it starts.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Produce => {
            settings.gemini.resolve_api_key()?;
            check_output_dir(settings)?;
        }
        Operation::Serve => {
            settings.gemini.resolve_api_key()?;
        }
    }
    Ok(())
}

/// Make sure the output directory exists or can be created.
fn check_output_dir(settings: &Settings) -> Result<()> {
    let dir = settings.output_dir();
    std::fs::create_dir_all(&dir).map_err(|e| {
        NewscasterError::Config(format!(
            "Output directory {} is not writable: {}",
            dir.display(),
            e
        ))
    })
}
