//! Analysis prompt: the built-in kiosk prompt and an optional startup override.

use crate::{Error, Result};
use std::path::Path;

pub const SHOE_DRYING: &str = include_str!("../data/prompts/shoe_drying.txt");

/// Resolve the analysis prompt: the override file when one is configured,
/// otherwise the built-in shoe-drying prompt.
pub fn load(override_path: Option<&Path>) -> Result<String> {
    let Some(path) = override_path else {
        return Ok(SHOE_DRYING.to_string());
    };

    let prompt = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read prompt file {}: {}",
            path.display(),
            e
        ))
    })?;

    if prompt.trim().is_empty() {
        return Err(Error::Config(format!(
            "Prompt file {} is empty",
            path.display()
        )));
    }

    tracing::info!("Loaded analysis prompt from {}", path.display());
    Ok(prompt)
}
