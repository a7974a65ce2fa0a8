//! JSON scenario loader
//!
//! Reads a (possibly partial) scenario document. Missing fields fall back to
//! the reference scenario defaults.

use std::fs;
use std::path::Path;

use super::{ScenarioInput, ScenarioParameters};
use crate::error::Result;

impl ScenarioInput {
    /// Parse a scenario from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scenario from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        log::debug!("loaded scenario file {}", path.display());
        Self::from_json_str(&contents)
    }
}

/// Load and validate a scenario file in one step
pub fn load_parameters(path: &Path) -> Result<ScenarioParameters> {
    ScenarioParameters::new(ScenarioInput::from_json_file(path)?)
}
