// Engine settings, loaded from a JSON file or falling back to built-in defaults.
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::catalog::UtilityCatalog;
use crate::error::EngineError;

pub const DEFAULT_DATA_FILE: &str = "utility_data.csv";
pub const DEFAULT_RATE: f64 = 100.0;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UtilitySettings {
    pub name: String,
    pub unit: String,
    #[serde(default = "default_rate")]
    pub default_rate: f64,
}

fn default_rate() -> f64 {
    DEFAULT_RATE
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub data_file: PathBuf,
    pub currency: String,
    pub utilities: Vec<UtilitySettings>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            currency: "HUF".to_string(),
            utilities: vec![
                UtilitySettings { name: "MVM Gas".to_string(), unit: "m3".to_string(), default_rate: DEFAULT_RATE },
                UtilitySettings { name: "MVM Electricity".to_string(), unit: "kWh".to_string(), default_rate: DEFAULT_RATE },
                UtilitySettings { name: "Vízművek Water".to_string(), unit: "m3".to_string(), default_rate: DEFAULT_RATE },
            ],
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid settings file '{}'", path.display()))
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let settings = Self::load(p)?;
                tracing::debug!(path = %p.display(), utilities = settings.utilities.len(), "Loaded settings file");
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.utilities.is_empty() {
            return Err(EngineError::ConfigError("at least one utility must be configured".to_string()));
        }
        let mut seen = HashSet::new();
        for utility in &self.utilities {
            let name = utility.name.as_str();
            if name.trim().is_empty() {
                return Err(EngineError::ConfigError("utility name must not be empty".to_string()));
            }
            // The ledger file is read with trimmed fields.
            if name != name.trim() {
                return Err(EngineError::ConfigError(format!(
                    "utility name '{}' must not start or end with whitespace",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(EngineError::ConfigError(format!("utility '{}' is configured twice", name)));
            }
            if !(utility.default_rate.is_finite() && utility.default_rate > 0.0) {
                return Err(EngineError::ConfigError(format!(
                    "default rate for '{}' must be a positive number, got {}",
                    name, utility.default_rate
                )));
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> UtilityCatalog {
        UtilityCatalog::new(self.utilities.clone())
    }
}
