//! # Settings Module
//!
//! ## Purpose
//! Holds everything a blending report run needs besides the solver output itself:
//! the name of the solver variable to read, the policy for packages of zero weight
//! and the raw material composition table.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "variable_name": "x",
//!   "zero_weight_policy": "Warn",
//!   "composition": {
//!     "materials": ["Areia", "Bauxita"],
//!     "elements": ["SiO2", "Al2O3"],
//!     "fractions": [[0.95, 0.01], [0.10, 0.50]]
//!   }
//! }
//! ```
//! Every key is optional, missing keys take the built-in defaults.
//!
//! ## Usage Pattern
//! ```rust
//! use SolverBlend::settings::BlendConfig;
//!
//! let config = BlendConfig::load_or_default("blend_config.json").unwrap();
//! assert_eq!(config.variable_name, "x");
//! ```

use crate::Blending::analysis::ZeroWeightPolicy;
use crate::Blending::composition::CompositionTable;
use crate::error::{BlendError, BlendResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_INPUT_FILE: &str = "solucao.txt";
pub const DEFAULT_OUTPUT: &str = "blending_report.xlsx";
pub const DEFAULT_VARIABLE: &str = "x";

/// Configuration of the analysis, serializable to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    pub variable_name: String,
    pub zero_weight_policy: ZeroWeightPolicy,
    pub composition: CompositionTable,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            variable_name: DEFAULT_VARIABLE.to_string(),
            zero_weight_policy: ZeroWeightPolicy::default(),
            composition: CompositionTable::default(),
        }
    }
}

impl BlendConfig {
    /// Loads the configuration from a JSON file, the file must exist.
    pub fn from_file(config_file: &str) -> BlendResult<Self> {
        let content = fs::read_to_string(config_file).map_err(|e| {
            BlendError::InvalidConfig(format!(
                "cannot read configuration file '{}': {}",
                config_file, e
            ))
        })?;
        let config: BlendConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("configuration loaded from '{}'", config_file);
        Ok(config)
    }

    /// Same as `from_file`, but a missing file gives the default configuration.
    pub fn load_or_default(config_file: &str) -> BlendResult<Self> {
        if Path::new(config_file).exists() {
            Self::from_file(config_file)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, config_file: &str) -> BlendResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content).map_err(|e| BlendError::OutputWriteFailure {
            path: config_file.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> BlendResult<()> {
        if self.variable_name.is_empty()
            || !self
                .variable_name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(BlendError::InvalidConfig(format!(
                "'{}' is not a valid variable name",
                self.variable_name
            )));
        }
        self.composition.validate()
    }
}

/// Paths of one run, taken from the positional command line arguments
/// `[input_file] [output] [config_file]`. An output ending in `.xlsx` is a single
/// workbook, anything else a directory of CSV sheets.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub input_file: String,
    pub output: String,
    pub config_file: Option<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            input_file: DEFAULT_INPUT_FILE.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            config_file: None,
        }
    }
}

impl RunSettings {
    /// `args` without the program name
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut args = args.into_iter();
        let defaults = Self::default();
        Self {
            input_file: args.next().unwrap_or(defaults.input_file),
            output: args.next().unwrap_or(defaults.output),
            config_file: args.next(),
        }
    }

    pub fn load_config(&self) -> BlendResult<BlendConfig> {
        match &self.config_file {
            Some(file) => BlendConfig::from_file(file),
            None => Ok(BlendConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = BlendConfig::default();
        assert_eq!(config.variable_name, "x");
        assert_eq!(config.zero_weight_policy, ZeroWeightPolicy::Warn);
        assert_eq!(config.composition.n_materials(), 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_file() {
        let mut temp_config = NamedTempFile::new().unwrap();
        write!(
            temp_config,
            r#"{{ "zero_weight_policy": "Fail",
                 "composition": {{ "materials": ["A", "B"], "elements": ["E1"],
                                   "fractions": [[1.0], [0.0]] }} }}"#
        )
        .unwrap();
        let config = BlendConfig::from_file(temp_config.path().to_str().unwrap()).unwrap();
        assert_eq!(config.variable_name, "x");
        assert_eq!(config.zero_weight_policy, ZeroWeightPolicy::Fail);
        assert_eq!(config.composition.materials, vec!["A", "B"]);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_config = NamedTempFile::new().unwrap();
        let path = temp_config.path().to_str().unwrap();
        let mut config = BlendConfig::default();
        config.variable_name = "blend".to_string();
        config.save_to_file(path).unwrap();
        let loaded = BlendConfig::from_file(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config() {
        let mut temp_config = NamedTempFile::new().unwrap();
        write!(temp_config, "{{ \"variable_name\": \"x y\" }}").unwrap();
        let result = BlendConfig::from_file(temp_config.path().to_str().unwrap());
        assert!(matches!(result, Err(BlendError::InvalidConfig(_))));

        let mut broken = NamedTempFile::new().unwrap();
        write!(broken, "{{ not json").unwrap();
        let result = BlendConfig::from_file(broken.path().to_str().unwrap());
        assert!(matches!(result, Err(BlendError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(BlendConfig::from_file("no_such_blend_config.json").is_err());
        let config = BlendConfig::load_or_default("no_such_blend_config.json").unwrap();
        assert_eq!(config, BlendConfig::default());
    }

    #[test]
    fn test_run_settings_from_args() {
        let settings = RunSettings::from_args(Vec::<String>::new());
        assert_eq!(settings, RunSettings::default());
        assert_eq!(settings.input_file, "solucao.txt");
        assert_eq!(settings.output, "blending_report.xlsx");

        let settings = RunSettings::from_args(vec![
            "out.txt".to_string(),
            "report".to_string(),
            "cfg.json".to_string(),
        ]);
        assert_eq!(settings.input_file, "out.txt");
        assert_eq!(settings.output, "report");
        assert_eq!(settings.config_file.as_deref(), Some("cfg.json"));
    }
}
