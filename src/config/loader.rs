//! Settings loading functionality.
//!
//! This module provides the [`SettingsLoader`] type for loading rate settings
//! from YAML files, and the YAML file helper shared with the reference
//! dataset loader.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::RateSettings;

/// Loads rate settings from YAML.
///
/// # Example
///
/// ```no_run
/// use parcel_rate_engine::config::SettingsLoader;
///
/// let settings = SettingsLoader::load("./data/settings.yaml")?;
/// println!("Fuel surcharge: {}%", settings.fuel_surcharge_pct);
/// # Ok::<(), parcel_rate_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SettingsLoader;

impl SettingsLoader {
    /// Loads and validates settings from the specified file.
    ///
    /// # Returns
    ///
    /// Returns the settings on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - A setting is out of range (`InvalidSettings`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<RateSettings> {
        let path = path.as_ref();
        let settings = load_yaml::<RateSettings>(path)?;
        settings.validate()?;

        info!(
            path = %path.display(),
            origin_zip = %settings.origin_zip,
            dim_divisor = %settings.dim_divisor,
            fuel_surcharge_pct = %settings.fuel_surcharge_pct,
            "Loaded rate settings"
        );

        Ok(settings)
    }

    /// Parses and validates settings from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> EngineResult<RateSettings> {
        let settings: RateSettings =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    debug!(path = %path_str, bytes = content.len(), "Read YAML file");

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_settings() {
        let file = write_temp(
            r#"
origin_zip: "90001"
dim_divisor: 166
fuel_surcharge_pct: 14.5
remote_surcharge: 12.00
default_markup_pct: 5
"#,
        );

        let settings = SettingsLoader::load(file.path()).unwrap();

        assert_eq!(settings.origin_zip, "90001");
        assert_eq!(settings.dim_divisor, dec("166"));
        assert_eq!(settings.fuel_surcharge_pct, dec("14.5"));
        assert_eq!(settings.remote_surcharge, dec("12"));
        assert_eq!(settings.das_surcharge, dec("1.98"));
        assert_eq!(settings.default_markup_pct, dec("5"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = SettingsLoader::load("/nonexistent/settings.yaml");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_malformed_yaml() {
        let file = write_temp("dim_divisor: [not, a, number\n");

        let result = SettingsLoader::load(file.path());

        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_invalid_values() {
        let file = write_temp("dim_divisor: 0\n");

        let result = SettingsLoader::load(file.path());

        assert!(matches!(result, Err(EngineError::InvalidSettings { .. })));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = SettingsLoader::from_yaml_str("{}").unwrap();
        assert_eq!(settings.dim_divisor, dec("139"));
    }

    #[test]
    fn test_from_yaml_str_rejects_negative_surcharge() {
        let result = SettingsLoader::from_yaml_str("das_surcharge: -1.98\n");
        match result {
            Err(EngineError::InvalidSettings { field, .. }) => {
                assert_eq!(field, "das_surcharge");
            }
            other => panic!("expected InvalidSettings, got {other:?}"),
        }
    }
}
