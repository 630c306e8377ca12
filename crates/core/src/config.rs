//! Run configuration
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides:
//!
//! ```json
//! { "fire": { "enabled": true, "spring_start": 90, "winter_start": 300 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core_types::DAYS_PER_YEAR;
use crate::error::{ClimateError, ClimateResult};

/// Fire season window and yearly seed values for the FWI carry-state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireWeatherConfig {
    /// Compute fire weather for daily input
    pub enabled: bool,
    /// First in-season day (0-based, inclusive)
    pub spring_start: usize,
    /// First day after the season (0-based, exclusive)
    pub winter_start: usize,
    pub ffmc_seed: f64,
    pub dmc_seed: f64,
    pub dc_seed: f64,
}

impl Default for FireWeatherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            spring_start: 0,
            winter_start: DAYS_PER_YEAR,
            ffmc_seed: 85.0,
            dmc_seed: 6.0,
            dc_seed: 15.0,
        }
    }
}

/// Settings shared by the processing passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    /// Surface pressure for the humidity conversions (kPa)
    pub atmospheric_pressure_kpa: f64,
    pub fire: FireWeatherConfig,
    /// SPEI accumulation window (months)
    pub spei_window_months: usize,
    /// Site latitude for Thornthwaite day lengths; 12 h days when absent
    pub latitude_degrees: Option<f64>,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            atmospheric_pressure_kpa: 101.325,
            fire: FireWeatherConfig::default(),
            spei_window_months: 3,
            latitude_degrees: None,
        }
    }
}

impl ClimateConfig {
    /// Load from a JSON file and validate
    ///
    /// # Errors
    ///
    /// [`ClimateError::Io`] if the file cannot be read,
    /// [`ClimateError::ConfigParse`] if it is not valid JSON for this type,
    /// and any [`ClimateConfig::validate`] failure.
    pub fn from_json_file(path: &Path) -> ClimateResult<Self> {
        let file = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ClimateError::Io {
            file: file.clone(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| ClimateError::ConfigParse { file, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce a meaningful run
    ///
    /// # Errors
    ///
    /// [`ClimateError::Config`] naming the first offending field.
    pub fn validate(&self) -> ClimateResult<()> {
        let fail = |field: &'static str, reason: String| -> ClimateResult<()> {
            Err(ClimateError::Config { field, reason })
        };

        if self.atmospheric_pressure_kpa <= 0.0 || !self.atmospheric_pressure_kpa.is_finite() {
            return fail(
                "atmospheric_pressure_kpa",
                format!("must be positive, got {}", self.atmospheric_pressure_kpa),
            );
        }
        if self.spei_window_months == 0 {
            return fail("spei_window_months", "must be at least 1".to_string());
        }
        if let Some(latitude) = self.latitude_degrees {
            if !(-90.0..=90.0).contains(&latitude) {
                return fail(
                    "latitude_degrees",
                    format!("must lie in [-90, 90], got {}", latitude),
                );
            }
        }

        let fire = &self.fire;
        if fire.winter_start > DAYS_PER_YEAR {
            return fail(
                "fire.winter_start",
                format!("must be at most {}, got {}", DAYS_PER_YEAR, fire.winter_start),
            );
        }
        if fire.spring_start >= fire.winter_start {
            return fail(
                "fire.spring_start",
                format!(
                    "must be before winter_start ({}), got {}",
                    fire.winter_start, fire.spring_start
                ),
            );
        }
        if !(0.0..=101.0).contains(&fire.ffmc_seed) {
            return fail(
                "fire.ffmc_seed",
                format!("must lie in [0, 101], got {}", fire.ffmc_seed),
            );
        }
        if fire.dmc_seed < 0.0 || !fire.dmc_seed.is_finite() {
            return fail(
                "fire.dmc_seed",
                format!("must be non-negative, got {}", fire.dmc_seed),
            );
        }
        if fire.dc_seed < 0.0 || !fire.dc_seed.is_finite() {
            return fail(
                "fire.dc_seed",
                format!("must be non-negative, got {}", fire.dc_seed),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClimateConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.fire.enabled);
        assert_eq!(config.fire.winter_start, 365);
        assert_eq!(config.spei_window_months, 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ClimateConfig =
            serde_json::from_str(r#"{ "fire": { "enabled": true, "spring_start": 90 } }"#).unwrap();
        assert!(config.fire.enabled);
        assert_eq!(config.fire.spring_start, 90);
        assert_eq!(config.fire.winter_start, 365);
        assert_eq!(config.fire.ffmc_seed, 85.0);
        assert_eq!(config.atmospheric_pressure_kpa, 101.325);
    }

    #[test]
    fn test_validate_names_offending_field() {
        let mut config = ClimateConfig::default();
        config.fire.spring_start = 200;
        config.fire.winter_start = 100;
        match config.validate() {
            Err(ClimateError::Config { field, .. }) => assert_eq!(field, "fire.spring_start"),
            other => panic!("expected config error, got {:?}", other),
        }

        let config = ClimateConfig {
            atmospheric_pressure_kpa: 0.0,
            ..ClimateConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClimateConfig {
            latitude_degrees: Some(95.0),
            ..ClimateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ClimateConfig::from_json_file(Path::new("/nonexistent/climate.json")).unwrap_err();
        assert!(matches!(err, ClimateError::Io { .. }));
    }
}
