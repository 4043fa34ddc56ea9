//! Configuration types for rate analysis.
//!
//! This module contains the strongly-typed settings structures that are
//! deserialized from YAML settings files. Every field has a default, so a
//! settings file only needs to list what it overrides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{PREFIX_LENGTH, ServiceLevel};

/// Markup percentage per service level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceLevelMarkups {
    /// Ground service markup, in percent.
    pub standard: Decimal,
    /// Two-day service markup, in percent.
    pub expedited: Decimal,
    /// Three-day service markup, in percent.
    pub priority: Decimal,
    /// Overnight service markup, in percent.
    pub next_day: Decimal,
}

impl ServiceLevelMarkups {
    /// Returns the markup percentage for a service level.
    pub fn get(&self, level: ServiceLevel) -> Decimal {
        match level {
            ServiceLevel::Standard => self.standard,
            ServiceLevel::Expedited => self.expedited,
            ServiceLevel::Priority => self.priority,
            ServiceLevel::NextDay => self.next_day,
        }
    }
}

impl Default for ServiceLevelMarkups {
    fn default() -> Self {
        Self {
            standard: Decimal::ZERO,
            expedited: Decimal::from(10),
            priority: Decimal::from(15),
            next_day: Decimal::from(25),
        }
    }
}

/// Largest percentage or flat surcharge a settings file may carry.
pub const MAX_SETTING_VALUE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Settings for one analysis run.
///
/// Percentages are expressed as whole percents (`16` means 16%). Surcharge
/// amounts are flat dollar figures.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::config::RateSettings;
/// use rust_decimal::Decimal;
///
/// let settings = RateSettings::default();
/// assert_eq!(settings.origin_zip, "10001");
/// assert_eq!(settings.dim_divisor, Decimal::from(139));
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSettings {
    /// Zip the shipments leave from unless a row overrides it.
    pub origin_zip: String,
    /// Cubic inches per dimensional pound.
    pub dim_divisor: Decimal,
    /// Fuel surcharge, in percent of base rate plus surcharges.
    pub fuel_surcharge_pct: Decimal,
    /// Flat Delivery Area Surcharge.
    pub das_surcharge: Decimal,
    /// Flat Extended Delivery Area Surcharge.
    pub edas_surcharge: Decimal,
    /// Flat Remote Area Surcharge.
    pub remote_surcharge: Decimal,
    /// Markup per recognized service level.
    pub service_level_markups: ServiceLevelMarkups,
    /// Markup applied when the declared service level is not recognized.
    pub default_markup_pct: Decimal,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            origin_zip: "10001".to_string(),
            dim_divisor: Decimal::from(139),
            fuel_surcharge_pct: Decimal::from(16),
            das_surcharge: Decimal::new(198, 2),
            edas_surcharge: Decimal::new(392, 2),
            remote_surcharge: Decimal::new(1415, 2),
            service_level_markups: ServiceLevelMarkups::default(),
            default_markup_pct: Decimal::from(10),
        }
    }
}

impl RateSettings {
    /// Checks every setting is in range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` naming the first offending field. Percentages
    /// and surcharges must lie in `0..=MAX_SETTING_VALUE`.
    pub fn validate(&self) -> EngineResult<()> {
        let origin_digits = self.origin_zip.chars().filter(char::is_ascii_digit).count();
        if origin_digits < PREFIX_LENGTH {
            return Err(EngineError::invalid_setting(
                "origin_zip",
                format!("'{}' is not a zip code", self.origin_zip),
            ));
        }

        if self.dim_divisor <= Decimal::ZERO {
            return Err(EngineError::invalid_setting(
                "dim_divisor",
                format!("must be greater than zero, got {}", self.dim_divisor),
            ));
        }

        let bounded = [
            ("fuel_surcharge_pct", self.fuel_surcharge_pct),
            ("das_surcharge", self.das_surcharge),
            ("edas_surcharge", self.edas_surcharge),
            ("remote_surcharge", self.remote_surcharge),
            (
                "service_level_markups.standard",
                self.service_level_markups.standard,
            ),
            (
                "service_level_markups.expedited",
                self.service_level_markups.expedited,
            ),
            (
                "service_level_markups.priority",
                self.service_level_markups.priority,
            ),
            (
                "service_level_markups.next_day",
                self.service_level_markups.next_day,
            ),
            ("default_markup_pct", self.default_markup_pct),
        ];

        for (field, value) in bounded {
            if value < Decimal::ZERO {
                return Err(EngineError::invalid_setting(
                    field,
                    format!("must not be negative, got {value}"),
                ));
            }
            if value > MAX_SETTING_VALUE {
                return Err(EngineError::invalid_setting(
                    field,
                    format!("must not exceed {MAX_SETTING_VALUE}, got {value}"),
                ));
            }
        }

        Ok(())
    }
}
