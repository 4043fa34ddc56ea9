//! Error types for the parcel rate engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Errors fall into two groups: fatal errors that abort an analysis before
//! any shipment is rated (dataset and settings problems), and row-level
//! errors that are captured into a single shipment's result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Zone;

/// The main error type for the parcel rate engine.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A settings file was not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A settings file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The reference dataset does not match the expected sheet schema.
    #[error("Reference data error in sheet '{sheet}': {message}")]
    DataLoad {
        /// The sheet that failed validation.
        sheet: String,
        /// A description of what was wrong.
        message: String,
    },

    /// A rate setting is out of its allowed range.
    #[error("Invalid setting '{field}': {message}")]
    InvalidSettings {
        /// The offending settings field.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A shipment record failed input validation.
    #[error("Invalid shipment '{record_id}' field '{field}': {message}")]
    Validation {
        /// The tracking/reference id of the record.
        record_id: String,
        /// The field that failed validation.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No zone chart entry matches the origin/destination pair.
    #[error("No zone found from origin '{origin}' to destination '{destination}'")]
    ZoneNotFound {
        /// The origin zip as supplied.
        origin: String,
        /// The destination zip as supplied.
        destination: String,
    },

    /// The billable weight falls outside the tabulated weight tiers.
    #[error("No base rate for zone {zone} at {weight} lbs")]
    RateNotFound {
        /// The zone that was looked up.
        zone: Zone,
        /// The billable weight that was looked up.
        weight: Decimal,
    },

    /// A monetary or weight figure for one row exceeded decimal range.
    #[error("Amount out of range computing {quantity}")]
    AmountOverflow {
        /// The figure that could not be represented.
        quantity: String,
    },

    /// The batch was cancelled between rows.
    #[error("Analysis cancelled after {completed} rows")]
    Cancelled {
        /// Number of rows that finished before the stop signal was seen.
        completed: usize,
    },
}

impl EngineError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorCode::ConfigError
            }
            EngineError::DataLoad { .. } => ErrorCode::DataLoadError,
            EngineError::InvalidSettings { .. } => ErrorCode::InvalidSettings,
            EngineError::Validation { .. } => ErrorCode::ValidationError,
            EngineError::ZoneNotFound { .. } => ErrorCode::ZoneNotFound,
            EngineError::RateNotFound { .. } => ErrorCode::RateNotFound,
            EngineError::AmountOverflow { .. } => ErrorCode::AmountOverflow,
            EngineError::Cancelled { .. } => ErrorCode::Cancelled,
        }
    }

    /// Returns true if this error aborts an analysis instead of failing one row.
    pub fn is_fatal(&self) -> bool {
        !self.code().is_row_level()
    }

    pub(crate) fn data_load(sheet: &str, message: impl Into<String>) -> Self {
        EngineError::DataLoad {
            sheet: sheet.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn overflow(quantity: &str) -> Self {
        EngineError::AmountOverflow {
            quantity: quantity.to_string(),
        }
    }

    pub(crate) fn invalid_setting(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidSettings {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Machine-readable error code.
///
/// Row-level codes end up in a shipment's result and in the analysis
/// summary; the remaining codes only ever surface from a failed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A settings or dataset file was missing or unreadable.
    ConfigError,
    /// The reference dataset failed schema validation.
    DataLoadError,
    /// Rate settings were out of range.
    InvalidSettings,
    /// The record itself was invalid (non-positive weight, missing destination, ...).
    ValidationError,
    /// The origin/destination pair could not be resolved to a zone.
    ZoneNotFound,
    /// The billable weight is outside the rate table.
    RateNotFound,
    /// A figure for the row exceeded decimal range.
    AmountOverflow,
    /// The batch was stopped before every row ran.
    Cancelled,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::DataLoadError => "DATA_LOAD_ERROR",
            ErrorCode::InvalidSettings => "INVALID_SETTINGS",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ZoneNotFound => "ZONE_NOT_FOUND",
            ErrorCode::RateNotFound => "RATE_NOT_FOUND",
            ErrorCode::AmountOverflow => "AMOUNT_OVERFLOW",
            ErrorCode::Cancelled => "CANCELLED",
        }
    }

    /// Returns true for codes that fail a single row without stopping the batch.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationError
                | ErrorCode::ZoneNotFound
                | ErrorCode::RateNotFound
                | ErrorCode::AmountOverflow
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
