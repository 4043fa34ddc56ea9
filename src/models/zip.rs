//! Postal code normalization.
//!
//! Zip codes arrive from spreadsheets in every shape imaginable: with ZIP+4
//! suffixes, with leading zeros stripped by a numeric column, with stray
//! whitespace. [`ZipCode::normalize`] reduces all of them to a canonical
//! five-digit code whose first three digits are the sectional prefix used by
//! zone charts.

use serde::{Deserialize, Serialize};

/// Length of a normalized zip code.
pub const ZIP_LENGTH: usize = 5;

/// Length of the sectional prefix.
pub const PREFIX_LENGTH: usize = 3;

/// A normalized five-digit zip code.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::models::ZipCode;
///
/// let zip = ZipCode::normalize("02134-1234").unwrap();
/// assert_eq!(zip.as_str(), "02134");
/// assert_eq!(zip.prefix(), "021");
///
/// // Numeric spreadsheet columns drop leading zeros.
/// assert_eq!(ZipCode::normalize("2134").unwrap().as_str(), "02134");
/// assert!(ZipCode::normalize("n/a").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    /// Strips non-digits, then left-pads with zeros or truncates to five digits.
    ///
    /// Returns `None` when the input contains no digits at all.
    pub fn normalize(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }

        let zip = if digits.len() < ZIP_LENGTH {
            format!("{digits:0>width$}", width = ZIP_LENGTH)
        } else {
            digits[..ZIP_LENGTH].to_string()
        };

        Some(ZipCode(zip))
    }

    /// Returns the five-digit code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the three-digit sectional prefix.
    pub fn prefix(&self) -> &str {
        &self.0[..PREFIX_LENGTH]
    }
}

impl std::fmt::Display for ZipCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `value` is exactly `len` ASCII digits.
pub(crate) fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}
