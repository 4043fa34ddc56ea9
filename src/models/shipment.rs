//! Shipment input models.
//!
//! A [`ShipmentRecord`] is one normalized row of an uploaded shipment file.
//! Column mapping happens upstream; by the time a record reaches the engine
//! every field has its canonical name and monetary/weight values are decimals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The service level a shipment was declared with.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::models::ServiceLevel;
///
/// assert_eq!(ServiceLevel::from_declared("Ground"), Some(ServiceLevel::Standard));
/// assert_eq!(ServiceLevel::from_declared("2-Day"), Some(ServiceLevel::Expedited));
/// assert_eq!(ServiceLevel::from_declared("Overnight"), Some(ServiceLevel::NextDay));
/// assert_eq!(ServiceLevel::from_declared("freight"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    /// Ground / economy service.
    Standard,
    /// Two-day service.
    Expedited,
    /// Three-day service.
    Priority,
    /// Overnight service.
    NextDay,
}

impl ServiceLevel {
    /// All service levels, cheapest first.
    pub const ALL: [ServiceLevel; 4] = [
        ServiceLevel::Standard,
        ServiceLevel::Expedited,
        ServiceLevel::Priority,
        ServiceLevel::NextDay,
    ];

    /// Returns the canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLevel::Standard => "standard",
            ServiceLevel::Expedited => "expedited",
            ServiceLevel::Priority => "priority",
            ServiceLevel::NextDay => "next_day",
        }
    }

    /// Names shippers commonly use for this level.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ServiceLevel::Standard => &[
                "standard", "std", "regular", "ground", "normal", "basic", "economy", "eco",
            ],
            ServiceLevel::Expedited => &[
                "expedited", "exp", "express", "2day", "2-day", "second day", "2nd day",
                "two day", "fast", "quick", "rapid",
            ],
            ServiceLevel::Priority => &[
                "priority", "prio", "3day", "3-day", "third day", "3rd day", "three day",
            ],
            ServiceLevel::NextDay => &[
                "next_day", "next day", "overnight", "next", "1day", "first day", "1st day",
                "one day", "urgent", "same day",
            ],
        }
    }

    /// Matches a declared service level against the alias lists.
    ///
    /// Matching ignores case, whitespace and punctuation, so `"2 Day"`,
    /// `"2-day"` and `"2DAY"` are all expedited. Returns `None` when nothing
    /// matches.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let wanted = alias_key(declared);
        if wanted.is_empty() {
            return None;
        }

        Self::ALL.into_iter().find(|level| {
            level
                .aliases()
                .iter()
                .any(|alias| alias_key(alias) == wanted)
        })
    }
}

impl std::fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn alias_key(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Package dimensions in inches. Any side may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Length in inches.
    pub length: Option<Decimal>,
    /// Width in inches.
    pub width: Option<Decimal>,
    /// Height in inches.
    pub height: Option<Decimal>,
}

impl Dimensions {
    /// Creates a fully specified set of dimensions.
    pub fn new(length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            length: Some(length),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Returns true when all three sides are present and positive.
    pub fn is_measured(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .all(|side| side.is_some_and(|value| value > Decimal::ZERO))
    }

    /// Returns `L * W * H`.
    ///
    /// `None` if any side is missing or not positive, or if the product
    /// leaves decimal range; [`is_measured`](Self::is_measured) tells the
    /// two apart.
    pub fn volume(&self) -> Option<Decimal> {
        if !self.is_measured() {
            return None;
        }
        let (length, width, height) = (self.length?, self.width?, self.height?);
        length.checked_mul(width)?.checked_mul(height)
    }
}

/// One normalized shipment row.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::models::ShipmentRecord;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let record = ShipmentRecord::new(
///     "1Z001",
///     Decimal::from_str("5").unwrap(),
///     "04652",
///     Decimal::from_str("40.00").unwrap(),
/// )
/// .with_service_level("ground");
///
/// assert_eq!(record.service_level.as_deref(), Some("ground"));
/// assert!(record.dimensions().volume().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Tracking number or shipper reference.
    pub id: String,
    /// Actual weight in pounds.
    #[serde(default)]
    pub weight: Option<Decimal>,
    /// Package length in inches.
    #[serde(default)]
    pub length: Option<Decimal>,
    /// Package width in inches.
    #[serde(default)]
    pub width: Option<Decimal>,
    /// Package height in inches.
    #[serde(default)]
    pub height: Option<Decimal>,
    /// Destination zip as uploaded.
    #[serde(default)]
    pub destination_zip: Option<String>,
    /// Origin zip; falls back to the analysis origin when absent.
    #[serde(default)]
    pub origin_zip: Option<String>,
    /// Declared service level as uploaded.
    #[serde(default)]
    pub service_level: Option<String>,
    /// What the shipper currently pays for this shipment.
    pub current_cost: Decimal,
}

impl ShipmentRecord {
    /// Creates a record without dimensions, origin override or service level.
    pub fn new(
        id: impl Into<String>,
        weight: Decimal,
        destination_zip: impl Into<String>,
        current_cost: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            weight: Some(weight),
            length: None,
            width: None,
            height: None,
            destination_zip: Some(destination_zip.into()),
            origin_zip: None,
            service_level: None,
            current_cost,
        }
    }

    /// Sets the package dimensions.
    pub fn with_dimensions(mut self, length: Decimal, width: Decimal, height: Decimal) -> Self {
        self.length = Some(length);
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the declared service level.
    pub fn with_service_level(mut self, level: impl Into<String>) -> Self {
        self.service_level = Some(level.into());
        self
    }

    /// Sets a per-row origin zip.
    pub fn with_origin(mut self, origin_zip: impl Into<String>) -> Self {
        self.origin_zip = Some(origin_zip.into());
        self
    }

    /// Returns the package dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            length: self.length,
            width: self.width,
            height: self.height,
        }
    }
}
