//! Shipping zone model.

use serde::{Deserialize, Serialize};

/// A carrier shipping zone, always in the range 1 through 8.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::models::Zone;
///
/// let zone = Zone::new(4).unwrap();
/// assert_eq!(zone.get(), 4);
/// assert_eq!(zone.to_string(), "4");
/// assert!(Zone::new(9).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Zone(u8);

impl Zone {
    /// The lowest zone number.
    pub const MIN: u8 = 1;
    /// The highest zone number.
    pub const MAX: u8 = 8;
    /// Number of zones in a rate table.
    pub const COUNT: usize = 8;

    /// Creates a zone, returning `None` outside 1..=8.
    pub fn new(number: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&number).then_some(Zone(number))
    }

    /// Returns the zone number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Iterates all zones in ascending order.
    pub fn all() -> impl Iterator<Item = Zone> {
        (Self::MIN..=Self::MAX).map(Zone)
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }
}

impl TryFrom<u8> for Zone {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Zone::new(number).ok_or_else(|| format!("zone must be between 1 and 8, got {number}"))
    }
}

impl From<Zone> for u8 {
    fn from(zone: Zone) -> u8 {
        zone.0
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
