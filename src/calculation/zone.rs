//! Zone resolution functionality.

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ZipCode, Zone};
use crate::reference::RateTableIndex;

/// The result of resolving a shipping zone, including the audit step.
#[derive(Debug, Clone)]
pub struct ZoneResolution {
    /// The resolved zone.
    pub zone: Zone,
    /// Normalized origin zip.
    pub origin: ZipCode,
    /// Normalized destination zip.
    pub destination: ZipCode,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Resolves the zone between two zips as uploaded.
///
/// Both zips are normalized first (non-digits stripped, padded or truncated
/// to five digits). The origin's three-digit prefix selects the zone chart
/// rows; a full-zip destination entry wins over a prefix entry.
///
/// # Errors
///
/// `ZoneNotFound` carrying the zips as supplied when either zip has no digits
/// or the chart has no matching entry.
///
/// # Examples
///
/// ```no_run
/// use parcel_rate_engine::calculation::resolve_zone;
/// use parcel_rate_engine::reference::RateTableIndex;
///
/// let index = RateTableIndex::load_dir("./data/reference")?;
/// let resolution = resolve_zone("10001", "04652-1234", &index, 1)?;
/// assert_eq!(resolution.destination.as_str(), "04652");
/// # Ok::<(), parcel_rate_engine::error::EngineError>(())
/// ```
pub fn resolve_zone(
    origin_zip: &str,
    destination_zip: &str,
    index: &RateTableIndex,
    step_number: u32,
) -> EngineResult<ZoneResolution> {
    let not_found = || EngineError::ZoneNotFound {
        origin: origin_zip.to_string(),
        destination: destination_zip.to_string(),
    };

    let origin = ZipCode::normalize(origin_zip).ok_or_else(not_found)?;
    let destination = ZipCode::normalize(destination_zip).ok_or_else(not_found)?;
    let zone = index
        .zone(origin.prefix(), &destination)
        .map_err(|_| not_found())?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "zone_resolution".to_string(),
        rule_name: "Zone Resolution".to_string(),
        input: serde_json::json!({
            "origin_zip": origin_zip,
            "destination_zip": destination_zip
        }),
        output: serde_json::json!({
            "origin_prefix": origin.prefix(),
            "destination": destination.as_str(),
            "zone": zone.get()
        }),
        reasoning: format!(
            "Origin prefix {} to destination {} is zone {}",
            origin.prefix(),
            destination,
            zone
        ),
    };

    Ok(ZoneResolution {
        zone,
        origin,
        destination,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::test_support::sample_dataset;

    fn index() -> RateTableIndex {
        RateTableIndex::load(&sample_dataset()).unwrap()
    }

    #[test]
    fn test_resolves_prefix_entry() {
        let resolution = resolve_zone("10001", "04652", &index(), 2).unwrap();

        assert_eq!(resolution.zone.get(), 4);
        assert_eq!(resolution.origin.prefix(), "100");
        assert_eq!(resolution.audit_step.step_number, 2);
        assert_eq!(resolution.audit_step.rule_id, "zone_resolution");
        assert_eq!(resolution.audit_step.output["zone"], 4);
    }

    #[test]
    fn test_normalizes_messy_zips() {
        let resolution = resolve_zone(" 10001-0001 ", "4652", &index(), 1).unwrap();

        assert_eq!(resolution.zone.get(), 4);
        assert_eq!(resolution.destination.as_str(), "04652");
    }

    #[test]
    fn test_more_specific_entry_wins() {
        let index = index();

        assert_eq!(resolve_zone("10001", "60614", &index, 1).unwrap().zone.get(), 6);
        assert_eq!(resolve_zone("10001", "60615", &index, 1).unwrap().zone.get(), 5);
    }

    #[test]
    fn test_unknown_pair_reports_raw_zips() {
        let err = resolve_zone("10001", "30301-1111", &index(), 1).unwrap_err();

        assert_eq!(
            err,
            EngineError::ZoneNotFound {
                origin: "10001".to_string(),
                destination: "30301-1111".to_string(),
            }
        );
    }

    #[test]
    fn test_destination_without_digits() {
        let err = resolve_zone("10001", "TBD", &index(), 1).unwrap_err();
        assert!(matches!(err, EngineError::ZoneNotFound { .. }));
    }
}
