//! Base rate lookup functionality.
//!
//! This module looks up the carrier's published base rate for a zone and a
//! rated weight, recording which weight tier the shipment fell into.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, Zone};
use crate::reference::RateTableIndex;

/// The result of a base rate lookup, including the rate and audit step.
#[derive(Debug, Clone)]
pub struct BaseRateLookupResult {
    /// The weight tier the rated weight fell into.
    pub tier: Decimal,
    /// The base rate for the zone at that tier.
    pub rate: Decimal,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Looks up the base rate for a zone and rated weight.
///
/// # Arguments
///
/// * `zone` - The resolved shipping zone
/// * `rated_weight` - The billable weight, already rounded up to a whole pound
/// * `index` - The carrier's rate tables
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `BaseRateLookupResult`, or `RateNotFound` if the weight is
/// heavier than the heaviest tabulated tier.
pub fn get_base_rate(
    zone: Zone,
    rated_weight: Decimal,
    index: &RateTableIndex,
    step_number: u32,
) -> EngineResult<BaseRateLookupResult> {
    let entry = index.base_rate_entry(zone, rated_weight)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_rate_lookup".to_string(),
        rule_name: "Base Rate Lookup".to_string(),
        input: serde_json::json!({
            "zone": zone.get(),
            "rated_weight": rated_weight.normalize().to_string()
        }),
        output: serde_json::json!({
            "weight_tier": entry.tier.normalize().to_string(),
            "rate": entry.rate.normalize().to_string()
        }),
        reasoning: format!(
            "Zone {} at {} lbs (tier {} lbs) = ${}",
            zone,
            rated_weight.normalize(),
            entry.tier.normalize(),
            entry.rate.normalize()
        ),
    };

    Ok(BaseRateLookupResult {
        tier: entry.tier,
        rate: entry.rate,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::reference::test_support::sample_dataset;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn index() -> RateTableIndex {
        RateTableIndex::load(&sample_dataset()).unwrap()
    }

    #[test]
    fn test_lookup_zone_4_tier_5() {
        let result = get_base_rate(Zone::new(4).unwrap(), dec("5"), &index(), 3).unwrap();

        assert_eq!(result.rate, dec("8.00"));
        assert_eq!(result.tier, dec("5"));
        assert_eq!(result.audit_step.rule_id, "base_rate_lookup");
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.output["rate"], "8");
        assert_eq!(result.audit_step.input["zone"], 4);
    }

    #[test]
    fn test_lookup_between_tiers_uses_heavier_tier() {
        let result = get_base_rate(Zone::new(1).unwrap(), dec("4"), &index(), 3).unwrap();

        assert_eq!(result.tier, dec("5"));
        assert_eq!(result.rate, dec("6.40"));
        assert!(result.audit_step.reasoning.contains("tier 5 lbs"));
    }

    #[test]
    fn test_lookup_too_heavy() {
        let result = get_base_rate(Zone::new(2).unwrap(), dec("151"), &index(), 3);

        assert!(matches!(result, Err(EngineError::RateNotFound { .. })));
    }
}
