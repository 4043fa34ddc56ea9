//! Delivery-area surcharge calculation functionality.
//!
//! DAS, EDAS and remote surcharges are flat amounts keyed on the destination
//! zip. They are independent: a zip on two lists pays both.

use crate::config::RateSettings;
use crate::models::{AuditStep, SurchargeBreakdown, SurchargeKind};
use crate::reference::{RateTableIndex, SurchargeFlags};

/// The result of the surcharge step, including the audit step.
#[derive(Debug, Clone)]
pub struct SurchargeResult {
    /// Which lists the destination is on.
    pub flags: SurchargeFlags,
    /// Applied surcharges and their total.
    pub surcharges: SurchargeBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the surcharges due for a destination zip.
///
/// Never fails; a destination on no list yields an empty breakdown.
///
/// # Examples
///
/// ```no_run
/// use parcel_rate_engine::calculation::calculate_surcharges;
/// use parcel_rate_engine::config::RateSettings;
/// use parcel_rate_engine::reference::RateTableIndex;
///
/// let index = RateTableIndex::load_dir("./data/reference")?;
/// let result = calculate_surcharges("99501", &RateSettings::default(), &index, 4);
/// println!("surcharges: ${}", result.surcharges.amount);
/// # Ok::<(), parcel_rate_engine::error::EngineError>(())
/// ```
pub fn calculate_surcharges(
    destination_zip: &str,
    settings: &RateSettings,
    index: &RateTableIndex,
    step_number: u32,
) -> SurchargeResult {
    let flags = index.surcharge_flags(destination_zip);

    let mut surcharges = SurchargeBreakdown::default();
    let schedule = [
        (flags.is_das, SurchargeKind::Das, settings.das_surcharge),
        (flags.is_edas, SurchargeKind::Edas, settings.edas_surcharge),
        (flags.is_remote, SurchargeKind::Remote, settings.remote_surcharge),
    ];
    for (applies, kind, amount) in schedule {
        if applies {
            surcharges.add(kind, amount);
        }
    }

    let reasoning = if surcharges.is_empty() {
        format!("{destination_zip} is not in a surcharged delivery area")
    } else {
        let parts: Vec<String> = surcharges
            .items
            .iter()
            .map(|item| format!("{} ${}", item.label, item.amount.normalize()))
            .collect();
        format!(
            "{} = ${}",
            parts.join(" + "),
            surcharges.amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "delivery_area_surcharges".to_string(),
        rule_name: "Delivery Area Surcharges".to_string(),
        input: serde_json::json!({
            "destination_zip": destination_zip,
            "is_das": flags.is_das,
            "is_edas": flags.is_edas,
            "is_remote": flags.is_remote
        }),
        output: serde_json::json!({
            "items": surcharges
                .items
                .iter()
                .map(|item| serde_json::json!({
                    "kind": item.kind,
                    "amount": item.amount.normalize().to_string()
                }))
                .collect::<Vec<_>>(),
            "total": surcharges.amount.normalize().to_string()
        }),
        reasoning,
    };

    SurchargeResult {
        flags,
        surcharges,
        audit_step,
    }
}

/// Returns the surcharge breakdown for a destination zip, without an audit step.
pub fn surcharges(
    destination_zip: &str,
    settings: &RateSettings,
    index: &RateTableIndex,
) -> SurchargeBreakdown {
    calculate_surcharges(destination_zip, settings, index, 0).surcharges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::test_support::sample_dataset;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn index() -> RateTableIndex {
        RateTableIndex::load(&sample_dataset()).unwrap()
    }

    #[test]
    fn test_no_surcharge() {
        let result = calculate_surcharges("10001", &RateSettings::default(), &index(), 4);

        assert!(!result.flags.any());
        assert!(result.surcharges.is_empty());
        assert_eq!(result.surcharges.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("not in a surcharged"));
    }

    #[test]
    fn test_remote_only() {
        let result = calculate_surcharges("04652", &RateSettings::default(), &index(), 4);

        assert_eq!(result.surcharges.amount, dec("14.15"));
        assert_eq!(result.surcharges.items.len(), 1);
        assert_eq!(result.surcharges.items[0].kind, SurchargeKind::Remote);
    }

    #[test]
    fn test_das_and_remote_are_additive() {
        let settings = RateSettings::default();
        let result = calculate_surcharges("99501", &settings, &index(), 4);

        assert_eq!(
            result.surcharges.amount,
            settings.das_surcharge + settings.remote_surcharge
        );
        assert_eq!(result.surcharges.get(SurchargeKind::Das), Some(dec("1.98")));
        assert_eq!(
            result.surcharges.get(SurchargeKind::Remote),
            Some(dec("14.15"))
        );
        assert_eq!(result.audit_step.output["total"], "16.13");
        assert_eq!(result.audit_step.output["items"][0]["kind"], "das");
    }

    #[test]
    fn test_uses_configured_amounts() {
        let settings = RateSettings {
            edas_surcharge: dec("5.25"),
            ..RateSettings::default()
        };

        let breakdown = surcharges("60699", &settings, &index());
        assert_eq!(breakdown.amount, dec("5.25"));
        assert_eq!(breakdown.items[0].kind, SurchargeKind::Edas);
    }

    #[test]
    fn test_alaska_prefix_is_remote() {
        let result = calculate_surcharges("99577", &RateSettings::default(), &index(), 4);

        assert!(result.flags.is_remote);
        assert!(!result.flags.is_das);
    }

    #[test]
    fn test_unparseable_zip_has_no_surcharge() {
        let breakdown = surcharges("", &RateSettings::default(), &index());
        assert_eq!(breakdown.amount, Decimal::ZERO);
        assert!(breakdown.is_empty());
    }
}
