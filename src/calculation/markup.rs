//! Service-level markup calculation functionality.
//!
//! The comparison carrier prices faster service higher. Each recognized
//! service level carries its own markup percentage; a shipment declared with
//! no service level is priced as standard, and one declared with a level the
//! engine cannot recognize falls back to the default markup.

use rust_decimal::Decimal;

use super::money::{percentage, sum};
use crate::config::RateSettings;
use crate::error::EngineResult;
use crate::models::{AuditStep, ServiceLevel};

/// Where a markup percentage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupSource {
    /// The declared or implied service level's configured markup.
    ServiceLevel(ServiceLevel),
    /// The default markup for an unrecognized declared level.
    Default,
}

/// The markup percentage chosen for a declared service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupSelection {
    /// The recognized service level, if any.
    pub service_level: Option<ServiceLevel>,
    /// Markup percentage to apply.
    pub markup_pct: Decimal,
    /// Where the percentage came from.
    pub source: MarkupSource,
}

/// Chooses the markup percentage for a declared service level.
///
/// # Examples
///
/// ```
/// use parcel_rate_engine::calculation::select_markup;
/// use parcel_rate_engine::config::RateSettings;
/// use parcel_rate_engine::models::ServiceLevel;
/// use rust_decimal::Decimal;
///
/// let settings = RateSettings::default();
///
/// let selection = select_markup(Some("2-day"), &settings);
/// assert_eq!(selection.service_level, Some(ServiceLevel::Expedited));
/// assert_eq!(selection.markup_pct, Decimal::from(10));
///
/// let selection = select_markup(None, &settings);
/// assert_eq!(selection.service_level, Some(ServiceLevel::Standard));
/// ```
pub fn select_markup(declared: Option<&str>, settings: &RateSettings) -> MarkupSelection {
    let declared = declared.map(str::trim).filter(|value| !value.is_empty());

    let service_level = match declared {
        None => Some(ServiceLevel::Standard),
        Some(value) => ServiceLevel::from_declared(value),
    };

    match service_level {
        Some(level) => MarkupSelection {
            service_level: Some(level),
            markup_pct: settings.service_level_markups.get(level),
            source: MarkupSource::ServiceLevel(level),
        },
        None => MarkupSelection {
            service_level: None,
            markup_pct: settings.default_markup_pct,
            source: MarkupSource::Default,
        },
    }
}

/// The result of applying the service-level markup, including the audit step.
#[derive(Debug, Clone)]
pub struct MarkupResult {
    /// The chosen markup.
    pub selection: MarkupSelection,
    /// The markup amount.
    pub markup_amount: Decimal,
    /// Final alternative cost.
    pub final_cost: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies the service-level markup: `subtotal * (1 + markup_pct / 100)`.
///
/// # Errors
///
/// `AmountOverflow` if the markup or final cost leaves decimal range.
pub fn apply_markup(
    subtotal: Decimal,
    declared: Option<&str>,
    settings: &RateSettings,
    step_number: u32,
) -> EngineResult<MarkupResult> {
    let declared = declared.map(str::trim).filter(|value| !value.is_empty());
    let selection = select_markup(declared, settings);
    let markup_amount = percentage(subtotal, selection.markup_pct, "service level markup")?;
    let final_cost = sum(subtotal, markup_amount, "final cost")?;

    let source = match selection.source {
        MarkupSource::ServiceLevel(level) => level.as_str(),
        MarkupSource::Default => "default",
    };

    let reasoning = match (declared, selection.source) {
        (_, MarkupSource::Default) => format!(
            "Service level '{}' not recognized, default markup {}% applied",
            declared.unwrap_or_default(),
            selection.markup_pct.normalize()
        ),
        (None, MarkupSource::ServiceLevel(level)) => format!(
            "No service level declared, {} markup {}% applied",
            level,
            selection.markup_pct.normalize()
        ),
        (Some(value), MarkupSource::ServiceLevel(level)) => format!(
            "'{}' is {} service, markup {}% applied",
            value,
            level,
            selection.markup_pct.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "service_level_markup".to_string(),
        rule_name: "Service Level Markup".to_string(),
        input: serde_json::json!({
            "subtotal": subtotal.normalize().to_string(),
            "declared_service_level": declared
        }),
        output: serde_json::json!({
            "service_level": selection.service_level,
            "markup_source": source,
            "markup_pct": selection.markup_pct.normalize().to_string(),
            "markup_amount": markup_amount.normalize().to_string(),
            "final_cost": final_cost.normalize().to_string()
        }),
        reasoning,
    };

    Ok(MarkupResult {
        selection,
        markup_amount,
        final_cost,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_standard_has_no_markup_by_default() {
        let result =
            apply_markup(dec("25.694"), Some("standard"), &RateSettings::default(), 6).unwrap();

        assert_eq!(result.markup_amount, Decimal::ZERO);
        assert_eq!(result.final_cost, dec("25.694"));
        assert_eq!(
            result.selection.source,
            MarkupSource::ServiceLevel(ServiceLevel::Standard)
        );
    }

    #[test]
    fn test_each_level_uses_its_markup() {
        let settings = RateSettings::default();

        for (declared, pct) in [
            ("ground", "0"),
            ("express", "10"),
            ("3 day", "15"),
            ("overnight", "25"),
        ] {
            let selection = select_markup(Some(declared), &settings);
            assert_eq!(selection.markup_pct, dec(pct), "declared {declared:?}");
        }
    }

    #[test]
    fn test_next_day_markup_amount() {
        let result =
            apply_markup(dec("20"), Some("Next Day"), &RateSettings::default(), 6).unwrap();

        assert_eq!(result.markup_amount, dec("5"));
        assert_eq!(result.final_cost, dec("25"));
        assert_eq!(result.audit_step.output["service_level"], "next_day");
    }

    #[test]
    fn test_unrecognized_level_uses_default_markup() {
        let settings = RateSettings {
            default_markup_pct: dec("7.5"),
            ..RateSettings::default()
        };
        let result = apply_markup(dec("40"), Some("freight"), &settings, 6).unwrap();

        assert_eq!(result.selection.service_level, None);
        assert_eq!(result.selection.source, MarkupSource::Default);
        assert_eq!(result.markup_amount, dec("3"));
        assert_eq!(result.final_cost, dec("43"));
        assert_eq!(result.audit_step.output["markup_source"], "default");
        assert!(result.audit_step.reasoning.contains("'freight' not recognized"));
    }

    #[test]
    fn test_markup_overflow_is_an_error() {
        let result = apply_markup(Decimal::MAX, Some("overnight"), &RateSettings::default(), 6);

        assert_eq!(
            result.unwrap_err(),
            crate::error::EngineError::overflow("service level markup")
        );
    }

    #[test]
    fn test_missing_level_is_standard() {
        let settings = RateSettings::default();

        for declared in [None, Some(""), Some("   ")] {
            let selection = select_markup(declared, &settings);
            assert_eq!(selection.service_level, Some(ServiceLevel::Standard));
            assert_eq!(selection.markup_pct, Decimal::ZERO);
        }
    }
}
