//! Dimensional weight calculation functionality.
//!
//! Carriers bill light but bulky parcels on their volume. The dimensional
//! weight of a package is its cubic size divided by the carrier's divisor;
//! the billable weight is the greater of that and the actual weight.

use rust_decimal::Decimal;

use crate::models::{AuditStep, Dimensions};

/// Returns `L * W * H / divisor`, or zero when any side is missing or zero.
///
/// # Examples
///
/// ```
/// use parcel_rate_engine::calculation::dimensional_weight;
/// use parcel_rate_engine::models::Dimensions;
/// use rust_decimal::Decimal;
///
/// let dims = Dimensions::new(Decimal::from(10), Decimal::from(10), Decimal::from(10));
/// assert_eq!(dimensional_weight(&dims, Decimal::from(100)), Decimal::from(10));
/// assert_eq!(dimensional_weight(&Dimensions::default(), Decimal::from(100)), Decimal::ZERO);
/// ```
pub fn dimensional_weight(dimensions: &Dimensions, dim_divisor: Decimal) -> Decimal {
    dimensions
        .volume()
        .and_then(|volume| volume.checked_div(dim_divisor))
        .unwrap_or(Decimal::ZERO)
}

/// Returns the greater of actual and dimensional weight.
///
/// Assumes `actual_weight` has already been validated as positive.
///
/// # Examples
///
/// ```
/// use parcel_rate_engine::calculation::billable_weight;
/// use parcel_rate_engine::models::Dimensions;
/// use rust_decimal::Decimal;
///
/// let dims = Dimensions::new(Decimal::from(10), Decimal::from(10), Decimal::from(10));
/// assert_eq!(billable_weight(Decimal::ONE, &dims, Decimal::from(100)), Decimal::from(10));
/// ```
pub fn billable_weight(actual_weight: Decimal, dimensions: &Dimensions, dim_divisor: Decimal) -> Decimal {
    actual_weight.max(dimensional_weight(dimensions, dim_divisor))
}

/// The result of the billable weight step, including the audit step.
#[derive(Debug, Clone)]
pub struct BillableWeightResult {
    /// Dimensional weight, exact.
    pub dim_weight: Decimal,
    /// Greater of actual and dimensional weight, exact.
    pub billable_weight: Decimal,
    /// Billable weight rounded up to a whole pound, used for the rate lookup.
    pub rated_weight: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the billable weight and rounds it up to the next whole pound.
///
/// Rounding is always a ceiling: 5.01 lbs is rated as 6 lbs.
pub fn calculate_billable_weight(
    actual_weight: Decimal,
    dimensions: &Dimensions,
    dim_divisor: Decimal,
    step_number: u32,
) -> BillableWeightResult {
    let dim_weight = dimensional_weight(dimensions, dim_divisor);
    let billable = actual_weight.max(dim_weight);
    let rated_weight = billable.ceil();

    let basis = if dim_weight > actual_weight {
        "dimensional"
    } else {
        "actual"
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "billable_weight".to_string(),
        rule_name: "Billable Weight".to_string(),
        input: serde_json::json!({
            "actual_weight": actual_weight.normalize().to_string(),
            "length": dimensions.length.map(|v| v.normalize().to_string()),
            "width": dimensions.width.map(|v| v.normalize().to_string()),
            "height": dimensions.height.map(|v| v.normalize().to_string()),
            "dim_divisor": dim_divisor.normalize().to_string()
        }),
        output: serde_json::json!({
            "dim_weight": dim_weight.normalize().to_string(),
            "billable_weight": billable.normalize().to_string(),
            "rated_weight": rated_weight.normalize().to_string(),
            "basis": basis
        }),
        reasoning: format!(
            "max({} actual, {} dimensional) = {} lbs, rated at {} lbs",
            actual_weight.normalize(),
            dim_weight.round_dp(4).normalize(),
            billable.round_dp(4).normalize(),
            rated_weight.normalize()
        ),
    };

    BillableWeightResult {
        dim_weight,
        billable_weight: billable,
        rated_weight,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cube(side: &str) -> Dimensions {
        Dimensions::new(dec(side), dec(side), dec(side))
    }

    #[test]
    fn test_dimensional_weight_exceeds_actual() {
        assert_eq!(billable_weight(dec("1"), &cube("10"), dec("100")), dec("10"));
    }

    #[test]
    fn test_actual_weight_exceeds_dimensional() {
        let dims = Dimensions::new(dec("10"), dec("6"), dec("6.95"));
        assert_eq!(dimensional_weight(&dims, dec("139")), dec("3"));
        assert_eq!(billable_weight(dec("5"), &dims, dec("139")), dec("5"));
    }

    #[test]
    fn test_zero_dimensions_contribute_nothing() {
        assert_eq!(billable_weight(dec("2.5"), &cube("0"), dec("139")), dec("2.5"));
    }

    #[test]
    fn test_missing_dimension_contributes_nothing() {
        let dims = Dimensions {
            width: None,
            ..cube("20")
        };
        assert_eq!(dimensional_weight(&dims, dec("139")), Decimal::ZERO);
    }

    #[test]
    fn test_dim_weight_keeps_fractional_pounds() {
        assert_eq!(dimensional_weight(&cube("10"), dec("400")), dec("2.5"));
    }

    #[test]
    fn test_rated_weight_rounds_up() {
        let result = calculate_billable_weight(dec("5.01"), &Dimensions::default(), dec("139"), 1);

        assert_eq!(result.billable_weight, dec("5.01"));
        assert_eq!(result.rated_weight, dec("6"));
        assert_eq!(result.audit_step.rule_id, "billable_weight");
        assert_eq!(result.audit_step.output["basis"], "actual");
        assert_eq!(result.audit_step.output["rated_weight"], "6");
    }

    #[test]
    fn test_whole_weight_not_rounded_up() {
        let result = calculate_billable_weight(dec("5"), &Dimensions::default(), dec("139"), 1);
        assert_eq!(result.rated_weight, dec("5"));
    }

    #[test]
    fn test_audit_records_dimensional_basis() {
        let result = calculate_billable_weight(dec("1"), &cube("10"), dec("100"), 2);

        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.output["basis"], "dimensional");
        assert_eq!(result.audit_step.input["length"], "10");
        assert!(result.audit_step.reasoning.contains("rated at 10 lbs"));
    }

    proptest! {
        #[test]
        fn prop_zero_dimensions_return_actual(
            actual_cents in 1i64..1_000_000,
            divisor in 1i64..500,
        ) {
            let actual = Decimal::new(actual_cents, 2);
            let result = billable_weight(actual, &cube("0"), Decimal::from(divisor));
            prop_assert_eq!(result, actual);
        }

        #[test]
        fn prop_billable_never_below_either_weight(
            actual_cents in 1i64..100_000,
            length in 0i64..120,
            width in 0i64..120,
            height in 0i64..120,
            divisor in 1i64..500,
        ) {
            let actual = Decimal::new(actual_cents, 2);
            let dims = Dimensions::new(
                Decimal::from(length),
                Decimal::from(width),
                Decimal::from(height),
            );
            let divisor = Decimal::from(divisor);

            let billable = billable_weight(actual, &dims, divisor);
            prop_assert!(billable >= actual);
            prop_assert!(billable >= dimensional_weight(&dims, divisor));

            let rated = calculate_billable_weight(actual, &dims, divisor, 1).rated_weight;
            prop_assert!(rated >= billable);
            prop_assert!(rated - billable < Decimal::ONE);
        }
    }
}
