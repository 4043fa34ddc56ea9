//! Fuel surcharge calculation functionality.

use rust_decimal::Decimal;

use super::money::{percentage, sum};
use crate::error::EngineResult;
use crate::models::AuditStep;

/// The result of applying the fuel surcharge, including the audit step.
#[derive(Debug, Clone)]
pub struct FuelSurchargeResult {
    /// The fuel surcharge amount.
    pub fuel_surcharge: Decimal,
    /// Subtotal after fuel.
    pub subtotal: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies a percentage fuel surcharge to the base-plus-surcharges amount.
///
/// `subtotal * (1 + fuel_pct / 100)`, with no rounding.
///
/// # Errors
///
/// `AmountOverflow` if the surcharge or subtotal leaves decimal range.
///
/// # Examples
///
/// ```
/// use parcel_rate_engine::calculation::apply_fuel_surcharge;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = apply_fuel_surcharge(
///     Decimal::from_str("22.15").unwrap(),
///     Decimal::from(16),
///     5,
/// )
/// .unwrap();
/// assert_eq!(result.subtotal, Decimal::from_str("25.694").unwrap());
/// ```
pub fn apply_fuel_surcharge(
    pre_fuel_amount: Decimal,
    fuel_surcharge_pct: Decimal,
    step_number: u32,
) -> EngineResult<FuelSurchargeResult> {
    let fuel_surcharge = percentage(pre_fuel_amount, fuel_surcharge_pct, "fuel surcharge")?;
    let subtotal = sum(pre_fuel_amount, fuel_surcharge, "fuel subtotal")?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "fuel_surcharge".to_string(),
        rule_name: "Fuel Surcharge".to_string(),
        input: serde_json::json!({
            "amount": pre_fuel_amount.normalize().to_string(),
            "fuel_surcharge_pct": fuel_surcharge_pct.normalize().to_string()
        }),
        output: serde_json::json!({
            "fuel_surcharge": fuel_surcharge.normalize().to_string(),
            "subtotal": subtotal.normalize().to_string()
        }),
        reasoning: format!(
            "${} x {}% = ${} fuel, subtotal ${}",
            pre_fuel_amount.normalize(),
            fuel_surcharge_pct.normalize(),
            fuel_surcharge.normalize(),
            subtotal.normalize()
        ),
    };

    Ok(FuelSurchargeResult {
        fuel_surcharge,
        subtotal,
        audit_step,
    })
}
