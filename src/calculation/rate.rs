//! Per-shipment rate calculation.
//!
//! [`calculate_shipment`] runs the full pipeline for one record, in order:
//!
//! 1. validate the record
//! 2. billable weight, rounded up to a whole pound
//! 3. zone resolution
//! 4. base rate lookup
//! 5. delivery-area surcharges
//! 6. fuel surcharge on base plus surcharges
//! 7. service-level markup
//! 8. delta against the current cost
//!
//! The first failing step ends the pipeline; its error becomes the row's
//! outcome. Nothing is rounded along the way.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::base_rate::get_base_rate;
use super::dim_weight::calculate_billable_weight;
use super::fuel::apply_fuel_surcharge;
use super::markup::apply_markup;
use super::money::sum;
use super::surcharge::calculate_surcharges;
use super::zone::resolve_zone;
use crate::config::RateSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, CalculationResult, RateBreakdown, RowError, RowOutcome, ShipmentRecord,
    percent_of,
};
use crate::reference::RateTableIndex;

/// Rates shipments against one set of settings and rate tables.
///
/// Holds only shared references, so one calculator can be used from many
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct RateCalculator<'a> {
    settings: &'a RateSettings,
    index: &'a RateTableIndex,
}

impl<'a> RateCalculator<'a> {
    /// Creates a calculator.
    pub fn new(settings: &'a RateSettings, index: &'a RateTableIndex) -> Self {
        Self { settings, index }
    }

    /// Returns the settings in use.
    pub fn settings(&self) -> &'a RateSettings {
        self.settings
    }

    /// Rates one shipment.
    pub fn calculate(&self, record: &ShipmentRecord) -> CalculationResult {
        calculate_shipment(record, self.settings, self.index)
    }
}

/// Rates one shipment record.
///
/// Always returns a result: row-level failures are captured in
/// [`RowOutcome::Failed`] and never propagate. Calling this twice with the
/// same inputs yields equal results.
///
/// # Examples
///
/// ```no_run
/// use parcel_rate_engine::calculation::calculate_shipment;
/// use parcel_rate_engine::config::RateSettings;
/// use parcel_rate_engine::models::ShipmentRecord;
/// use parcel_rate_engine::reference::RateTableIndex;
/// use rust_decimal::Decimal;
///
/// let index = RateTableIndex::load_dir("./data/reference")?;
/// let record = ShipmentRecord::new("1Z001", Decimal::from(5), "04652", Decimal::from(40));
///
/// let result = calculate_shipment(&record, &RateSettings::default(), &index);
/// println!("{:?}", result.delta());
/// # Ok::<(), parcel_rate_engine::error::EngineError>(())
/// ```
pub fn calculate_shipment(
    record: &ShipmentRecord,
    settings: &RateSettings,
    index: &RateTableIndex,
) -> CalculationResult {
    let mut audit = Vec::new();

    let outcome = match rate_shipment(record, settings, index, &mut audit) {
        Ok(breakdown) => {
            debug!(
                record_id = %record.id,
                zone = %breakdown.zone,
                billable_weight = %breakdown.billable_weight,
                final_cost = %breakdown.final_cost,
                delta = %breakdown.delta,
                "Rated shipment"
            );
            RowOutcome::Success(breakdown)
        }
        Err(error) => {
            warn!(
                record_id = %record.id,
                code = %error.code(),
                error = %error,
                "Shipment could not be rated"
            );
            RowOutcome::Failed(RowError::from(&error))
        }
    };

    CalculationResult {
        record_id: record.id.clone(),
        current_cost: record.current_cost,
        outcome,
        audit,
    }
}

fn rate_shipment(
    record: &ShipmentRecord,
    settings: &RateSettings,
    index: &RateTableIndex,
    audit: &mut Vec<AuditStep>,
) -> EngineResult<RateBreakdown> {
    let (actual_weight, destination_zip) = validate_record(record, settings.dim_divisor)?;
    let origin_zip = record
        .origin_zip
        .as_deref()
        .map(str::trim)
        .filter(|zip| !zip.is_empty())
        .unwrap_or(settings.origin_zip.as_str());

    let weight = calculate_billable_weight(
        actual_weight,
        &record.dimensions(),
        settings.dim_divisor,
        1,
    );
    audit.push(weight.audit_step);

    let zone = resolve_zone(origin_zip, destination_zip, index, 2)?;
    audit.push(zone.audit_step);

    let base = get_base_rate(zone.zone, weight.rated_weight, index, 3)?;
    audit.push(base.audit_step);

    let surcharge = calculate_surcharges(destination_zip, settings, index, 4);
    audit.push(surcharge.audit_step);

    let pre_fuel_amount = sum(base.rate, surcharge.surcharges.amount, "base plus surcharges")?;
    let fuel = apply_fuel_surcharge(pre_fuel_amount, settings.fuel_surcharge_pct, 5)?;
    audit.push(fuel.audit_step);

    let markup = apply_markup(fuel.subtotal, record.service_level.as_deref(), settings, 6)?;
    audit.push(markup.audit_step);

    let delta = record
        .current_cost
        .checked_sub(markup.final_cost)
        .ok_or_else(|| EngineError::overflow("delta"))?;
    let savings_percent = percent_of(delta, record.current_cost)
        .ok_or_else(|| EngineError::overflow("savings percent"))?;
    audit.push(AuditStep {
        step_number: 7,
        rule_id: "cost_comparison".to_string(),
        rule_name: "Cost Comparison".to_string(),
        input: serde_json::json!({
            "current_cost": record.current_cost.normalize().to_string(),
            "final_cost": markup.final_cost.normalize().to_string()
        }),
        output: serde_json::json!({
            "delta": delta.normalize().to_string(),
            "savings_percent": savings_percent.round_dp(4).normalize().to_string()
        }),
        reasoning: format!(
            "${} current - ${} alternative = ${}",
            record.current_cost.normalize(),
            markup.final_cost.normalize(),
            delta.normalize()
        ),
    });

    Ok(RateBreakdown {
        origin_zip: zone.origin,
        destination_zip: zone.destination,
        zone: zone.zone,
        dim_weight: weight.dim_weight,
        billable_weight: weight.rated_weight,
        weight_tier: base.tier,
        base_rate: base.rate,
        surcharges: surcharge.surcharges,
        fuel_surcharge_pct: settings.fuel_surcharge_pct,
        fuel_surcharge: fuel.fuel_surcharge,
        subtotal: fuel.subtotal,
        service_level: markup.selection.service_level,
        markup_pct: markup.selection.markup_pct,
        markup_amount: markup.markup_amount,
        final_cost: markup.final_cost,
        delta,
        savings_percent,
    })
}

/// Checks the fields the pipeline depends on.
///
/// Returns the actual weight and destination zip.
fn validate_record(record: &ShipmentRecord, dim_divisor: Decimal) -> EngineResult<(Decimal, &str)> {
    let invalid = |field: &str, message: &str| EngineError::Validation {
        record_id: record.id.clone(),
        field: field.to_string(),
        message: message.to_string(),
    };

    let weight = match record.weight {
        None => return Err(invalid("weight", "is missing")),
        Some(weight) if weight <= Decimal::ZERO => {
            return Err(invalid("weight", "must be greater than zero"));
        }
        Some(weight) => weight,
    };

    let destination_zip = record
        .destination_zip
        .as_deref()
        .map(str::trim)
        .filter(|zip| !zip.is_empty())
        .ok_or_else(|| invalid("destination_zip", "is missing"))?;

    let sides = [
        ("length", record.length),
        ("width", record.width),
        ("height", record.height),
    ];
    for (field, value) in sides {
        if value.is_some_and(|v| v < Decimal::ZERO) {
            return Err(invalid(field, "must not be negative"));
        }
    }

    let dimensions = record.dimensions();
    if dimensions.is_measured()
        && dimensions
            .volume()
            .and_then(|volume| volume.checked_div(dim_divisor))
            .is_none()
    {
        return Err(invalid("dimensions", "package volume is out of range"));
    }

    if record.current_cost < Decimal::ZERO {
        return Err(invalid("current_cost", "must not be negative"));
    }

    Ok((weight, destination_zip))
}
