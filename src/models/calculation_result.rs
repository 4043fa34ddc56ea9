//! Per-shipment calculation result models.
//!
//! This module contains the [`CalculationResult`] type and the structures it
//! carries: the itemized [`RateBreakdown`] for a rated shipment, the
//! [`RowError`] for a failed one, and the [`AuditStep`] trail explaining how
//! the figures were reached.
//!
//! Results hold exact decimals. Monetary fields are rounded to cents only
//! when serialized.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ServiceLevel, ZipCode, Zone};
use crate::calculation::money;
use crate::error::{EngineError, ErrorCode};

/// The kind of a delivery-area surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    /// Delivery Area Surcharge.
    Das,
    /// Extended Delivery Area Surcharge.
    Edas,
    /// Remote Area Surcharge.
    Remote,
}

impl SurchargeKind {
    /// Returns the human-readable label used in surcharge line items.
    pub fn label(&self) -> &'static str {
        match self {
            SurchargeKind::Das => "Delivery Area Surcharge",
            SurchargeKind::Edas => "Extended Delivery Area Surcharge",
            SurchargeKind::Remote => "Remote Area Surcharge",
        }
    }
}

/// One applied surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeItem {
    /// Which surcharge this is.
    pub kind: SurchargeKind,
    /// Display label.
    pub label: String,
    /// Flat amount added.
    #[serde(serialize_with = "money::serialize")]
    pub amount: Decimal,
}

/// All surcharges applied to one shipment.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::models::{SurchargeBreakdown, SurchargeKind};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let mut surcharges = SurchargeBreakdown::default();
/// surcharges.add(SurchargeKind::Das, Decimal::from_str("1.98").unwrap());
/// surcharges.add(SurchargeKind::Remote, Decimal::from_str("14.15").unwrap());
///
/// assert_eq!(surcharges.amount, Decimal::from_str("16.13").unwrap());
/// assert!(surcharges.get(SurchargeKind::Edas).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeBreakdown {
    /// Sum of all item amounts.
    #[serde(serialize_with = "money::serialize")]
    pub amount: Decimal,
    /// Applied surcharges in DAS, EDAS, remote order.
    pub items: Vec<SurchargeItem>,
}

impl SurchargeBreakdown {
    /// Appends a surcharge and adds it to the total.
    pub fn add(&mut self, kind: SurchargeKind, amount: Decimal) {
        self.amount += amount;
        self.items.push(SurchargeItem {
            kind,
            label: kind.label().to_string(),
            amount,
        });
    }

    /// Returns the amount charged for `kind`, if it was applied.
    pub fn get(&self, kind: SurchargeKind) -> Option<Decimal> {
        self.items
            .iter()
            .find(|item| item.kind == kind)
            .map(|item| item.amount)
    }

    /// Returns true if no surcharge applied.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The itemized alternative-carrier cost of a successfully rated shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBreakdown {
    /// Origin zip after normalization.
    pub origin_zip: ZipCode,
    /// Destination zip after normalization.
    pub destination_zip: ZipCode,
    /// Resolved shipping zone.
    pub zone: Zone,
    /// Dimensional weight in pounds, zero when dimensions were not supplied.
    pub dim_weight: Decimal,
    /// Weight used for the rate lookup, rounded up to a whole pound.
    pub billable_weight: Decimal,
    /// The weight tier the billable weight fell into.
    pub weight_tier: Decimal,
    /// Base rate for the zone and tier.
    #[serde(serialize_with = "money::serialize")]
    pub base_rate: Decimal,
    /// Delivery-area surcharges.
    pub surcharges: SurchargeBreakdown,
    /// Fuel surcharge percentage applied.
    pub fuel_surcharge_pct: Decimal,
    /// Fuel surcharge amount.
    #[serde(serialize_with = "money::serialize")]
    pub fuel_surcharge: Decimal,
    /// Base rate plus surcharges plus fuel.
    #[serde(serialize_with = "money::serialize")]
    pub subtotal: Decimal,
    /// The recognized service level, if the declared one matched.
    pub service_level: Option<ServiceLevel>,
    /// Markup percentage applied.
    pub markup_pct: Decimal,
    /// Markup amount.
    #[serde(serialize_with = "money::serialize")]
    pub markup_amount: Decimal,
    /// Computed alternative cost.
    #[serde(serialize_with = "money::serialize")]
    pub final_cost: Decimal,
    /// Current cost minus final cost; positive means savings.
    #[serde(serialize_with = "money::serialize")]
    pub delta: Decimal,
    /// Delta as a percentage of the current cost.
    #[serde(serialize_with = "money::serialize")]
    pub savings_percent: Decimal,
}

/// Why a row could not be rated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
}

impl From<&EngineError> for RowError {
    fn from(error: &EngineError) -> Self {
        RowError {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Success or failure of a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    /// The shipment was rated.
    Success(RateBreakdown),
    /// The shipment failed validation or lookup.
    Failed(RowError),
}

/// The result of rating one shipment record.
///
/// A result is created once by the rate calculator and never mutated. Two
/// calculations over the same record, settings and rate table produce equal
/// results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The record's tracking/reference id.
    pub record_id: String,
    /// What the shipper currently pays.
    #[serde(serialize_with = "money::serialize")]
    pub current_cost: Decimal,
    /// The rated breakdown or the row error.
    pub outcome: RowOutcome,
    /// Steps executed for this row, including those before a failure.
    pub audit: Vec<AuditStep>,
}

impl CalculationResult {
    /// Returns true if the row was rated.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RowOutcome::Success(_))
    }

    /// Returns the rate breakdown of a successful row.
    pub fn breakdown(&self) -> Option<&RateBreakdown> {
        match &self.outcome {
            RowOutcome::Success(breakdown) => Some(breakdown),
            RowOutcome::Failed(_) => None,
        }
    }

    /// Returns the error of a failed row.
    pub fn error(&self) -> Option<&RowError> {
        match &self.outcome {
            RowOutcome::Success(_) => None,
            RowOutcome::Failed(error) => Some(error),
        }
    }

    /// Returns the computed alternative cost of a successful row.
    pub fn alternative_cost(&self) -> Option<Decimal> {
        self.breakdown().map(|b| b.final_cost)
    }

    /// Returns the cost delta of a successful row.
    pub fn delta(&self) -> Option<Decimal> {
        self.breakdown().map(|b| b.delta)
    }
}
