//! Core data models for the parcel rate engine.
//!
//! This module contains the shipment input records, the per-row calculation
//! results, and the batch summary types.

mod calculation_result;
mod shipment;
mod summary;
mod zip;
mod zone;

pub use calculation_result::{
    AuditStep, CalculationResult, RateBreakdown, RowError, RowOutcome, SurchargeBreakdown,
    SurchargeItem, SurchargeKind,
};
pub use shipment::{Dimensions, ServiceLevel, ShipmentRecord};
pub use summary::{
    AnalysisReport, AnalysisSummary, CostTotals, RowErrorEntry, WeightBracket,
    WeightBracketSummary, ZoneSummary,
};
pub use zip::{PREFIX_LENGTH, ZIP_LENGTH, ZipCode};
pub use zone::Zone;

pub(crate) use summary::percent_of;
pub(crate) use zip::is_digits;
