//! Batch-level summary models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CalculationResult, Zone};
use crate::calculation::money;
use crate::error::ErrorCode;

/// A failed row, as listed in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowErrorEntry {
    /// Zero-based position of the row in the input.
    pub row_index: usize,
    /// The record's tracking/reference id.
    pub record_id: String,
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
}

/// Cost totals over a group of successful rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTotals {
    /// Number of successful rows in the group.
    pub shipments: usize,
    /// Sum of current costs.
    #[serde(serialize_with = "money::serialize")]
    pub current_cost: Decimal,
    /// Sum of computed alternative costs.
    #[serde(serialize_with = "money::serialize")]
    pub alternative_cost: Decimal,
    /// Sum of deltas.
    #[serde(serialize_with = "money::serialize")]
    pub savings: Decimal,
}

impl CostTotals {
    /// Returns these totals with one more successful row, or `None` if a
    /// sum would leave decimal range. `self` is left untouched either way.
    pub fn checked_add(&self, current_cost: Decimal, alternative_cost: Decimal) -> Option<Self> {
        Some(Self {
            shipments: self.shipments + 1,
            current_cost: self.current_cost.checked_add(current_cost)?,
            alternative_cost: self.alternative_cost.checked_add(alternative_cost)?,
            savings: self
                .savings
                .checked_add(current_cost.checked_sub(alternative_cost)?)?,
        })
    }

    /// Savings as a percentage of current cost; zero when nothing is paid today.
    ///
    /// `None` if the ratio leaves decimal range.
    pub fn percent_savings(&self) -> Option<Decimal> {
        percent_of(self.savings, self.current_cost)
    }
}

/// Returns `part / whole * 100`, zero when `whole` is zero, or `None` when
/// the ratio leaves decimal range.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return Some(Decimal::ZERO);
    }
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Totals for one shipping zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSummary {
    /// The zone.
    pub zone: Zone,
    /// Totals for rows rated in this zone.
    #[serde(flatten)]
    pub totals: CostTotals,
}

/// Billable-weight brackets used for the weight breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightBracket {
    /// Up to 1 lb.
    UpTo1,
    /// Over 1 lb, up to 5 lbs.
    Over1To5,
    /// Over 5 lbs, up to 10 lbs.
    Over5To10,
    /// Over 10 lbs, up to 20 lbs.
    Over10To20,
    /// Over 20 lbs, up to 50 lbs.
    Over20To50,
    /// Over 50 lbs, up to 100 lbs.
    Over50To100,
    /// Over 100 lbs.
    Over100,
}

impl WeightBracket {
    /// All brackets, lightest first.
    pub const ALL: [WeightBracket; 7] = [
        WeightBracket::UpTo1,
        WeightBracket::Over1To5,
        WeightBracket::Over5To10,
        WeightBracket::Over10To20,
        WeightBracket::Over20To50,
        WeightBracket::Over50To100,
        WeightBracket::Over100,
    ];

    /// Returns the bracket containing `weight`. Upper bounds are inclusive.
    ///
    /// ```
    /// use parcel_rate_engine::models::WeightBracket;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(WeightBracket::for_weight(Decimal::from(5)), WeightBracket::Over1To5);
    /// assert_eq!(WeightBracket::for_weight(Decimal::from(6)), WeightBracket::Over5To10);
    /// assert_eq!(WeightBracket::for_weight(Decimal::from(150)), WeightBracket::Over100);
    /// ```
    pub fn for_weight(weight: Decimal) -> Self {
        Self::ALL
            .into_iter()
            .find(|bracket| bracket.upper_bound().is_some_and(|upper| weight <= upper))
            .unwrap_or(WeightBracket::Over100)
    }

    /// Inclusive upper bound in pounds; `None` for the open-ended bracket.
    pub fn upper_bound(&self) -> Option<Decimal> {
        let pounds = match self {
            WeightBracket::UpTo1 => 1,
            WeightBracket::Over1To5 => 5,
            WeightBracket::Over5To10 => 10,
            WeightBracket::Over10To20 => 20,
            WeightBracket::Over20To50 => 50,
            WeightBracket::Over50To100 => 100,
            WeightBracket::Over100 => return None,
        };
        Some(Decimal::from(pounds))
    }

    /// Display label, e.g. `"5-10 lbs"`.
    pub fn label(&self) -> &'static str {
        match self {
            WeightBracket::UpTo1 => "0-1 lbs",
            WeightBracket::Over1To5 => "1-5 lbs",
            WeightBracket::Over5To10 => "5-10 lbs",
            WeightBracket::Over10To20 => "10-20 lbs",
            WeightBracket::Over20To50 => "20-50 lbs",
            WeightBracket::Over50To100 => "50-100 lbs",
            WeightBracket::Over100 => "100+ lbs",
        }
    }
}

/// Totals for one weight bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightBracketSummary {
    /// The bracket.
    pub bracket: WeightBracket,
    /// The bracket's display label.
    pub label: String,
    /// Totals for rows whose billable weight falls in this bracket.
    #[serde(flatten)]
    pub totals: CostTotals,
}

/// Aggregated outcome of a batch.
///
/// Cost totals cover successful rows only. `errors` lists every failed row in
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Number of input records.
    pub total_records: usize,
    /// Number of rows rated.
    pub succeeded: usize,
    /// Number of rows that failed.
    pub failed: usize,
    /// Sum of current costs over successful rows.
    #[serde(serialize_with = "money::serialize")]
    pub total_current_cost: Decimal,
    /// Sum of alternative costs over successful rows.
    #[serde(serialize_with = "money::serialize")]
    pub total_alternative_cost: Decimal,
    /// Current minus alternative, over successful rows.
    #[serde(serialize_with = "money::serialize")]
    pub total_savings: Decimal,
    /// Savings as a percentage of current cost.
    #[serde(serialize_with = "money::serialize")]
    pub percent_savings: Decimal,
    /// Sum of base rates over successful rows.
    #[serde(serialize_with = "money::serialize")]
    pub total_base_rate: Decimal,
    /// Sum of delivery-area surcharges over successful rows.
    #[serde(serialize_with = "money::serialize")]
    pub total_surcharges: Decimal,
    /// Sum of fuel surcharges over successful rows.
    #[serde(serialize_with = "money::serialize")]
    pub total_fuel_surcharge: Decimal,
    /// Sum of markups over successful rows.
    #[serde(serialize_with = "money::serialize")]
    pub total_markup: Decimal,
    /// Per-zone totals, ascending by zone, zones without rows omitted.
    pub zone_breakdown: Vec<ZoneSummary>,
    /// Per-bracket totals, lightest first, empty brackets omitted.
    pub weight_breakdown: Vec<WeightBracketSummary>,
    /// Failed rows in input order.
    pub errors: Vec<RowErrorEntry>,
}

/// The complete export of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique identifier for this run.
    pub analysis_id: Uuid,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Version of the engine that produced the figures.
    pub engine_version: String,
    /// Aggregated summary.
    pub summary: AnalysisSummary,
    /// Per-row results in input order.
    pub results: Vec<CalculationResult>,
}

impl AnalysisReport {
    /// Wraps a summary and its results with a fresh id and timestamp.
    pub fn new(summary: AnalysisSummary, results: Vec<CalculationResult>) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            completed_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            summary,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_percent_savings() {
        assert_eq!(percent_of(dec("150"), dec("1000")), Some(dec("15")));
        assert_eq!(percent_of(dec("150"), Decimal::ZERO), Some(Decimal::ZERO));
        assert_eq!(percent_of(dec("-50"), dec("200")), Some(dec("-25")));
        assert_eq!(percent_of(Decimal::MAX, dec("0.001")), None);
    }

    #[test]
    fn test_cost_totals_accumulate() {
        let totals = CostTotals::default()
            .checked_add(dec("40"), dec("25.694"))
            .and_then(|totals| totals.checked_add(dec("10"), dec("12")))
            .unwrap();

        assert_eq!(totals.shipments, 2);
        assert_eq!(totals.current_cost, dec("50"));
        assert_eq!(totals.alternative_cost, dec("37.694"));
        assert_eq!(totals.savings, dec("12.306"));
        assert_eq!(totals.percent_savings(), Some(dec("24.612")));
    }

    #[test]
    fn test_cost_totals_overflow_is_rejected() {
        let huge = dec("50000000000000000000000000000");
        let totals = CostTotals::default().checked_add(huge, dec("1")).unwrap();

        assert_eq!(totals.checked_add(huge, dec("1")), None);
        assert_eq!(totals.shipments, 1);
    }

    #[test]
    fn test_weight_bracket_bounds_are_inclusive() {
        assert_eq!(WeightBracket::for_weight(dec("0.5")), WeightBracket::UpTo1);
        assert_eq!(WeightBracket::for_weight(dec("1")), WeightBracket::UpTo1);
        assert_eq!(WeightBracket::for_weight(dec("1.01")), WeightBracket::Over1To5);
        assert_eq!(WeightBracket::for_weight(dec("10")), WeightBracket::Over5To10);
        assert_eq!(WeightBracket::for_weight(dec("20")), WeightBracket::Over10To20);
        assert_eq!(WeightBracket::for_weight(dec("50")), WeightBracket::Over20To50);
        assert_eq!(WeightBracket::for_weight(dec("100")), WeightBracket::Over50To100);
        assert_eq!(WeightBracket::for_weight(dec("100.5")), WeightBracket::Over100);
    }

    #[test]
    fn test_zone_summary_flattens_totals() {
        let totals = CostTotals::default()
            .checked_add(dec("40"), dec("25.694"))
            .unwrap();
        let summary = ZoneSummary {
            zone: Zone::new(4).unwrap(),
            totals,
        };
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["zone"], 4);
        assert_eq!(json["shipments"], 1);
        assert_eq!(json["alternative_cost"], "25.69");
        assert_eq!(json["savings"], "14.31");
    }

    #[test]
    fn test_report_envelope() {
        let report = AnalysisReport::new(AnalysisSummary::default(), vec![]);
        let other = AnalysisReport::new(AnalysisSummary::default(), vec![]);

        assert_ne!(report.analysis_id, other.analysis_id);
        assert_eq!(report.engine_version, env!("CARGO_PKG_VERSION"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["total_records"], 0);
        assert_eq!(json["summary"]["percent_savings"], "0.00");
        assert!(json["completed_at"].is_string());
    }
}
