//! Aggregation of per-row results into an analysis summary.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{EngineError, ErrorCode};
use crate::models::{
    AnalysisSummary, CalculationResult, CostTotals, RateBreakdown, RowErrorEntry, RowOutcome,
    WeightBracket, WeightBracketSummary, Zone, ZoneSummary, percent_of,
};

/// Accumulates row results, in input order, into an [`AnalysisSummary`].
///
/// Cost totals and breakdowns only count successful rows; failed rows are
/// counted and listed with their position. A successful row whose figures
/// would push a running total out of decimal range is counted as failed
/// with [`ErrorCode::AmountOverflow`] and leaves every total unchanged.
///
/// # Example
///
/// ```
/// use parcel_rate_engine::batch::Aggregator;
///
/// let summary = Aggregator::new().finish();
/// assert_eq!(summary.total_records, 0);
/// assert!(summary.percent_savings.is_zero());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    summary: AnalysisSummary,
    totals: CostTotals,
    zones: BTreeMap<Zone, CostTotals>,
    brackets: BTreeMap<WeightBracket, CostTotals>,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the result for the row at `row_index`.
    pub fn add(&mut self, row_index: usize, result: &CalculationResult) {
        self.summary.total_records += 1;

        match &result.outcome {
            RowOutcome::Success(breakdown) => {
                if self.accumulate(result.current_cost, breakdown).is_some() {
                    self.summary.succeeded += 1;
                } else {
                    let error = EngineError::overflow("summary totals");
                    warn!(row_index, record_id = %result.record_id, "{error}");
                    self.record_failure(row_index, result, error.code(), error.to_string());
                }
            }
            RowOutcome::Failed(error) => {
                self.record_failure(row_index, result, error.code, error.message.clone());
            }
        }
    }

    /// Adds one successful row to every total, or to none of them.
    fn accumulate(&mut self, current_cost: Decimal, breakdown: &RateBreakdown) -> Option<()> {
        let final_cost = breakdown.final_cost;
        let bracket = WeightBracket::for_weight(breakdown.billable_weight);

        let totals = self.totals.checked_add(current_cost, final_cost)?;
        let zone = self
            .zones
            .get(&breakdown.zone)
            .cloned()
            .unwrap_or_default()
            .checked_add(current_cost, final_cost)?;
        let weight = self
            .brackets
            .get(&bracket)
            .cloned()
            .unwrap_or_default()
            .checked_add(current_cost, final_cost)?;

        let summary = &self.summary;
        let base_rate = summary.total_base_rate.checked_add(breakdown.base_rate)?;
        let surcharges = summary
            .total_surcharges
            .checked_add(breakdown.surcharges.amount)?;
        let fuel = summary
            .total_fuel_surcharge
            .checked_add(breakdown.fuel_surcharge)?;
        let markup = summary.total_markup.checked_add(breakdown.markup_amount)?;

        self.totals = totals;
        self.zones.insert(breakdown.zone, zone);
        self.brackets.insert(bracket, weight);
        self.summary.total_base_rate = base_rate;
        self.summary.total_surcharges = surcharges;
        self.summary.total_fuel_surcharge = fuel;
        self.summary.total_markup = markup;
        Some(())
    }

    fn record_failure(
        &mut self,
        row_index: usize,
        result: &CalculationResult,
        code: ErrorCode,
        message: String,
    ) {
        self.summary.failed += 1;
        self.summary.errors.push(RowErrorEntry {
            row_index,
            record_id: result.record_id.clone(),
            code,
            message,
        });
    }

    /// Finishes aggregation.
    pub fn finish(self) -> AnalysisSummary {
        let Self {
            mut summary,
            totals,
            zones,
            brackets,
        } = self;

        summary.total_current_cost = totals.current_cost;
        summary.total_alternative_cost = totals.alternative_cost;
        summary.total_savings = totals.savings;
        summary.percent_savings =
            percent_of(totals.savings, totals.current_cost).unwrap_or_else(|| {
                warn!("Savings percentage out of range, reporting zero");
                Decimal::ZERO
            });

        summary.zone_breakdown = zones
            .into_iter()
            .map(|(zone, totals)| ZoneSummary { zone, totals })
            .collect();
        summary.weight_breakdown = brackets
            .into_iter()
            .map(|(bracket, totals)| WeightBracketSummary {
                bracket,
                label: bracket.label().to_string(),
                totals,
            })
            .collect();

        summary
    }
}

/// Summarizes results listed in input order.
pub fn summarize(results: &[CalculationResult]) -> AnalysisSummary {
    let mut aggregator = Aggregator::new();
    for (row_index, result) in results.iter().enumerate() {
        aggregator.add(row_index, result);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RowError, ServiceLevel, SurchargeBreakdown, ZipCode};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn success(
        id: &str,
        zone: u8,
        weight: &str,
        current: &str,
        final_cost: &str,
    ) -> CalculationResult {
        let final_cost = dec(final_cost);
        let current_cost = dec(current);
        CalculationResult {
            record_id: id.to_string(),
            current_cost,
            outcome: RowOutcome::Success(RateBreakdown {
                origin_zip: ZipCode::normalize("10001").unwrap(),
                destination_zip: ZipCode::normalize("04652").unwrap(),
                zone: Zone::new(zone).unwrap(),
                dim_weight: Decimal::ZERO,
                billable_weight: dec(weight),
                weight_tier: dec(weight),
                base_rate: final_cost,
                surcharges: SurchargeBreakdown::default(),
                fuel_surcharge_pct: Decimal::ZERO,
                fuel_surcharge: Decimal::ZERO,
                subtotal: final_cost,
                service_level: Some(ServiceLevel::Standard),
                markup_pct: Decimal::ZERO,
                markup_amount: Decimal::ZERO,
                final_cost,
                delta: current_cost - final_cost,
                savings_percent: percent_of(current_cost - final_cost, current_cost).unwrap(),
            }),
            audit: vec![],
        }
    }

    fn failure(id: &str, code: ErrorCode) -> CalculationResult {
        CalculationResult {
            record_id: id.to_string(),
            current_cost: dec("99"),
            outcome: RowOutcome::Failed(RowError {
                code,
                message: format!("{id} failed"),
            }),
            audit: vec![],
        }
    }

    #[test]
    fn test_percent_savings_fifteen() {
        let summary = summarize(&[
            success("a", 4, "5", "600", "510"),
            success("b", 4, "5", "400", "340"),
        ]);

        assert_eq!(summary.total_current_cost, dec("1000"));
        assert_eq!(summary.total_savings, dec("150"));
        assert_eq!(summary.percent_savings, dec("15"));
    }

    #[test]
    fn test_zero_current_cost_has_zero_percent() {
        let summary = summarize(&[success("a", 1, "1", "0", "5")]);

        assert_eq!(summary.total_current_cost, Decimal::ZERO);
        assert_eq!(summary.total_savings, dec("-5"));
        assert_eq!(summary.percent_savings, Decimal::ZERO);
    }

    #[test]
    fn test_failures_excluded_from_totals() {
        let summary = summarize(&[
            success("a", 2, "1", "10", "8"),
            failure("b", ErrorCode::ZoneNotFound),
            success("c", 2, "1", "10", "9"),
            failure("d", ErrorCode::ValidationError),
        ]);

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total_current_cost, dec("20"));
        assert_eq!(summary.total_alternative_cost, dec("17"));

        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.errors[0].row_index, 1);
        assert_eq!(summary.errors[0].record_id, "b");
        assert_eq!(summary.errors[0].code, ErrorCode::ZoneNotFound);
        assert_eq!(summary.errors[1].row_index, 3);
        assert_eq!(summary.errors[1].code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_zone_breakdown_sorted_and_sparse() {
        let summary = summarize(&[
            success("a", 7, "1", "10", "8"),
            success("b", 2, "1", "10", "8"),
            success("c", 7, "1", "20", "15"),
        ]);

        let zones: Vec<u8> = summary.zone_breakdown.iter().map(|z| z.zone.get()).collect();
        assert_eq!(zones, vec![2, 7]);

        let zone7 = &summary.zone_breakdown[1].totals;
        assert_eq!(zone7.shipments, 2);
        assert_eq!(zone7.current_cost, dec("30"));
        assert_eq!(zone7.savings, dec("7"));
    }

    #[test]
    fn test_weight_breakdown_uses_billable_weight() {
        let summary = summarize(&[
            success("a", 1, "1", "10", "8"),
            success("b", 1, "5", "10", "8"),
            success("c", 1, "6", "10", "8"),
            success("d", 1, "150", "100", "80"),
        ]);

        let brackets: Vec<(WeightBracket, usize)> = summary
            .weight_breakdown
            .iter()
            .map(|b| (b.bracket, b.totals.shipments))
            .collect();
        assert_eq!(
            brackets,
            vec![
                (WeightBracket::UpTo1, 1),
                (WeightBracket::Over1To5, 1),
                (WeightBracket::Over5To10, 1),
                (WeightBracket::Over100, 1),
            ]
        );
        assert_eq!(summary.weight_breakdown[3].label, "100+ lbs");
    }

    #[test]
    fn test_component_totals() {
        let mut result = success("a", 3, "2", "30", "20");
        if let RowOutcome::Success(breakdown) = &mut result.outcome {
            breakdown.base_rate = dec("12");
            breakdown.surcharges.amount = dec("3.92");
            breakdown.fuel_surcharge = dec("2.5");
            breakdown.markup_amount = dec("1.58");
        }

        let summary = summarize(&[result.clone(), result]);

        assert_eq!(summary.total_base_rate, dec("24"));
        assert_eq!(summary.total_surcharges, dec("7.84"));
        assert_eq!(summary.total_fuel_surcharge, dec("5"));
        assert_eq!(summary.total_markup, dec("3.16"));
    }

    #[test]
    fn test_total_overflow_fails_the_row() {
        let summary = summarize(&[
            success("a", 5, "2", "50000000000000000000000000000", "1"),
            success("b", 5, "2", "50000000000000000000000000000", "1"),
            success("c", 5, "2", "10", "8"),
        ]);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors[0].row_index, 1);
        assert_eq!(summary.errors[0].code, ErrorCode::AmountOverflow);
        assert_eq!(
            summary.total_current_cost,
            dec("50000000000000000000000000010")
        );
        assert_eq!(summary.zone_breakdown[0].totals.shipments, 2);
        assert_eq!(summary.total_base_rate, dec("9"));
    }
}
