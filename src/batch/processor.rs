//! Batch processing of shipment records.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use tracing::info;

use super::aggregate::summarize;
use crate::calculation::RateCalculator;
use crate::config::RateSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{AnalysisReport, AnalysisSummary, CalculationResult, ShipmentRecord};
use crate::reference::RateTableIndex;

/// How a batch is run.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions<'a> {
    /// Number of worker threads. One or zero runs on the calling thread.
    pub workers: usize,
    /// Stop signal, checked between rows.
    pub cancel: Option<&'a AtomicBool>,
}

impl Default for BatchOptions<'_> {
    fn default() -> Self {
        Self {
            workers: 1,
            cancel: None,
        }
    }
}

impl<'a> BatchOptions<'a> {
    /// One worker per available CPU.
    pub fn parallel() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            cancel: None,
        }
    }

    /// Sets the number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the stop signal.
    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// The outcome of a batch: the summary and every row's result in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutput {
    /// Aggregated summary.
    pub summary: AnalysisSummary,
    /// Per-row results, position-matched to the input records.
    pub results: Vec<CalculationResult>,
}

impl BatchOutput {
    /// Wraps the output in a report envelope.
    pub fn into_report(self) -> AnalysisReport {
        AnalysisReport::new(self.summary, self.results)
    }
}

/// Rates a batch of shipments with per-row error isolation.
///
/// # Example
///
/// ```no_run
/// use parcel_rate_engine::batch::BatchProcessor;
/// use parcel_rate_engine::config::SettingsLoader;
/// use parcel_rate_engine::models::ShipmentRecord;
/// use parcel_rate_engine::reference::RateTableIndex;
///
/// let settings = SettingsLoader::load("./data/settings.yaml")?;
/// let index = RateTableIndex::load_dir("./data/reference")?;
/// let records: Vec<ShipmentRecord> = Vec::new();
///
/// let output = BatchProcessor::new(&settings, &index)?.process(&records)?;
/// println!("{} rows, {} failed", output.summary.total_records, output.summary.failed);
/// # Ok::<(), parcel_rate_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor<'a> {
    calculator: RateCalculator<'a>,
}

impl<'a> BatchProcessor<'a> {
    /// Creates a processor after validating the settings.
    ///
    /// # Errors
    ///
    /// `InvalidSettings` if the settings are out of range; nothing is rated.
    pub fn new(settings: &'a RateSettings, index: &'a RateTableIndex) -> EngineResult<Self> {
        settings.validate()?;
        Ok(Self {
            calculator: RateCalculator::new(settings, index),
        })
    }

    /// Rates every record on the calling thread.
    pub fn process(&self, records: &[ShipmentRecord]) -> EngineResult<BatchOutput> {
        self.process_with_options(records, &BatchOptions::default())
    }

    /// Rates every record with the given options.
    ///
    /// # Errors
    ///
    /// `Cancelled` if the stop signal was raised before every row ran. Row
    /// failures never surface here.
    pub fn process_with_options(
        &self,
        records: &[ShipmentRecord],
        options: &BatchOptions<'_>,
    ) -> EngineResult<BatchOutput> {
        let started = Instant::now();
        let workers = options.workers.clamp(1, records.len().max(1));

        info!(records = records.len(), workers, "Starting batch analysis");

        let results = if workers == 1 {
            self.run_sequential(records, options)?
        } else {
            self.run_parallel(records, workers, options)?
        };

        let summary = summarize(&results);

        info!(
            records = summary.total_records,
            succeeded = summary.succeeded,
            failed = summary.failed,
            total_current_cost = %summary.total_current_cost.round_dp(2),
            total_alternative_cost = %summary.total_alternative_cost.round_dp(2),
            percent_savings = %summary.percent_savings.round_dp(2),
            duration_ms = started.elapsed().as_millis() as u64,
            "Batch analysis complete"
        );

        Ok(BatchOutput { summary, results })
    }

    fn run_sequential(
        &self,
        records: &[ShipmentRecord],
        options: &BatchOptions<'_>,
    ) -> EngineResult<Vec<CalculationResult>> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            if options.is_cancelled() {
                return Err(cancelled(results.len()));
            }
            results.push(self.calculator.calculate(record));
        }

        Ok(results)
    }

    /// Splits the records into contiguous chunks, one per worker, each writing
    /// into its own slice of a pre-sized buffer.
    fn run_parallel(
        &self,
        records: &[ShipmentRecord],
        workers: usize,
        options: &BatchOptions<'_>,
    ) -> EngineResult<Vec<CalculationResult>> {
        let chunk_size = records.len().div_ceil(workers);
        let mut slots: Vec<Option<CalculationResult>> =
            std::iter::repeat_with(|| None).take(records.len()).collect();
        let completed = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            let completed = &completed;
            let calculator = self.calculator;

            for (slot_chunk, record_chunk) in slots
                .chunks_mut(chunk_size)
                .zip(records.chunks(chunk_size))
            {
                scope.spawn(move || {
                    for (slot, record) in slot_chunk.iter_mut().zip(record_chunk) {
                        if options.is_cancelled() {
                            return;
                        }
                        *slot = Some(calculator.calculate(record));
                        completed.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| cancelled(completed.into_inner()))
    }
}

fn cancelled(completed: usize) -> EngineError {
    info!(completed, "Batch analysis cancelled");
    EngineError::Cancelled { completed }
}

/// Validates settings, then rates every record on the calling thread.
///
/// # Errors
///
/// `InvalidSettings` if the settings are out of range. Row failures are
/// captured in the output instead.
pub fn process(
    records: &[ShipmentRecord],
    settings: &RateSettings,
    index: &RateTableIndex,
) -> EngineResult<BatchOutput> {
    BatchProcessor::new(settings, index)?.process(records)
}
