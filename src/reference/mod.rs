//! Reference rate data for the parcel rate engine.
//!
//! A carrier's rate workbook is read as a [`ReferenceDataset`] of named
//! sheets, then validated and indexed into a [`RateTableIndex`]: the
//! zone-by-weight base-rate matrix, the origin/destination zone chart, and the
//! DAS, EDAS and remote surcharge zip lists.
//!
//! # Example
//!
//! ```no_run
//! use parcel_rate_engine::reference::RateTableIndex;
//!
//! let index = RateTableIndex::load_dir("./data/reference").unwrap();
//! println!("Heaviest tier: {:?}", index.max_weight());
//! ```

mod dataset;
mod index;

pub use dataset::{
    BASE_RATES, Cell, DAS_ZIPS, EDAS_ZIPS, REMOTE_ZIPS, REQUIRED_SHEETS, ReferenceDataset, Sheet,
    SheetSchema, ZONE_CHART,
};
pub use index::{BaseRateEntry, MonotonicViolation, RateTableIndex, SurchargeFlags};

#[cfg(test)]
pub(crate) use index::test_support;
