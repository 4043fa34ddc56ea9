//! Parcel Rate Engine
//!
//! This crate compares what a shipper currently pays for a batch of parcel
//! shipments against an alternative carrier's computed cost. Each shipment is
//! rated from the carrier's zone chart and base-rate matrix, billed on the
//! greater of actual and dimensional weight, and charged delivery-area,
//! fuel and service-level uplifts. Rows fail independently; the batch always
//! produces a savings summary unless the reference data itself is unusable.

#![warn(missing_docs)]

pub mod batch;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod reference;
