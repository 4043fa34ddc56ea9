//! Calculation logic for the parcel rate engine.
//!
//! This module contains one function per pricing rule (billable weight, zone
//! resolution, base rate lookup, delivery-area surcharges, fuel surcharge,
//! service-level markup) and the per-shipment pipeline that chains them.
//! Each rule returns its figure together with an [`AuditStep`](crate::models::AuditStep).

mod base_rate;
mod dim_weight;
mod fuel;
mod markup;
pub(crate) mod money;
mod rate;
mod surcharge;
mod zone;

pub use base_rate::{BaseRateLookupResult, get_base_rate};
pub use dim_weight::{
    BillableWeightResult, billable_weight, calculate_billable_weight, dimensional_weight,
};
pub use fuel::{FuelSurchargeResult, apply_fuel_surcharge};
pub use markup::{MarkupResult, MarkupSelection, MarkupSource, apply_markup, select_markup};
pub use money::{MONEY_DP, round_money};
pub use rate::{RateCalculator, calculate_shipment};
pub use surcharge::{SurchargeResult, calculate_surcharges, surcharges};
pub use zone::{ZoneResolution, resolve_zone};
