//! Configuration loading for the parcel rate engine.
//!
//! This module provides the per-analysis [`RateSettings`] (origin, dimensional
//! divisor, fuel and delivery-area surcharges, service-level markups) and the
//! loader that reads them from YAML.
//!
//! # Example
//!
//! ```no_run
//! use parcel_rate_engine::config::SettingsLoader;
//!
//! let settings = SettingsLoader::load("./data/settings.yaml").unwrap();
//! println!("Origin: {}", settings.origin_zip);
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::SettingsLoader;
pub use types::{MAX_SETTING_VALUE, RateSettings, ServiceLevelMarkups};
