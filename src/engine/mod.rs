//! Cost, emissions and savings models.
//!
//! Every model is a pure function over explicit inputs. Callers re-run the
//! whole computation whenever an input changes; nothing here caches or holds
//! state between calls.

pub mod assumptions;
pub mod baseline;
pub mod electrification;
pub mod error;
pub mod projection;
pub mod solar_offset;
pub mod validation;

pub use assumptions::*;
pub use baseline::*;
pub use electrification::*;
pub use error::*;
pub use projection::*;
pub use solar_offset::*;
pub use validation::*;

/// Thermal energy content of one therm of natural gas
pub const KWH_PER_THERM: f64 = 29.3;

/// Combustion emissions of natural gas
pub const GAS_EMISSIONS_KG_PER_THERM: f64 = 5.3;

/// Days used to turn a daily gas allowance into a monthly one
pub const BILLING_DAYS_PER_MONTH: f64 = 30.0;

pub const GRAMS_PER_KG: f64 = 1000.0;
