//! Outlier detection core.
//!
//! A `Detect` call is a pure function from an ordered value sequence to the
//! ordered set of indices whose deviation from the population mean exceeds a
//! fixed multiple of the population standard deviation. This crate holds that
//! function and the domain types around it; transport lives elsewhere.

#![deny(unsafe_code)]

pub mod detect;
pub mod error;
pub mod types;

pub use detect::{detect_outliers, population_stats, DetectorConfig, Stats, DEFAULT_SIGMA};
pub use error::DetectError;
pub use types::Metric;
