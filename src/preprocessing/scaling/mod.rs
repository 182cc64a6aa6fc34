//! Scaling transformers for feature normalization.

pub mod standard;

pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerConfig};
