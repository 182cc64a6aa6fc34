//! Feature preprocessing for ride data.
//!
//! Transformers follow a type-state pattern: an unfitted transformer holds
//! hyperparameters, and fitting returns a separate fitted type that owns the
//! learned parameters. A fitted type cannot be built without fitting, so a
//! transform-before-fit is rejected at compile time.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//! - [`StatelessTransformer`]: Transformers that learn nothing
//!
//! # Available Transformers
//!
//! ## Feature extraction
//! - [`DistanceTransformer`]: Haversine distance from four coordinate columns
//! - [`TimeFeaturesEncoder`]: Calendar fields from a timestamp column
//!
//! ## Scaling
//! - [`StandardScaler`]: Z-score normalization
//!
//! ## Encoding
//! - [`OneHotEncoder`]: Integer categories to one-hot blocks
//!
//! ## Composition
//! - [`Pipeline`]: Chain transformers together
//! - [`ColumnTransformer`]: Apply pipelines to column subsets and concatenate

pub mod column_transformer;
pub mod distance;
pub mod encoding;
pub mod pipeline;
pub mod scaling;
pub mod time_features;
pub mod traits;

// Re-export main types
pub use column_transformer::{
    ColumnSpec, ColumnTransformer, FittedColumnStep, FittedColumnTransformer,
};
pub use distance::{haversine_km, DistanceTransformer};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder};
pub use pipeline::{FittedPipeline, FittedPipelineStep, Pipeline, PipelineStep};
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerConfig};
pub use time_features::{parse_timestamp, CalendarField, TimeFeaturesEncoder};
pub use traits::{FittedTransformer, StatelessTransformer, Transformer};
