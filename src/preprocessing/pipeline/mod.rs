//! Pipeline utilities for chaining transformers.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Pipeline`] | Chain transformers sequentially |
//! | [`PipelineStep`] | Unfitted step variants |
//! | [`FittedPipelineStep`] | Fitted step variants owning their parameters |

#[allow(clippy::module_inception)]
pub mod pipeline;

pub use pipeline::{FittedPipeline, FittedPipelineStep, Pipeline, PipelineStep};
