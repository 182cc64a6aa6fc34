pub mod state;
pub use state::{Fitted, Unfitted};

pub mod linear;
pub use linear::{LinearModel, LinearParams, LinearRegression};

use crate::error::Result;

/// A trained model that maps feature vectors to predictions.
pub trait InferenceModel {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;

    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle>;
    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch>;
}
