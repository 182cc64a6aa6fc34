/// A marker type indicating that a model is **not yet trained**.
///
/// This phantom type is used in generic parameters (e.g., `LinearModel<Unfitted>`)
/// to enforce compile-time guarantees:
/// - `fit` is only available on an `Unfitted` model.
/// - Inference methods (`predict`) are **not available** until the model is converted to `Fitted`.
///
/// This prevents accidental use of an untrained model for prediction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// After training, a model is converted from `Model<Unfitted>` to `Model<Fitted>`,
/// which implements [`InferenceModel`](super::InferenceModel).
///
/// A `Fitted` model contains **only inference parameters**: no solver state
/// or training data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fitted;
