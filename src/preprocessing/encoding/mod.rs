//! Categorical feature encoding.
//!
//! ```text
//! // Input: [[0], [1], [2]]  (3 samples, 1 categorical feature)
//! // Output: [[1,0,0], [0,1,0], [0,0,1]]  (3 samples, 3 binary features)
//! ```
//!
//! Categories are non-negative integers stored as `f64`, which is what the
//! calendar features produce.

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Ignore unknown categories (output zeros).
    Ignore,
}
