//! # taxifare
//!
//! A linear-regression fare model for taxi rides with strict separation
//! between configured and fitted components.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: Transformers and models carry their training state in
//!   the type system (`StandardScaler` vs `FittedStandardScaler`, `LinearModel<Unfitted>`
//!   vs `LinearModel<Fitted>`), so inference on an untrained component does not compile.
//! - **Tagged Composition**: Pipelines are ordered sequences of enum steps, each
//!   owning its learned parameters after fitting.
//! - **Deterministic Training**: Least squares is solved in closed form and the
//!   held-out split is driven by a seeded generator.
//!
//! ## Quick Start
//!
//! ```no_run
//! use taxifare::dataset::{load_rides, rides_to_frame, train_test_split, CleaningPolicy};
//! use taxifare::trainer::Trainer;
//!
//! let rides = CleaningPolicy::default().clean(load_rides("train.csv", Some(10_000))?);
//! let (x, y) = rides_to_frame(&rides)?.split_target("fare_amount")?;
//! let split = train_test_split(&x, &y, 0.2, 42)?;
//!
//! let mut trainer = Trainer::new(split.x_train, split.y_train)?;
//! trainer.run()?;
//! println!("rmse = {}", trainer.evaluate(&split.x_test, &split.y_test)?);
//! # Ok::<(), taxifare::error::FareError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: CSV loading, cleaning, column frames, held-out split
//! - `preprocessing`: distance and calendar features, scaling, one-hot encoding, pipelines
//! - `model`: linear regression with stateful type parameters
//! - `pipeline`: preprocessing plus model as one trainable unit
//! - `trainer`: assembles, fits and evaluates the fare pipeline
//! - `metrics`: RMSE and related regression metrics

/// Column names and run settings.
pub mod config;

/// Data loading, cleaning and splitting.
pub mod dataset;

/// Error type shared by every stage.
pub mod error;

/// Regression metrics.
pub mod metrics;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Preprocessing plus model as one trainable unit.
pub mod pipeline;

/// Feature transformers for fare pipelines.
pub mod preprocessing;

/// High-level training orchestration.
pub mod trainer;

pub use config::{FeatureConfig, TrainConfig};
pub use error::{FareError, Result};
pub use trainer::Trainer;
