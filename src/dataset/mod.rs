//! Loading, cleaning and splitting ride data.

pub mod clean;
pub mod frame;
pub mod record;
pub mod split;

pub use self::clean::CleaningPolicy;
pub use self::frame::{Column, Frame};
pub use self::record::{load_rides, read_rides, rides_to_frame, RideRecord};
pub use self::split::{train_test_split, TrainTestSplit};
