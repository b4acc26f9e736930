//! Recording module for aggregating a ride from location fixes and sensor readings.

pub mod aggregator;
pub mod clock;
pub mod shared;
pub mod types;

pub use aggregator::RideAggregator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use shared::SharedRideAggregator;
pub use types::{
    RecorderConfig, RecordingStatus, RideDataPoint, RideStats, RideSummary,
    DEFAULT_MOVING_SPEED_THRESHOLD_MS,
};
