//! Domain-tagged timestamps, durations and the timestamped history buffer used
//! to reconcile the local capture clock with the MCB's odometry clock.

mod duration;
mod history_buffer;
mod timestamp;

pub use duration::Duration;
pub use history_buffer::TimestampedHistoryBuffer;
pub use timestamp::{Local, Odometry, TimeDomain, Timestamp};
