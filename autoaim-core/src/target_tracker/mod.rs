//! Constant-model Kalman tracking with greedy nearest-neighbor data
//! association, birth/death and extrapolation.

mod adskalman_target;
mod config;
mod estimators;
mod kalman_target;
mod tracked_target;
mod tracker;

pub use adskalman_target::AdsKalmanTrackedTarget;
pub use config::TrackerConfig;
pub use kalman_target::KalmanTrackedTarget;
pub use tracked_target::TrackedTarget;
pub use tracker::TargetTracker;
