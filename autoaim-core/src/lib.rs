//! Reference-frame algebra, target tracking, clustering, beyblade detection and
//! target selection for the auto-aim perception pipeline.

pub mod beyblade;
pub mod error;
pub mod filters;
pub mod robot_clustering;
pub mod spatial;
pub mod target_detector;
pub mod target_selection;
pub mod target_tracker;
pub mod time;

pub use error::CoreError;
