//! Detected-region pruning, depth-based projection into 3D, and the
//! camera-relative / world-relative detected-target-set types.

mod config;
mod non_max_suppression;
mod prune;
mod target;
mod target_set;

pub use config::{CameraIntrinsics, DetectionConfig, TeamColor};
pub use non_max_suppression::non_max_suppressed;
pub use prune::prune_invalid_targets;
pub use target::{DetectedTargetPosition, DetectedTargetRegion, IntRectangle};
pub use target_set::{
    CameraRelativeDetectedTargetSet, DepthImage, ImageDetectedTargetSet, WorldDetectedTargetSet,
};
