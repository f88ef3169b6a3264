use serde::{Deserialize, Serialize};

use crate::time::Duration;

/// Shared across both `TrackedTarget` implementations and the tracker bank
/// that owns them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// A candidate measurement farther than this from a target's
    /// extrapolated position is not associated with that target.
    pub max_distance: f64,
    /// A target with no matching measurement is kept alive (extrapolated)
    /// for at most this long since its last real observation.
    pub max_staleness: Duration,
    /// Variance seeded into the velocity/acceleration slots of a freshly
    /// born target, per derivative order (index 0 = velocity, 1 = acceleration).
    pub initial_derivative_variance: [f64; 2],
    /// Process noise injected into each derivative slot per unit time,
    /// per axis (index 0 = position, 1 = velocity, 2 = acceleration).
    pub intrinsic_noise: [f64; 3],
}

/// Logged (not failed) once a filter's covariance exceeds this on any
/// diagonal entry.
pub const COVARIANCE_WARNING_THRESHOLD: f64 = 1e13;

/// Variance assigned to the position slots of a newly-born target before its
/// first measurement overwrites it.
pub const INITIAL_POSITION_VARIANCE: f64 = 1e12;
