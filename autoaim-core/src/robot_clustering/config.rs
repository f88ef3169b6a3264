use serde::{Deserialize, Serialize};

use crate::time::Duration;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RobotClusteringConfig {
    /// Two plates closer than this are never paired (they are assumed to be
    /// the same plate seen twice).
    pub min_radius: f64,
    /// Two plates farther than this are never paired into one robot.
    pub max_radius: f64,
    /// A cluster filter not touched for this long is culled.
    pub age_limit: Duration,
    /// One-second blend coefficient for each cluster's position low-pass
    /// filter.
    pub interpolation_coefficient: f64,
}
