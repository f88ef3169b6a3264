use crate::spatial::{Position, World};
use crate::target_tracker::TrackedTarget;
use crate::time::Timestamp;
use crate::time::Local;

use super::grouper::group_targets;
use super::{RobotClusteringConfig, VariableKMeans};

/// Combines pairwise grouping of tracked plates with a variable-K set of
/// position low-pass filters to produce stable robot centers.
pub struct RobotClusterer {
    config: RobotClusteringConfig,
    means: VariableKMeans,
}

impl RobotClusterer {
    pub fn new(config: RobotClusteringConfig) -> Self {
        RobotClusterer {
            config,
            means: VariableKMeans::new(config),
        }
    }

    pub fn update<T: TrackedTarget>(&mut self, plates: &[T], current_time: Timestamp<Local>) {
        let grouped = group_targets(self.config.min_radius, self.config.max_radius, plates);
        self.means.update(&grouped, current_time);
    }

    pub fn robot_centers(&self) -> Vec<Position<World>> {
        self.means.positions()
    }
}
