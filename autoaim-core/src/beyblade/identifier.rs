use std::collections::HashMap;

use crate::target_tracker::TrackedTarget;

use super::{BeybladeConfig, BeybladeIndicator};

/// Maintains one [`BeybladeIndicator`] per currently-tracked robot, fed each
/// tick by the mean relative-velocity magnitude of the plates associated
/// with that robot.
pub struct BeybladeIdentifier {
    config: BeybladeConfig,
    indicators: HashMap<u64, BeybladeIndicator>,
}

impl BeybladeIdentifier {
    pub fn new(config: BeybladeConfig) -> Self {
        BeybladeIdentifier {
            config,
            indicators: HashMap::new(),
        }
    }

    pub fn is_beyblading(&self, robot_instance_id: u64) -> bool {
        self.indicators
            .get(&robot_instance_id)
            .map(|i| i.value())
            .unwrap_or(false)
    }

    pub fn update<R: TrackedTarget, P: TrackedTarget>(&mut self, robots: &[R], plates: &[P]) {
        let current_ids: std::collections::HashSet<u64> =
            robots.iter().map(|r| r.instance_id()).collect();
        self.indicators.retain(|id, _| current_ids.contains(id));

        for robot in robots {
            self.indicators
                .entry(robot.instance_id())
                .or_insert_with(|| BeybladeIndicator::new(&self.config, robot.latest_update_timestamp()));
        }

        // Each plate associates with its single nearest robot (not every
        // robot within radius), matching the source's `min`-by-distance
        // pairing; only counted if that nearest robot is within radius.
        let mut velocities_by_robot: HashMap<u64, Vec<_>> = HashMap::new();
        for plate in plates {
            let plate_pos = plate.latest_estimated_position();
            let nearest = robots.iter().min_by(|a, b| {
                let da = crate::spatial::Position::distance(&a.latest_estimated_position(), &plate_pos);
                let db = crate::spatial::Position::distance(&b.latest_estimated_position(), &plate_pos);
                da.partial_cmp(&db).expect("distances are finite")
            });
            if let Some(robot) = nearest {
                let distance =
                    crate::spatial::Position::distance(&robot.latest_estimated_position(), &plate_pos);
                if distance <= self.config.max_association_radius {
                    velocities_by_robot
                        .entry(robot.instance_id())
                        .or_default()
                        .push(plate.latest_estimated_velocity());
                }
            }
        }

        for robot in robots {
            let associated_velocities = velocities_by_robot
                .get(&robot.instance_id())
                .cloned()
                .unwrap_or_default();

            let mean_relative_speed = if associated_velocities.is_empty() {
                0.0
            } else {
                let robot_velocity = robot.latest_estimated_velocity();
                let sum: f64 = associated_velocities
                    .iter()
                    .map(|v| (*v - robot_velocity).magnitude())
                    .sum();
                sum / associated_velocities.len() as f64
            };

            let spinning = mean_relative_speed >= self.config.relative_velocity_magnitude_threshold;
            if let Some(indicator) = self.indicators.get_mut(&robot.instance_id()) {
                indicator.update(spinning, robot.latest_update_timestamp());
            }
        }
    }
}
