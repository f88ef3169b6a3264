use crate::filters::LowPassFilter;
use crate::spatial::{Position, World};
use crate::time::{Duration, Local, Timestamp};

use super::grouper::GroupedCenter;
use super::RobotClusteringConfig;

fn interpolate_position(alpha: f64, a: &Position<World>, b: &Position<World>) -> Position<World> {
    Position::interpolate(alpha, a, b)
}

/// A variable-size set of position low-pass filters. Each observation is
/// greedily assigned to its nearest existing filter; a new filter is spawned
/// when the nearest filter is farther than `max_radius` or none exist yet.
/// Filters untouched for `age_limit` are culled after every batch of
/// observations; filters spawned this tick are never culled this tick.
pub struct VariableKMeans {
    filters: Vec<LowPassFilter<Local, Position<World>>>,
    config: RobotClusteringConfig,
}

impl VariableKMeans {
    pub fn new(config: RobotClusteringConfig) -> Self {
        VariableKMeans {
            filters: Vec::new(),
            config,
        }
    }

    pub fn positions(&self) -> Vec<Position<World>> {
        self.filters.iter().map(|f| *f.value()).collect()
    }

    pub fn update(&mut self, observations: &[GroupedCenter], current_time: Timestamp<Local>) {
        let mut newly_spawned = Vec::new();
        let mut assigned_this_batch = vec![false; self.filters.len()];

        for observation in observations {
            let nearest = self
                .filters
                .iter()
                .enumerate()
                .filter(|(idx, _)| !assigned_this_batch[*idx])
                .map(|(idx, f)| (idx, Position::distance(f.value(), &observation.position)))
                .min_by(|a, b| a.1.partial_cmp(&b.1).expect("distances are finite"));

            match nearest {
                Some((idx, distance)) if distance <= self.config.max_radius => {
                    self.filters[idx].update(observation.position, observation.timestamp);
                    assigned_this_batch[idx] = true;
                }
                _ => {
                    let filter = LowPassFilter::new(
                        self.config.interpolation_coefficient,
                        observation.position,
                        observation.timestamp,
                        interpolate_position,
                    )
                    .expect("clustering config validated at load time");
                    newly_spawned.push(filter);
                }
            }
        }

        self.cull(current_time);
        self.filters.append(&mut newly_spawned);
    }

    fn cull(&mut self, current_time: Timestamp<Local>) {
        let age_limit: Duration = self.config.age_limit;
        self.filters.retain(|f| {
            (current_time - f.latest_update_timestamp()) < age_limit
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RobotClusteringConfig {
        RobotClusteringConfig {
            min_radius: 0.05,
            max_radius: 0.5,
            age_limit: Duration::from_secs_f64(1.0),
            interpolation_coefficient: 0.5,
        }
    }

    fn ts(micros: i64) -> Timestamp<Local> {
        Timestamp::from_micros(micros)
    }

    fn center(x: f64, y: f64, t: i64) -> GroupedCenter {
        GroupedCenter {
            position: Position::new(x, y, 0.0),
            timestamp: ts(t),
        }
    }

    #[test]
    fn spawns_new_filter_when_no_nearby_one_exists() {
        let mut vkm = VariableKMeans::new(config());
        vkm.update(&[center(0.0, 0.0, 0)], ts(0));
        assert_eq!(vkm.positions().len(), 1);
    }

    #[test]
    fn culls_stale_filters_but_not_fresh_spawns() {
        let mut vkm = VariableKMeans::new(config());
        vkm.update(&[center(0.0, 0.0, 0)], ts(0));
        // far enough away in time that the filter above would be culled if it were old,
        // but a center arriving in the same batch should survive immediately
        vkm.update(&[center(5.0, 5.0, 2_000_000)], ts(2_000_000));
        assert_eq!(vkm.positions().len(), 1);
    }

    #[test]
    fn two_observations_nearest_the_same_filter_do_not_collapse_onto_it() {
        let mut vkm = VariableKMeans::new(config());
        vkm.update(&[center(0.0, 0.0, 0)], ts(0));
        assert_eq!(vkm.positions().len(), 1);

        // Both of these are nearest (and within max_radius of) the one
        // existing filter; the second one must spawn a new filter rather
        // than being assigned to the filter the first one just claimed.
        vkm.update(&[center(0.1, 0.0, 1), center(0.2, 0.0, 1)], ts(1));
        assert_eq!(vkm.positions().len(), 2);
    }
}
