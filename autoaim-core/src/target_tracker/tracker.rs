use crate::spatial::{MeasuredPosition, Position, World};
use crate::time::{Local, Timestamp};

use super::config::TrackerConfig;
use super::tracked_target::TrackedTarget;

/// A bank of `T: TrackedTarget` with greedy nearest-neighbor data
/// association, birth, death and extrapolation.
pub struct TargetTracker<T: TrackedTarget> {
    targets: Vec<T>,
    config: TrackerConfig,
    next_instance_id: u64,
}

impl<T: TrackedTarget> TargetTracker<T> {
    pub fn new(config: TrackerConfig) -> Self {
        TargetTracker {
            targets: Vec::new(),
            config,
            next_instance_id: 1,
        }
    }

    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// For each existing target, extrapolates to `t` and greedily pairs it
    /// with the nearest unmatched measurement under `max_distance`.
    /// Unmatched targets within `max_staleness` of their last real
    /// observation receive an extrapolation-only update; others are
    /// dropped. Leftover measurements spawn new targets.
    pub fn update<F>(&mut self, measurements: Vec<MeasuredPosition<World>>, t: Timestamp<Local>, spawn: F)
    where
        F: Fn(u64, MeasuredPosition<World>, Timestamp<Local>, &TrackerConfig) -> T,
    {
        let mut unmatched: Vec<Option<MeasuredPosition<World>>> =
            measurements.into_iter().map(Some).collect();
        let mut survivors = Vec::with_capacity(self.targets.len());

        for mut target in self.targets.drain(..) {
            let extrapolated = target.extrapolate_position(t);
            let nearest = nearest_unmatched(&unmatched, &extrapolated, self.config.max_distance);

            match nearest {
                Some(idx) => {
                    let measurement = unmatched[idx].take().expect("index came from nearest_unmatched");
                    target.update_from_measurement(measurement, t);
                    survivors.push(target);
                }
                None => {
                    let staleness = t - target.latest_observed_timestamp();
                    if staleness <= self.config.max_staleness {
                        target.update_from_extrapolation(t);
                        survivors.push(target);
                    }
                    // else: dropped.
                }
            }
        }

        for measurement in unmatched.into_iter().flatten() {
            let id = self.next_instance_id;
            self.next_instance_id += 1;
            survivors.push(spawn(id, measurement, t, &self.config));
        }

        self.targets = survivors;
    }
}

fn nearest_unmatched(
    unmatched: &[Option<MeasuredPosition<World>>],
    extrapolated: &Position<World>,
    max_distance: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, slot) in unmatched.iter().enumerate() {
        if let Some(measurement) = slot {
            let distance = Position::distance(&measurement.position, extrapolated);
            if distance < max_distance {
                match best {
                    Some((_, best_distance)) if best_distance <= distance => {}
                    _ => best = Some((idx, distance)),
                }
            }
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::LinearUncertainty;
    use crate::target_tracker::KalmanTrackedTarget;
    use crate::time::Duration;

    fn config() -> TrackerConfig {
        TrackerConfig {
            max_distance: 0.5,
            max_staleness: Duration::from_micros(16_000),
            initial_derivative_variance: [10.0, 100.0],
            intrinsic_noise: [0.01, 0.1, 1.0],
        }
    }

    fn measured(x: f64, y: f64, z: f64) -> MeasuredPosition<World> {
        MeasuredPosition::new(
            Position::new(x, y, z),
            LinearUncertainty::from_variances(0.01, 0.01, 0.01),
        )
    }

    fn ts(micros: i64) -> Timestamp<Local> {
        Timestamp::from_micros(micros)
    }

    #[test]
    fn births_and_tracks_a_target() {
        let mut tracker: TargetTracker<KalmanTrackedTarget> = TargetTracker::new(config());
        tracker.update(vec![measured(10.0, 0.0, 0.0)], ts(0), KalmanTrackedTarget::new);
        assert_eq!(tracker.targets().len(), 1);
        let id = tracker.targets()[0].instance_id();

        tracker.update(vec![measured(10.1, 0.0, 0.0)], ts(16_000), KalmanTrackedTarget::new);
        assert_eq!(tracker.targets().len(), 1);
        assert_eq!(tracker.targets()[0].instance_id(), id);
    }

    #[test]
    fn drops_target_after_exceeding_max_staleness() {
        let mut tracker: TargetTracker<KalmanTrackedTarget> = TargetTracker::new(config());
        tracker.update(vec![measured(10.0, 0.0, 0.0)], ts(0), KalmanTrackedTarget::new);
        // no measurement this tick, and the gap exceeds max_staleness (16ms)
        tracker.update(vec![], ts(40_000), KalmanTrackedTarget::new);
        assert_eq!(tracker.targets().len(), 0);
    }

    #[test]
    fn survives_single_missed_observation_within_staleness() {
        let mut tracker: TargetTracker<KalmanTrackedTarget> = TargetTracker::new(config());
        tracker.update(vec![measured(10.0, 0.0, 0.0)], ts(0), KalmanTrackedTarget::new);
        tracker.update(vec![], ts(16_000), KalmanTrackedTarget::new);
        assert_eq!(tracker.targets().len(), 1);
    }

    #[test]
    fn unmatched_measurement_spawns_new_target_with_fresh_id() {
        let mut tracker: TargetTracker<KalmanTrackedTarget> = TargetTracker::new(config());
        tracker.update(vec![measured(10.0, 0.0, 0.0)], ts(0), KalmanTrackedTarget::new);
        let first_id = tracker.targets()[0].instance_id();

        tracker.update(
            vec![measured(10.1, 0.0, 0.0), measured(-5.0, 0.0, 0.0)],
            ts(16_000),
            KalmanTrackedTarget::new,
        );
        assert_eq!(tracker.targets().len(), 2);
        assert!(tracker.targets().iter().any(|t| t.instance_id() != first_id));
    }
}
