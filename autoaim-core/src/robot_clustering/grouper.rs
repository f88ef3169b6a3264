use crate::spatial::{Position, World};
use crate::target_tracker::TrackedTarget;
use crate::time::{Local, Timestamp};

/// A grouped center produced by pairing (or passing through) tracked plates.
#[derive(Clone, Copy, Debug)]
pub struct GroupedCenter {
    pub position: Position<World>,
    pub timestamp: Timestamp<Local>,
}

/// Greedily pairs targets whose pairwise distance lies in
/// `[min_radius, max_radius]`; each target participates in at most one pair.
/// A paired center is the midpoint of the pair, timestamped by the seed
/// target's `latest_update_timestamp`; an unpaired target passes through
/// under its own position and timestamp.
pub fn group_targets<T: TrackedTarget>(
    min_radius: f64,
    max_radius: f64,
    targets: &[T],
) -> Vec<GroupedCenter> {
    let mut remaining: Vec<usize> = (0..targets.len()).collect();
    let mut centers = Vec::new();

    while let Some(seed_idx) = remaining.first().copied() {
        remaining.remove(0);
        let seed = &targets[seed_idx];
        let seed_pos = seed.latest_estimated_position();

        let partner = remaining
            .iter()
            .enumerate()
            .filter_map(|(pos_in_remaining, &idx)| {
                let distance = Position::distance(&seed_pos, &targets[idx].latest_estimated_position());
                (distance >= min_radius && distance <= max_radius).then_some((pos_in_remaining, distance))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).expect("distances are finite"))
            .map(|(pos_in_remaining, _distance)| pos_in_remaining);

        match partner {
            Some(pos_in_remaining) => {
                let partner_idx = remaining.remove(pos_in_remaining);
                let midpoint = Position::interpolate(
                    0.5,
                    &seed_pos,
                    &targets[partner_idx].latest_estimated_position(),
                );
                centers.push(GroupedCenter {
                    position: midpoint,
                    timestamp: seed.latest_update_timestamp(),
                });
            }
            None => {
                centers.push(GroupedCenter {
                    position: seed_pos,
                    timestamp: seed.latest_update_timestamp(),
                });
            }
        }
    }

    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::LinearUncertainty;
    use crate::target_tracker::KalmanTrackedTarget;
    use crate::target_tracker::TrackerConfig;
    use crate::time::Duration;

    fn config() -> TrackerConfig {
        TrackerConfig {
            max_distance: 0.5,
            max_staleness: Duration::from_micros(16_000),
            initial_derivative_variance: [10.0, 100.0],
            intrinsic_noise: [0.01, 0.1, 1.0],
        }
    }

    fn target(id: u64, x: f64, y: f64) -> KalmanTrackedTarget {
        KalmanTrackedTarget::new(
            id,
            crate::spatial::MeasuredPosition::new(
                Position::new(x, y, 0.0),
                LinearUncertainty::from_variances(0.01, 0.01, 0.01),
            ),
            Timestamp::from_micros(0),
            &config(),
        )
    }

    #[test]
    fn pairs_close_plates_into_a_midpoint() {
        let targets = vec![target(1, 0.0, 0.0), target(2, 0.1, 0.0)];
        let centers = group_targets(0.05, 0.5, &targets);
        assert_eq!(centers.len(), 1);
        assert!((centers[0].position.x() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn leaves_far_plates_unpaired() {
        let targets = vec![target(1, 0.0, 0.0), target(2, 5.0, 0.0)];
        let centers = group_targets(0.05, 0.5, &targets);
        assert_eq!(centers.len(), 2);
    }
}
