use crate::spatial::{Launcher, Position, Transform, World};
use crate::target_tracker::TrackedTarget;

/// A pluggable scoring rule. Returning `None` disqualifies the target
/// outright, regardless of other rules' scores.
pub trait SelectionRule<T: TrackedTarget> {
    fn score(&self, target: &T) -> Option<f64>;
}

fn launcher_position<T: TrackedTarget>(
    target: &T,
    transform: &Transform<World, Launcher>,
) -> Position<Launcher> {
    transform.apply_to_position(target.latest_estimated_position())
}

/// Invalid (returns `None`) beyond `max_distance`; otherwise scores
/// proportionally to the fraction of `max_distance` used.
pub struct TurretDistanceRule {
    pub max_distance: f64,
    pub transform: Transform<World, Launcher>,
}

impl<T: TrackedTarget> SelectionRule<T> for TurretDistanceRule {
    fn score(&self, target: &T) -> Option<f64> {
        let pos = launcher_position(target, &self.transform);
        let distance = Position::distance(&pos, &Position::of_origin());
        if distance > self.max_distance {
            None
        } else {
            Some((distance / self.max_distance) * 100.0)
        }
    }
}

/// Scores how far off-axis (from the launcher's forward `x` axis) the
/// target lies, in degrees-equivalent units scaled to `[0, 100]`.
pub struct TurretRotationDifferenceRule {
    pub transform: Transform<World, Launcher>,
}

impl<T: TrackedTarget> SelectionRule<T> for TurretRotationDifferenceRule {
    fn score(&self, target: &T) -> Option<f64> {
        let pos = launcher_position(target, &self.transform);
        let distance = Position::distance(&pos, &Position::of_origin());
        if distance == 0.0 {
            Some(0.0)
        } else {
            Some((pos.x() / distance).acos() * 100.0 / std::f64::consts::PI)
        }
    }
}

/// `0.0` if `target` is (by identity) `target_ref`, else `1.0`. Used to bias
/// selection toward sticking with the currently-selected target.
pub struct IdentityRule<'a, T> {
    pub target_ref: &'a T,
}

impl<'a, T: TrackedTarget> SelectionRule<T> for IdentityRule<'a, T> {
    fn score(&self, target: &T) -> Option<f64> {
        if std::ptr::eq(target, self.target_ref) {
            Some(0.0)
        } else {
            Some(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{LinearUncertainty, MeasuredPosition};
    use crate::target_tracker::{KalmanTrackedTarget, TrackerConfig};
    use crate::time::{Duration, Timestamp};

    fn config() -> TrackerConfig {
        TrackerConfig {
            max_distance: 0.5,
            max_staleness: Duration::from_micros(16_000),
            initial_derivative_variance: [10.0, 100.0],
            intrinsic_noise: [0.01, 0.1, 1.0],
        }
    }

    fn target(x: f64, y: f64) -> KalmanTrackedTarget {
        KalmanTrackedTarget::new(
            1,
            MeasuredPosition::new(
                Position::new(x, y, 0.0),
                LinearUncertainty::from_variances(0.01, 0.01, 0.01),
            ),
            Timestamp::from_micros(0),
            &config(),
        )
    }

    #[test]
    fn straight_ahead_target_beats_off_axis_target() {
        let transform: Transform<World, Launcher> = Transform::identity();
        let straight = target(5.0, 0.0);
        let off_axis = target(3.0, 4.0);

        let rotation_rule = TurretRotationDifferenceRule { transform };
        let straight_score = SelectionRule::score(&rotation_rule, &straight).unwrap();
        let off_axis_score = SelectionRule::score(&rotation_rule, &off_axis).unwrap();
        assert!(straight_score < off_axis_score);
    }

    #[test]
    fn distance_rule_rejects_beyond_max() {
        let transform: Transform<World, Launcher> = Transform::identity();
        let far = target(50.0, 0.0);
        let rule = TurretDistanceRule {
            max_distance: 10.0,
            transform,
        };
        assert_eq!(SelectionRule::score(&rule, &far), None);
    }
}
