use crate::target_tracker::TrackedTarget;

use super::rules::SelectionRule;

/// Computes the weighted sum of `rules` against `target`; any rule
/// returning `None` disqualifies the target immediately (short-circuiting
/// remaining rules).
fn evaluate_target<T: TrackedTarget>(rules: &[(&dyn SelectionRule<T>, f64)], target: &T) -> Option<f64> {
    let mut total = 0.0;
    for (rule, weight) in rules {
        let score = rule.score(target)?;
        total += weight * score;
    }
    Some(total)
}

/// Selects the minimum-scoring target among `targets`, dropping any target
/// disqualified by a rule or scoring at/above `maximum_score_threshold`
/// (when set). Returns `None` if no target qualifies.
pub fn select_target<'a, T: TrackedTarget>(
    rules: &[(&dyn SelectionRule<T>, f64)],
    maximum_score_threshold: Option<f64>,
    targets: &'a [T],
) -> Option<&'a T> {
    targets
        .iter()
        .filter_map(|target| evaluate_target(rules, target).map(|score| (target, score)))
        .filter(|(_, score)| maximum_score_threshold.map(|max| *score < max).unwrap_or(true))
        .min_by(|a, b| a.1.partial_cmp(&b.1).expect("scores are finite"))
        .map(|(target, _)| target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Launcher, LinearUncertainty, MeasuredPosition, Position, Transform, World};
    use crate::target_selection::{TurretDistanceRule, TurretRotationDifferenceRule};
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
    fn picks_straight_ahead_target_over_farther_off_axis_one() {
        let transform: Transform<World, Launcher> = Transform::identity();
        let targets = vec![target(5.0, 0.0), target(3.0, 4.0)];

        let distance_rule = TurretDistanceRule {
            max_distance: 10.0,
            transform,
        };
        let rotation_rule = TurretRotationDifferenceRule { transform };
        let rules: Vec<(&dyn crate::target_selection::SelectionRule<KalmanTrackedTarget>, f64)> =
            vec![(&distance_rule, 0.5), (&rotation_rule, 2.0)];

        let selected = select_target(&rules, None, &targets).unwrap();
        assert_eq!(selected.latest_estimated_position(), targets[0].latest_estimated_position());
    }
}
