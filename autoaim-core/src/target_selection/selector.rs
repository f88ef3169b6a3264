use crate::beyblade::{BeybladeConfig, BeybladeIdentifier};
use crate::spatial::{Position, World};
use crate::target_tracker::TrackedTarget;

use super::config::SelectionConfig;
use super::update_state::UpdateState;

/// Stateful target selection: a sticky robot target (re-selected only when
/// it disappears), a plate target recomputed every tick from the robot's
/// neighborhood, and a beyblade identifier that decides whether the aim
/// point should be the robot itself or one of its plates.
pub struct TargetSelector<R: TrackedTarget + Clone, P: TrackedTarget + Clone> {
    config: SelectionConfig,
    identifier: BeybladeIdentifier,
    robot_target: Option<R>,
    plate_target: Option<P>,
    last_update_state: Option<UpdateState<R, P>>,
}

impl<R: TrackedTarget + Clone, P: TrackedTarget + Clone> TargetSelector<R, P> {
    pub fn new(config: SelectionConfig, beyblade_config: BeybladeConfig) -> Self {
        TargetSelector {
            config,
            identifier: BeybladeIdentifier::new(beyblade_config),
            robot_target: None,
            plate_target: None,
            last_update_state: None,
        }
    }

    pub fn update(
        &mut self,
        robots: Vec<R>,
        plates: Vec<P>,
        robot_selector: impl Fn(&[R]) -> Option<R>,
        plate_selector: impl Fn(&[P]) -> Option<P>,
    ) {
        self.identifier.update(&robots, &plates);

        let robot_still_present = self
            .robot_target
            .as_ref()
            .map(|r| robots.iter().any(|candidate| candidate.instance_id() == r.instance_id()))
            .unwrap_or(false);

        if !robot_still_present {
            self.robot_target = robot_selector(&robots);
        }

        self.plate_target = self.reselect_plate(&plates, &plate_selector);
        self.last_update_state = Some(UpdateState::new(robots, plates));
    }

    fn reselect_plate(&self, plates: &[P], plate_selector: &impl Fn(&[P]) -> Option<P>) -> Option<P> {
        let robot = self.robot_target.as_ref()?;
        let robot_pos = robot.latest_estimated_position();
        let nearby: Vec<P> = plates
            .iter()
            .filter(|p| Position::distance(&robot_pos, &p.latest_estimated_position()) <= self.config.plate_selection_radius)
            .cloned()
            .collect();
        plate_selector(&nearby)
    }

    /// Clears the robot sticky-lock and re-runs both selections against the
    /// last snapshot passed to `update`.
    pub fn reselect(&mut self, robot_selector: impl Fn(&[R]) -> Option<R>, plate_selector: impl Fn(&[P]) -> Option<P>) {
        let Some(state) = self.last_update_state.clone() else {
            return;
        };
        self.robot_target = robot_selector(&state.robots);
        self.plate_target = self.reselect_plate(&state.plates, &plate_selector);
    }

    /// The robot's position if no robot is selected or it is beyblading,
    /// else the selected plate's position.
    pub fn target(&self) -> Option<Position<World>> {
        let robot = self.robot_target.as_ref()?;
        if self.identifier.is_beyblading(robot.instance_id()) {
            Some(robot.latest_estimated_position())
        } else {
            self.plate_target
                .as_ref()
                .map(|p| p.latest_estimated_position())
                .or(Some(robot.latest_estimated_position()))
        }
    }

    pub fn robot_target(&self) -> Option<&R> {
        self.robot_target.as_ref()
    }

    pub fn plate_target(&self) -> Option<&P> {
        self.plate_target.as_ref()
    }
}
