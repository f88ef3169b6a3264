//! Per-frame orchestration: detect, prune, project to world, track, cluster,
//! select, emit.

use std::sync::Arc;

use autoaim_core::beyblade::BeybladeIdentifier;
use autoaim_core::robot_clustering::RobotClusterer;
use autoaim_core::spatial::{
    ColorCamera, LinearUncertainty, MeasuredPosition, Orientation, Position, TurretBase, TurretYawRef,
    World,
};
use autoaim_core::target_detector::{
    prune_invalid_targets, DepthImage, DetectedTargetRegion, TeamColor,
};
use autoaim_core::target_detector::{CameraRelativeDetectedTargetSet, WorldDetectedTargetSet};
use autoaim_core::target_selection::{SelectionRule, TargetSelector, TurretDistanceRule, TurretRotationDifferenceRule};
use autoaim_core::target_tracker::{KalmanTrackedTarget, TargetTracker, TrackedTarget};
use autoaim_core::time::{Local, Timestamp};
use autoaim_uart::messages::AutoAimTargetUpdateMessage;

use crate::config::AppConfig;
use crate::host_state::HostState;

/// One camera frame's worth of already-detected regions plus the depth
/// image backing the detector's median-depth projection. Production of
/// these values (the detection model itself) is out of scope here.
pub struct RawFrame {
    pub local_timestamp: Timestamp<Local>,
    pub regions: Vec<DetectedTargetRegion>,
    pub depth_width: u32,
    pub depth_height: u32,
    pub depth_samples: Vec<f32>,
}

/// Supplies frames to the main loop. The real implementation lives behind
/// the camera/inference stack this crate does not prescribe.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<RawFrame>;
}

/// Receives every frame as it arrives, e.g. to append it to a video chunk
/// writer. The wire/container format is not prescribed.
pub trait VideoSink {
    fn record(&mut self, frame: &RawFrame);
}

/// Isotropic covariance assigned to clustered robot-center measurements fed
/// into the robot tracker.
const ROBOT_CENTER_VARIANCE: f64 = 0.05 * 0.05;

pub struct MainLoop {
    config: AppConfig,
    host_state: Arc<HostState>,
    own_team_color: TeamColor,
    plate_tracker: TargetTracker<KalmanTrackedTarget>,
    robot_tracker: TargetTracker<KalmanTrackedTarget>,
    clusterer: RobotClusterer,
    selector: TargetSelector<KalmanTrackedTarget, KalmanTrackedTarget>,
}

impl MainLoop {
    pub fn new(config: AppConfig, host_state: Arc<HostState>, own_team_color: TeamColor) -> Self {
        let plate_tracker = TargetTracker::new(config.tracker);
        let robot_tracker = TargetTracker::new(config.tracker);
        let clusterer = RobotClusterer::new(config.clustering);
        let selector = TargetSelector::new(config.selection, config.beyblade);

        MainLoop {
            config,
            host_state,
            own_team_color,
            plate_tracker,
            robot_tracker,
            clusterer,
            selector,
        }
    }

    /// Runs the per-frame pipeline once. Returns the outbound message to
    /// send to the MCB, or `None` if the frame was skipped (unknown
    /// identity or no buffered odometry).
    pub fn step(
        &mut self,
        frame_source: &mut impl FrameSource,
        video_sink: Option<&mut dyn VideoSink>,
    ) -> Option<AutoAimTargetUpdateMessage> {
        let frame = frame_source.next_frame()?;

        if let Some(sink) = video_sink {
            sink.record(&frame);
        }

        let Some(odometry) = self.host_state.nearest_odometry(frame.local_timestamp) else {
            tracing::warn!("no buffered odometry for this frame, skipping");
            return None;
        };

        let prune = prune_invalid_targets(&frame.regions, self.own_team_color, &self.config.detection);
        if prune.size_rejection_count > 0 {
            tracing::debug!(count = prune.size_rejection_count, "rejected undersized regions");
        }

        let world_to_turret_base = autoaim_core::spatial::Transform::<World, TurretBase>::new(
            odometry.chassis_position,
            Orientation::identity(),
        );
        let turret_base_to_yaw_ref = autoaim_core::spatial::Transform::<TurretBase, TurretYawRef>::new(
            Position::of_origin(),
            odometry.yaw,
        );
        let yaw_ref_to_pitch_ref = autoaim_core::spatial::Transform::<
            TurretYawRef,
            autoaim_core::spatial::TurretPitchRef,
        >::new(Position::of_origin(), odometry.pitch);
        let pitch_ref_to_turret_ref = self
            .config
            .mechanical
            .pitch_ref_to_turret_ref
            .transform::<autoaim_core::spatial::TurretPitchRef, autoaim_core::spatial::TurretRef>();
        let turret_ref_to_launcher = self
            .config
            .mechanical
            .turret_ref_to_launcher
            .transform::<autoaim_core::spatial::TurretRef, autoaim_core::spatial::Launcher>();
        let turret_ref_to_color_camera = self
            .config
            .mechanical
            .turret_ref_to_color_camera
            .transform::<autoaim_core::spatial::TurretRef, ColorCamera>();

        let world_to_turret_ref = world_to_turret_base
            .compose(&turret_base_to_yaw_ref)
            .compose(&yaw_ref_to_pitch_ref)
            .compose(&pitch_ref_to_turret_ref);
        let world_to_launcher = world_to_turret_ref.compose(&turret_ref_to_launcher);
        let world_to_camera = world_to_turret_ref.compose(&turret_ref_to_color_camera);
        let camera_to_world = world_to_camera.inverse();

        let depth = DepthImage {
            width: frame.depth_width,
            height: frame.depth_height,
            samples: &frame.depth_samples,
        };

        let camera_relative = CameraRelativeDetectedTargetSet::from_detected_rectangles(
            &prune.targets,
            &depth,
            &self.config.camera_intrinsics,
            &self.config.detection,
            frame.local_timestamp,
        );
        let world = WorldDetectedTargetSet::from_camera_relative(
            &camera_relative,
            &camera_to_world,
            odometry.mcb_timestamp,
        );

        let plate_measurements: Vec<MeasuredPosition<World>> = world.targets.iter().map(|t| t.measured).collect();
        self.plate_tracker
            .update(plate_measurements, frame.local_timestamp, KalmanTrackedTarget::new);

        self.clusterer.update(self.plate_tracker.targets(), frame.local_timestamp);
        let robot_measurements: Vec<MeasuredPosition<World>> = self
            .clusterer
            .robot_centers()
            .into_iter()
            .map(|position| {
                MeasuredPosition::new(
                    position,
                    LinearUncertainty::from_variances(
                        ROBOT_CENTER_VARIANCE,
                        ROBOT_CENTER_VARIANCE,
                        ROBOT_CENTER_VARIANCE,
                    ),
                )
            })
            .collect();
        self.robot_tracker
            .update(robot_measurements, frame.local_timestamp, KalmanTrackedTarget::new);

        let distance_rule = TurretDistanceRule {
            max_distance: self.config.selection.max_turret_distance,
            transform: world_to_launcher,
        };
        let rotation_rule = TurretRotationDifferenceRule {
            transform: world_to_launcher,
        };
        let rules: Vec<(&dyn SelectionRule<KalmanTrackedTarget>, f64)> = vec![
            (&distance_rule, self.config.selection.turret_distance_weight),
            (&rotation_rule, self.config.selection.turret_rotation_difference_weight),
        ];
        let max_threshold = self.config.selection.maximum_score_threshold;

        let select = |candidates: &[KalmanTrackedTarget]| {
            autoaim_core::target_selection::select_target(&rules, max_threshold, candidates).cloned()
        };

        self.selector.update(
            self.robot_tracker.targets().to_vec(),
            self.plate_tracker.targets().to_vec(),
            select,
            select,
        );

        if let Some(request) = self.host_state.take_pending_reselect() {
            tracing::info!(request_id = request.request_id, "servicing forced reselect");
            self.selector.reselect(select, select);
        }

        let message = match self.selector.target() {
            Some(target) => {
                let robot = self.selector.robot_target();
                let velocity = robot
                    .map(|r| r.latest_estimated_velocity())
                    .unwrap_or_else(autoaim_core::spatial::Vector::zero);
                AutoAimTargetUpdateMessage::with_target(
                    target,
                    velocity,
                    autoaim_core::spatial::Vector::zero(),
                    odometry.mcb_timestamp,
                )
            }
            None => AutoAimTargetUpdateMessage::no_target(odometry.mcb_timestamp),
        };

        Some(message)
    }
}
