//! Layered YAML configuration loading, mirroring the left-to-right
//! override precedence used across the workspace's config-driven binaries.

use std::path::Path;

use serde::{Deserialize, Serialize};

use autoaim_core::beyblade::BeybladeConfig;
use autoaim_core::robot_clustering::RobotClusteringConfig;
use autoaim_core::spatial::{Orientation, Position};
use autoaim_core::target_detector::{CameraIntrinsics, DetectionConfig};
use autoaim_core::target_selection::SelectionConfig;
use autoaim_core::target_tracker::TrackerConfig;
use autoaim_core::time::Duration;

use crate::error::AppError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub discard_warning_threshold: u64,
    pub max_num_parse_errors: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub root_dir: String,
    pub prefix: String,
    pub record_video: bool,
}

/// A position and orientation as they appear in config YAML: three-element
/// lists, the orientation given as `(roll, pitch, yaw)` radians.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PoseConfig {
    pub translation: [f64; 3],
    pub rotation_rpy: [f64; 3],
}

impl PoseConfig {
    pub fn position<F: autoaim_core::spatial::Frame>(&self) -> Position<F> {
        Position::new(self.translation[0], self.translation[1], self.translation[2])
    }

    pub fn orientation<F: autoaim_core::spatial::Frame>(&self) -> Orientation<F> {
        Orientation::from_euler_angles(self.rotation_rpy[0], self.rotation_rpy[1], self.rotation_rpy[2])
    }

    pub fn transform<Src: autoaim_core::spatial::Frame, Dst: autoaim_core::spatial::Frame>(
        &self,
    ) -> autoaim_core::spatial::Transform<Src, Dst> {
        autoaim_core::spatial::Transform::new(self.position(), self.orientation())
    }
}

/// The static mechanical transforms chaining the turret joints together,
/// composed at startup with the odometry-reported yaw/pitch to build the
/// per-frame camera/launcher transform.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MechanicalTransforms {
    /// `TurretPitchRef -> TurretRef`: the fixed offset from the
    /// pitch-angle reference point to the turret's own reference frame.
    pub pitch_ref_to_turret_ref: PoseConfig,
    /// `TurretRef -> Launcher`.
    pub turret_ref_to_launcher: PoseConfig,
    /// `TurretRef -> ColorCamera`.
    pub turret_ref_to_color_camera: PoseConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub http: HttpConfig,
    pub session: SessionConfig,
    pub odometry_local_offset: Duration,
    pub camera_intrinsics: CameraIntrinsics,
    pub detection: DetectionConfig,
    pub tracker: TrackerConfig,
    pub clustering: RobotClusteringConfig,
    pub beyblade: BeybladeConfig,
    pub selection: SelectionConfig,
    pub mechanical: MechanicalTransforms,
}

/// Reads each file in `paths` and merges them, leftmost taking precedence
/// over later ones, then deserializes the merged tree into [`AppConfig`].
pub fn load(paths: &[impl AsRef<Path>]) -> Result<AppConfig, AppError> {
    let mut merged = serde_yaml::Value::Null;

    for path in paths.iter().rev() {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let value: serde_yaml::Value = serde_yaml::from_str(&text).map_err(|source| AppError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;
        merge(&mut merged, value);
    }

    serde_yaml::from_value(merged).map_err(AppError::ConfigShapeMismatch)
}

fn merge(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leftmost_file_overrides_later_ones() {
        let mut base = serde_yaml::from_str("a: 1\nb: 2").unwrap();
        let overlay = serde_yaml::from_str("a: 3\nc: 4").unwrap();
        merge(&mut base, overlay);
        assert_eq!(base["a"], serde_yaml::Value::from(1));
        assert_eq!(base["b"], serde_yaml::Value::from(2));
        assert_eq!(base["c"], serde_yaml::Value::from(4));
    }
}
