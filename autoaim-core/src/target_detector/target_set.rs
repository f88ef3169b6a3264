use crate::spatial::{ColorCamera, LinearUncertainty, MeasuredPosition, Position, Transform, World};
use crate::time::{Local, Odometry, Timestamp};

use super::config::{CameraIntrinsics, DetectionConfig};
use super::target::{DetectedTargetPosition, DetectedTargetRegion, IntRectangle};

/// Fraction of invalid (zero or NaN) depth samples in a region above which
/// the region is dropped rather than projected.
const MAX_INVALID_DEPTH_PERCENTAGE: f64 = 0.7;

/// A minimal depth-image view: row-major samples in meters, `0.0`/`NaN`
/// meaning "no return".
pub struct DepthImage<'a> {
    pub width: u32,
    pub height: u32,
    pub samples: &'a [f32],
}

impl<'a> DepthImage<'a> {
    fn get(&self, x: u32, y: u32) -> f32 {
        self.samples[(y * self.width + x) as usize]
    }

    /// Median depth over `rect`, ignoring invalid samples; `None` if the
    /// invalid fraction exceeds [`MAX_INVALID_DEPTH_PERCENTAGE`].
    fn median_depth(&self, rect: &IntRectangle) -> Option<f64> {
        let mut valid: Vec<f32> = Vec::new();
        let mut total = 0usize;
        for y in rect.y..(rect.y + rect.height).min(self.height) {
            for x in rect.x..(rect.x + rect.width).min(self.width) {
                total += 1;
                let d = self.get(x, y);
                if d != 0.0 && !d.is_nan() {
                    valid.push(d);
                }
            }
        }
        if total == 0 {
            return None;
        }
        let invalid_fraction = 1.0 - (valid.len() as f64 / total as f64);
        if invalid_fraction > MAX_INVALID_DEPTH_PERCENTAGE {
            return None;
        }
        valid.sort_by(|a, b| a.partial_cmp(b).expect("depth samples are not NaN"));
        let mid = valid.len() / 2;
        Some(if valid.len() % 2 == 0 {
            ((valid[mid - 1] + valid[mid]) / 2.0) as f64
        } else {
            valid[mid] as f64
        })
    }
}

fn uncertainty_for_target(
    position: &Position<ColorCamera>,
    config: &DetectionConfig,
) -> LinearUncertainty<ColorCamera> {
    let distance = Position::distance(position, &Position::of_origin());
    let depth_var = (config.depth_stddev_per_meter * distance).powi(2);
    let lateral_var = (config.position_stddev_per_meter * distance).powi(2);
    LinearUncertainty::from_variances(depth_var, lateral_var, lateral_var)
}

/// Raw detector output for one frame.
pub struct ImageDetectedTargetSet {
    pub regions: Vec<DetectedTargetRegion>,
}

impl ImageDetectedTargetSet {
    pub fn non_max_suppressed(&self, iou_threshold: f64) -> ImageDetectedTargetSet {
        ImageDetectedTargetSet {
            regions: super::non_max_suppression::non_max_suppressed(&self.regions, iou_threshold),
        }
    }
}

/// Detections projected into the camera frame via median depth.
pub struct CameraRelativeDetectedTargetSet {
    pub targets: Vec<DetectedTargetPosition<ColorCamera>>,
    pub local_timestamp: Timestamp<Local>,
}

impl CameraRelativeDetectedTargetSet {
    pub fn from_detected_rectangles(
        regions: &[DetectedTargetRegion],
        depth: &DepthImage<'_>,
        intrinsics: &CameraIntrinsics,
        config: &DetectionConfig,
        local_timestamp: Timestamp<Local>,
    ) -> Self {
        let mut targets = Vec::new();
        for region in regions {
            let Some(depth_m) = depth.median_depth(&region.rect) else {
                continue;
            };
            let (px, py) = region.rect.center();
            let (x, y, z) = intrinsics.deproject(px, py, depth_m);
            let position = Position::new(x, y, z);
            let uncertainty = uncertainty_for_target(&position, config);
            targets.push(DetectedTargetPosition {
                confidence: region.confidence,
                color: region.color,
                measured: MeasuredPosition::new(position, uncertainty),
            });
        }
        CameraRelativeDetectedTargetSet {
            targets,
            local_timestamp,
        }
    }
}

/// Detections transformed into the world frame, paired with the MCB
/// timestamp of the odometry used for that transform.
pub struct WorldDetectedTargetSet {
    pub targets: Vec<DetectedTargetPosition<World>>,
    pub local_timestamp: Timestamp<Local>,
    pub mcb_timestamp: Timestamp<Odometry>,
}

impl WorldDetectedTargetSet {
    pub fn from_camera_relative(
        camera_relative: &CameraRelativeDetectedTargetSet,
        transform: &Transform<ColorCamera, World>,
        mcb_timestamp: Timestamp<Odometry>,
    ) -> Self {
        let targets = camera_relative
            .targets
            .iter()
            .map(|t| DetectedTargetPosition {
                confidence: t.confidence,
                color: t.color,
                measured: transform.apply_to_measured_position(t.measured),
            })
            .collect();
        WorldDetectedTargetSet {
            targets,
            local_timestamp: camera_relative.local_timestamp,
            mcb_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target_detector::TeamColor;

    fn intrinsics() -> CameraIntrinsics {
        CameraIntrinsics {
            fx: 500.0,
            fy: 500.0,
            cx: 320.0,
            cy: 240.0,
        }
    }

    fn config() -> DetectionConfig {
        DetectionConfig {
            minimum_width: 5,
            minimum_height: 5,
            depth_stddev_per_meter: 0.01,
            position_stddev_per_meter: 0.02,
            iou_threshold: 0.3,
        }
    }

    #[test]
    fn drops_region_with_mostly_invalid_depth() {
        let samples = vec![0.0f32; 100];
        let depth = DepthImage {
            width: 10,
            height: 10,
            samples: &samples,
        };
        let region = DetectedTargetRegion {
            confidence: 0.9,
            color: TeamColor::Blue,
            rect: IntRectangle {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
        };
        let set = CameraRelativeDetectedTargetSet::from_detected_rectangles(
            &[region],
            &depth,
            &intrinsics(),
            &config(),
            Timestamp::from_micros(0),
        );
        assert!(set.targets.is_empty());
    }

    #[test]
    fn projects_region_with_valid_depth() {
        let samples = vec![2.0f32; 100];
        let depth = DepthImage {
            width: 10,
            height: 10,
            samples: &samples,
        };
        let region = DetectedTargetRegion {
            confidence: 0.9,
            color: TeamColor::Blue,
            rect: IntRectangle {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
        };
        let set = CameraRelativeDetectedTargetSet::from_detected_rectangles(
            &[region],
            &depth,
            &intrinsics(),
            &config(),
            Timestamp::from_micros(0),
        );
        assert_eq!(set.targets.len(), 1);
        assert_eq!(set.targets[0].measured.position.x(), 2.0);
    }
}
