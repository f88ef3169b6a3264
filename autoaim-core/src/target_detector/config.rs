use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TeamColor {
    Red,
    Blue,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub minimum_width: u32,
    pub minimum_height: u32,
    pub depth_stddev_per_meter: f64,
    pub position_stddev_per_meter: f64,
    pub iou_threshold: f64,
}

/// Pinhole intrinsics used to deproject a pixel + depth into a camera-frame
/// position.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Deprojects a pixel at `(px, py)` with depth `depth_m` (camera-Z, in
    /// meters) into a camera-frame `(x, y, z)` triple using the axis
    /// convention `x` forward (depth), `y` left, `z` up.
    pub fn deproject(&self, px: f64, py: f64, depth_m: f64) -> (f64, f64, f64) {
        let x_cam = (px - self.cx) * depth_m / self.fx;
        let y_cam = (py - self.cy) * depth_m / self.fy;
        (depth_m, -x_cam, -y_cam)
    }
}
