//! Frame-tagged spatial algebra: positions, vectors, orientations, linear
//! uncertainty and the transforms between named reference frames.

mod frame;
mod linear_uncertainty;
mod measured_position;
mod odometry;
mod orientation;
mod position;
mod transform;
mod vector;

pub use frame::{
    ColorCamera, Frame, Launcher, TurretBase, TurretPitchRef, TurretRef, TurretYawRef, World,
};
pub use linear_uncertainty::LinearUncertainty;
pub use measured_position::MeasuredPosition;
pub use odometry::OdometryState;
pub use orientation::Orientation;
pub use position::Position;
pub use transform::Transform;
pub use vector::Vector;
