use crate::spatial::{Orientation, Position, TurretBase, TurretYawRef, World};
use crate::time::{Odometry, Timestamp};

/// A single sample of the MCB's reported chassis pose and turret angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdometryState {
    pub chassis_position: Position<World>,
    pub pitch: Orientation<TurretYawRef>,
    pub yaw: Orientation<TurretBase>,
    pub mcb_timestamp: Timestamp<Odometry>,
}

impl OdometryState {
    pub fn new(
        chassis_position: Position<World>,
        pitch: Orientation<TurretYawRef>,
        yaw: Orientation<TurretBase>,
        mcb_timestamp: Timestamp<Odometry>,
    ) -> Self {
        OdometryState {
            chassis_position,
            pitch,
            yaw,
            mcb_timestamp,
        }
    }
}
