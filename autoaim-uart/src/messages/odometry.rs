use autoaim_core::spatial::{OdometryState, Orientation, Position, TurretBase, TurretYawRef, World};
use autoaim_core::time::{Odometry, Timestamp};

use crate::error::UartError;
use crate::message::InboundMessage;

use super::require_len;

const TYPE_ID: u16 = 0x0001;

/// One turret's reported angles, timestamped independently of the chassis
/// sample they arrived with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurretSample {
    pub mcb_timestamp: Timestamp<Odometry>,
    pub pitch_deg: f32,
    pub yaw_deg: f32,
}

/// A chassis pose sample together with one or more turret angle samples.
/// Only the first turret is used to derive an [`OdometryState`]; any others
/// are carried for completeness.
#[derive(Debug, Clone, PartialEq)]
pub struct OdometryMessage {
    pub mcb_timestamp: Timestamp<Odometry>,
    pub chassis_position: Position<World>,
    pub chassis_orientation: Orientation<World>,
    pub turrets: Vec<TurretSample>,
}

impl OdometryMessage {
    /// The `OdometryState` derived from the chassis pose and the first
    /// turret sample, if one was reported.
    pub fn odometry_state(&self) -> Option<OdometryState> {
        let first = self.turrets.first()?;
        let pitch = Orientation::<TurretYawRef>::from_euler_angles(0.0, first.pitch_deg.to_radians() as f64, 0.0);
        let yaw = Orientation::<TurretBase>::from_euler_angles(0.0, 0.0, first.yaw_deg.to_radians() as f64);
        Some(OdometryState::new(
            self.chassis_position,
            pitch,
            yaw,
            self.mcb_timestamp,
        ))
    }
}

fn read_f32(body: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([body[offset], body[offset + 1], body[offset + 2], body[offset + 3]])
}

fn read_u32(body: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([body[offset], body[offset + 1], body[offset + 2], body[offset + 3]])
}

impl InboundMessage for OdometryMessage {
    const TYPE_ID: u16 = TYPE_ID;

    fn parse(body: &[u8]) -> Result<Self, UartError> {
        require_len(body, 4 + 12 + 12 + 1, TYPE_ID)?;

        let mcb_timestamp = Timestamp::from_micros(read_u32(body, 0) as i64);
        let x = read_f32(body, 4) as f64;
        let y = read_f32(body, 8) as f64;
        let z = read_f32(body, 12) as f64;
        let roll = read_f32(body, 16).to_radians() as f64;
        let pitch = read_f32(body, 20).to_radians() as f64;
        let yaw = read_f32(body, 24).to_radians() as f64;
        let num_turrets = body[28] as usize;

        require_len(body, 29 + num_turrets * 12, TYPE_ID)?;

        let mut turrets = Vec::with_capacity(num_turrets);
        for i in 0..num_turrets {
            let base = 29 + i * 12;
            turrets.push(TurretSample {
                mcb_timestamp: Timestamp::from_micros(read_u32(body, base) as i64),
                pitch_deg: read_f32(body, base + 4),
                yaw_deg: read_f32(body, base + 8),
            });
        }

        Ok(OdometryMessage {
            mcb_timestamp,
            chassis_position: Position::new(x, y, z),
            chassis_orientation: Orientation::from_euler_angles(roll, pitch, yaw),
            turrets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&1_000u32.to_le_bytes());
        body.extend_from_slice(&1.0f32.to_le_bytes());
        body.extend_from_slice(&2.0f32.to_le_bytes());
        body.extend_from_slice(&3.0f32.to_le_bytes());
        body.extend_from_slice(&0.0f32.to_le_bytes());
        body.extend_from_slice(&0.0f32.to_le_bytes());
        body.extend_from_slice(&0.0f32.to_le_bytes());
        body.push(1);
        body.extend_from_slice(&2_000u32.to_le_bytes());
        body.extend_from_slice(&15.0f32.to_le_bytes());
        body.extend_from_slice(&30.0f32.to_le_bytes());
        body
    }

    #[test]
    fn parses_chassis_and_turret_fields() {
        let message = OdometryMessage::parse(&sample_body()).unwrap();
        assert_eq!(message.chassis_position.x(), 1.0);
        assert_eq!(message.turrets.len(), 1);
        assert_eq!(message.turrets[0].pitch_deg, 15.0);
        assert!(message.odometry_state().is_some());
    }

    #[test]
    fn rejects_truncated_body() {
        let body = sample_body();
        assert!(OdometryMessage::parse(&body[..10]).is_err());
    }

    #[test]
    fn no_turrets_yields_no_odometry_state() {
        let mut body = sample_body();
        body[28] = 0;
        body.truncate(29);
        let message = OdometryMessage::parse(&body).unwrap();
        assert!(message.odometry_state().is_none());
    }
}
