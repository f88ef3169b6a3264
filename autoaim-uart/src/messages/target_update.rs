use autoaim_core::spatial::{Position, Vector, World};
use autoaim_core::time::{Odometry, Timestamp};

use crate::message::OutboundMessage;

/// `0x0002` — the current aim solution, addressed to an odometry timestamp
/// so the MCB can reconcile it against its own clock. When no target is
/// selected, all spatial fields are zero and `has_target` is false.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoAimTargetUpdateMessage {
    pub target: Option<(Position<World>, Vector<World>, Vector<World>)>,
    pub mcb_timestamp: Timestamp<Odometry>,
}

impl AutoAimTargetUpdateMessage {
    pub fn with_target(
        position: Position<World>,
        velocity: Vector<World>,
        acceleration: Vector<World>,
        mcb_timestamp: Timestamp<Odometry>,
    ) -> Self {
        AutoAimTargetUpdateMessage {
            target: Some((position, velocity, acceleration)),
            mcb_timestamp,
        }
    }

    pub fn no_target(mcb_timestamp: Timestamp<Odometry>) -> Self {
        AutoAimTargetUpdateMessage {
            target: None,
            mcb_timestamp,
        }
    }
}

impl OutboundMessage for AutoAimTargetUpdateMessage {
    const TYPE_ID: u16 = 0x0002;

    fn serialize_body(&self) -> Vec<u8> {
        let (position, velocity, acceleration) = self.target.unwrap_or((
            Position::of_origin(),
            Vector::zero(),
            Vector::zero(),
        ));

        let mut body = Vec::with_capacity(4 * 9 + 1 + 4);
        for component in [position.x(), position.y(), position.z()] {
            body.extend_from_slice(&(component as f32).to_le_bytes());
        }
        for component in [velocity.x(), velocity.y(), velocity.z()] {
            body.extend_from_slice(&(component as f32).to_le_bytes());
        }
        for component in [acceleration.x(), acceleration.y(), acceleration.z()] {
            body.extend_from_slice(&(component as f32).to_le_bytes());
        }
        body.push(self.target.is_some() as u8);
        body.extend_from_slice(&(self.mcb_timestamp.micros() as u32).to_le_bytes());
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_target_is_all_zero_with_flag_cleared() {
        let message = AutoAimTargetUpdateMessage::no_target(Timestamp::from_micros(123));
        let body = message.serialize_body();
        assert_eq!(body.len(), 4 * 9 + 1 + 4);
        assert!(body[..36].iter().all(|&b| b == 0));
        assert_eq!(body[36], 0);
    }

    #[test]
    fn with_target_serializes_components_and_sets_flag() {
        let message = AutoAimTargetUpdateMessage::with_target(
            Position::new(1.0, 2.0, 3.0),
            Vector::zero(),
            Vector::zero(),
            Timestamp::from_micros(99),
        );
        let body = message.serialize_body();
        assert_eq!(f32::from_le_bytes(body[0..4].try_into().unwrap()), 1.0);
        assert_eq!(body[36], 1);
        assert_eq!(u32::from_le_bytes(body[37..41].try_into().unwrap()), 99);
    }
}
