//! Concrete wire message types exchanged with the MCB.

mod lifecycle;
mod odometry;
mod referee;
mod select_new_target;
mod target_update;

pub use lifecycle::{RebootMessage, ShutdownMessage};
pub use odometry::{OdometryMessage, TurretSample};
pub use referee::{
    CompetitionResult, RefereeCompetitionResultMessage, RefereeRealtimeDataMessage,
    RefereeRobotIdMessage, RefereeWarningMessage, RobotColor, RobotType,
};
pub use select_new_target::SelectNewTargetMessage;
pub use target_update::AutoAimTargetUpdateMessage;

/// Reads a little-endian value from `body` at `offset`, failing with
/// [`crate::UartError::UnhandledParse`] if the buffer is too short.
pub(crate) fn require_len(body: &[u8], len: usize, type_id: u16) -> Result<(), crate::UartError> {
    if body.len() < len {
        Err(crate::UartError::UnhandledParse(type_id))
    } else {
        Ok(())
    }
}
