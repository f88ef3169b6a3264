use tracing::error;

use crate::error::UartError;
use crate::message::InboundMessage;

use super::require_len;

/// Team color derived from a referee-reported robot id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotColor {
    Red,
    Blue,
}

/// Robot chassis type, decoded from `id % 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotType {
    Hero = 1,
    Engineer = 2,
    Std3 = 3,
    Std4 = 4,
    Std5 = 5,
    Aerial = 6,
    Sentry = 7,
    Dart = 8,
    Radar = 9,
}

impl RobotType {
    fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            1 => RobotType::Hero,
            2 => RobotType::Engineer,
            3 => RobotType::Std3,
            4 => RobotType::Std4,
            5 => RobotType::Std5,
            6 => RobotType::Aerial,
            7 => RobotType::Sentry,
            8 => RobotType::Dart,
            9 => RobotType::Radar,
            _ => return None,
        })
    }
}

const ROBOT_ID_TYPE_ID: u16 = 0x0006;

/// `0x0006` — identifies this module's own robot color and chassis type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefereeRobotIdMessage {
    pub color: RobotColor,
    pub robot_type: RobotType,
}

impl InboundMessage for RefereeRobotIdMessage {
    const TYPE_ID: u16 = ROBOT_ID_TYPE_ID;

    fn parse(body: &[u8]) -> Result<Self, UartError> {
        require_len(body, 1, ROBOT_ID_TYPE_ID)?;
        let id = body[0];
        let color = match id {
            0..=99 => RobotColor::Red,
            100..=199 => RobotColor::Blue,
            _ => {
                error!(id, "referee robot id out of the 0..200 range, ignoring");
                return Err(UartError::UnhandledParse(ROBOT_ID_TYPE_ID));
            }
        };
        let robot_type = RobotType::from_index(id % 100).ok_or_else(|| {
            error!(id, "referee robot id has an unrecognized chassis type, ignoring");
            UartError::UnhandledParse(ROBOT_ID_TYPE_ID)
        })?;
        Ok(RefereeRobotIdMessage { color, robot_type })
    }
}

const REALTIME_TYPE_ID: u16 = 0x0003;

/// `0x0003` — per-tick competition phase, clock and power-rail state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefereeRealtimeDataMessage {
    pub competition_type: u8,
    pub competition_stage: u8,
    pub remaining_time_s: u16,
    pub unix_time: u64,
    pub gimbal_powered: bool,
    pub chassis_powered: bool,
    pub shooter_powered: bool,
}

impl InboundMessage for RefereeRealtimeDataMessage {
    const TYPE_ID: u16 = REALTIME_TYPE_ID;

    fn parse(body: &[u8]) -> Result<Self, UartError> {
        require_len(body, 1 + 2 + 8 + 1, REALTIME_TYPE_ID)?;
        let type_and_stage = body[0];
        let remaining_time_s = u16::from_le_bytes([body[1], body[2]]);
        let unix_time = u64::from_le_bytes(body[3..11].try_into().unwrap());
        let flags = body[11];
        Ok(RefereeRealtimeDataMessage {
            competition_type: (type_and_stage >> 4) & 0x0F,
            competition_stage: type_and_stage & 0x0F,
            remaining_time_s,
            unix_time,
            gimbal_powered: flags & 0b001 != 0,
            chassis_powered: flags & 0b010 != 0,
            shooter_powered: flags & 0b100 != 0,
        })
    }
}

const COMPETITION_RESULT_TYPE_ID: u16 = 0x0004;

/// Outcome reported at the end of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionResult {
    Draw,
    RedWins,
    BlueWins,
    Unknown(u8),
}

/// `0x0004` — end-of-match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefereeCompetitionResultMessage {
    pub result: CompetitionResult,
}

impl InboundMessage for RefereeCompetitionResultMessage {
    const TYPE_ID: u16 = COMPETITION_RESULT_TYPE_ID;

    fn parse(body: &[u8]) -> Result<Self, UartError> {
        require_len(body, 1, COMPETITION_RESULT_TYPE_ID)?;
        let result = match body[0] {
            0 => CompetitionResult::Draw,
            1 => CompetitionResult::RedWins,
            2 => CompetitionResult::BlueWins,
            other => CompetitionResult::Unknown(other),
        };
        Ok(RefereeCompetitionResultMessage { result })
    }
}

const WARNING_TYPE_ID: u16 = 0x0005;

/// `0x0005` — a foul called against a specific robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefereeWarningMessage {
    pub level: u8,
    pub foul_robot_id: u8,
}

impl InboundMessage for RefereeWarningMessage {
    const TYPE_ID: u16 = WARNING_TYPE_ID;

    fn parse(body: &[u8]) -> Result<Self, UartError> {
        require_len(body, 2, WARNING_TYPE_ID)?;
        Ok(RefereeWarningMessage {
            level: body[0],
            foul_robot_id: body[1],
        })
    }
}
