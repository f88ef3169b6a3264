use crate::error::UartError;
use crate::message::InboundMessage;

use super::require_len;

const TYPE_ID: u16 = 0x0007;

/// `0x0007` — a request to force re-selection, tagged so duplicate delivery
/// can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectNewTargetMessage {
    pub request_id: u32,
}

impl InboundMessage for SelectNewTargetMessage {
    const TYPE_ID: u16 = TYPE_ID;

    fn parse(body: &[u8]) -> Result<Self, UartError> {
        require_len(body, 4, TYPE_ID)?;
        Ok(SelectNewTargetMessage {
            request_id: u32::from_le_bytes(body[0..4].try_into().unwrap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_id() {
        let message = SelectNewTargetMessage::parse(&42u32.to_le_bytes()).unwrap();
        assert_eq!(message.request_id, 42);
    }
}
