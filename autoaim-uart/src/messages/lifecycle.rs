use crate::error::UartError;
use crate::message::InboundMessage;

/// `0x0008` — empty body. Triggers a reboot on supported hardware only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebootMessage;

impl InboundMessage for RebootMessage {
    const TYPE_ID: u16 = 0x0008;

    fn parse(_body: &[u8]) -> Result<Self, UartError> {
        Ok(RebootMessage)
    }
}

/// `0x0009` — empty body. Triggers a shutdown on supported hardware only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownMessage;

impl InboundMessage for ShutdownMessage {
    const TYPE_ID: u16 = 0x0009;

    fn parse(_body: &[u8]) -> Result<Self, UartError> {
        Ok(ShutdownMessage)
    }
}
