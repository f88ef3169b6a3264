//! The message traits every wire type implements.

use crate::error::UartError;

/// A message received from the MCB.
pub trait InboundMessage: Sized {
    const TYPE_ID: u16;

    fn parse(body: &[u8]) -> Result<Self, UartError>;
}

/// A message sent to the MCB.
pub trait OutboundMessage {
    const TYPE_ID: u16;

    fn serialize_body(&self) -> Vec<u8>;
}
