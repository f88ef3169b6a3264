//! CRC-framed serial transceiver and message codecs for MCB communication.

pub mod crc;
pub mod error;
pub mod handler;
pub mod message;
pub mod messages;
pub mod perseverance;
pub mod serial;
pub mod transceiver;

pub use error::UartError;
pub use perseverance::PerseveringReceiver;
pub use transceiver::Transceiver;
