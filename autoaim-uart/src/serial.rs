//! A thin abstraction over a byte-oriented serial link, so the transceiver
//! can be driven by a real port or a fake one in tests.

use std::io::{Read, Write};

/// Anything a [`crate::transceiver::Transceiver`] can read frames from and
/// write frames to.
pub trait AbstractSerial: Read + Write + Send {}

impl<T: Read + Write + Send> AbstractSerial for T {}

#[cfg(feature = "hardware")]
pub fn open(path: &str, baud_rate: u32, timeout: std::time::Duration) -> Result<Box<dyn AbstractSerial>, crate::error::UartError> {
    let port = serialport::new(path, baud_rate).timeout(timeout).open()?;
    Ok(Box::new(port))
}
