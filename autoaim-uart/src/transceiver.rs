use std::collections::VecDeque;
use std::io::Write;

use autoaim_core::time::{Local, Timestamp};
use tracing::{info, warn};

use crate::crc::{crc16, crc8, CRC16_INIT, CRC8_INIT};
use crate::error::UartError;
use crate::handler::HandlerRegistry;
use crate::message::OutboundMessage;

const SYNC_BYTE: u8 = 0xA5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    WaitingForHeader,
    ReadingHeader,
    ReadingBody { len: u16, seq: u8 },
}

/// The CRC-framed receive/send state machine described for the serial link.
///
/// Bytes arrive via [`Transceiver::feed`] (or are read directly in
/// [`Transceiver::run_blocking`]) into an internal buffer; [`Transceiver::poll`]
/// advances the state machine as far as the buffered bytes allow and leaves
/// any partial frame for the next call.
pub struct Transceiver {
    buffer: VecDeque<u8>,
    state: RxState,
    header_bytes: Vec<u8>,
    header_timestamp: Option<Timestamp<Local>>,
    discards_since_last_header: u64,
    discards_since_last_warning: u64,
    discard_warning_threshold: u64,
}

impl Transceiver {
    pub fn new(discard_warning_threshold: u64) -> Self {
        Transceiver {
            buffer: VecDeque::new(),
            state: RxState::WaitingForHeader,
            header_bytes: Vec::with_capacity(5),
            header_timestamp: None,
            discards_since_last_header: 0,
            discards_since_last_warning: 0,
            discard_warning_threshold,
        }
    }

    /// Appends bytes received from the link to the internal buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes.iter().copied());
    }

    /// Advances the state machine over whatever is currently buffered,
    /// dispatching complete frames to `registry`. `now` timestamps any
    /// header recognized during this call. Returns the number of frames
    /// successfully handled. Stops and propagates immediately if a handler
    /// fails to parse its body.
    pub fn poll(&mut self, now: Timestamp<Local>, registry: &mut HandlerRegistry) -> Result<usize, UartError> {
        let mut handled = 0;
        loop {
            match self.step(now, registry)? {
                StepOutcome::FrameHandled => handled += 1,
                StepOutcome::Progressed => {}
                StepOutcome::NeedMoreBytes => break,
            }
        }
        Ok(handled)
    }

    /// Reads from `source` and processes frames until it returns `Ok(0)`
    /// (EOF) or an error. Intended for a real blocking serial port.
    pub fn run_blocking<S: std::io::Read>(
        &mut self,
        source: &mut S,
        mut clock: impl FnMut() -> Timestamp<Local>,
        registry: &mut HandlerRegistry,
    ) -> Result<(), UartError> {
        let mut chunk = [0u8; 256];
        loop {
            let n = source.read(&mut chunk)?;
            if n == 0 {
                return Ok(());
            }
            self.feed(&chunk[..n]);
            self.poll(clock(), registry)?;
        }
    }

    fn step(&mut self, now: Timestamp<Local>, registry: &mut HandlerRegistry) -> Result<StepOutcome, UartError> {
        match self.state {
            RxState::WaitingForHeader => {
                let Some(byte) = self.buffer.pop_front() else {
                    return Ok(StepOutcome::NeedMoreBytes);
                };
                if byte == SYNC_BYTE {
                    if self.discards_since_last_header > 0 {
                        info!(
                            discarded = self.discards_since_last_header,
                            "resynchronized after discarding unrecognized bytes"
                        );
                    }
                    self.discards_since_last_header = 0;
                    self.header_timestamp = Some(now);
                    self.header_bytes.clear();
                    self.header_bytes.push(SYNC_BYTE);
                    self.state = RxState::ReadingHeader;
                    Ok(StepOutcome::Progressed)
                } else {
                    self.discards_since_last_header += 1;
                    self.discards_since_last_warning += 1;
                    if self.discards_since_last_warning > self.discard_warning_threshold {
                        warn!(
                            discarded = self.discards_since_last_header,
                            "discarding unrecognized bytes while waiting for sync"
                        );
                        self.discards_since_last_warning = 0;
                    }
                    Ok(StepOutcome::Progressed)
                }
            }

            RxState::ReadingHeader => {
                if self.buffer.len() < 4 {
                    return Ok(StepOutcome::NeedMoreBytes);
                }
                let len_lo = self.buffer.pop_front().unwrap();
                let len_hi = self.buffer.pop_front().unwrap();
                let seq = self.buffer.pop_front().unwrap();
                let received_crc8 = self.buffer.pop_front().unwrap();

                self.header_bytes.push(len_lo);
                self.header_bytes.push(len_hi);
                self.header_bytes.push(seq);

                let computed = crc8(&self.header_bytes, CRC8_INIT);
                if computed != received_crc8 {
                    warn!(computed, received = received_crc8, "header CRC-8 mismatch, discarding frame");
                    self.state = RxState::WaitingForHeader;
                    return Ok(StepOutcome::Progressed);
                }

                self.header_bytes.push(received_crc8);
                let len = u16::from_le_bytes([len_lo, len_hi]);
                self.state = RxState::ReadingBody { len, seq };
                Ok(StepOutcome::Progressed)
            }

            RxState::ReadingBody { len, seq: _ } => {
                let needed = 2 + len as usize + 2;
                if self.buffer.len() < needed {
                    return Ok(StepOutcome::NeedMoreBytes);
                }

                let frame: Vec<u8> = self.buffer.drain(..needed).collect();
                let type_id = u16::from_le_bytes([frame[0], frame[1]]);
                let body = &frame[2..2 + len as usize];
                let received_crc16 =
                    u16::from_le_bytes([frame[2 + len as usize], frame[3 + len as usize]]);

                let mut crc_input = self.header_bytes.clone();
                crc_input.extend_from_slice(&frame[..2 + len as usize]);
                let computed = crc16(&crc_input, CRC16_INIT);

                self.state = RxState::WaitingForHeader;

                if computed != received_crc16 {
                    warn!(computed, received = received_crc16, "body CRC-16 mismatch, discarding frame");
                    return Ok(StepOutcome::Progressed);
                }

                let Some(handler) = registry.get_mut(type_id) else {
                    warn!(type_id, "no handler registered for message type, dropping frame");
                    return Ok(StepOutcome::Progressed);
                };

                let timestamp = self.header_timestamp.unwrap_or(now);
                handler.handle(body, timestamp)?;
                Ok(StepOutcome::FrameHandled)
            }
        }
    }
}

enum StepOutcome {
    FrameHandled,
    Progressed,
    NeedMoreBytes,
}

/// Serializes `message` as a complete frame and writes it to `writer`.
pub fn send<W: Write, M: OutboundMessage>(writer: &mut W, seq: u8, message: &M) -> Result<(), UartError> {
    let body = message.serialize_body();
    let len = body.len() as u16;
    let len_bytes = len.to_le_bytes();

    let mut header = vec![SYNC_BYTE, len_bytes[0], len_bytes[1], seq];
    let header_crc8 = crc8(&header, CRC8_INIT);
    header.push(header_crc8);

    let type_bytes = M::TYPE_ID.to_le_bytes();

    let mut crc_input = header.clone();
    crc_input.extend_from_slice(&type_bytes);
    crc_input.extend_from_slice(&body);
    let crc16_value = crc16(&crc_input, CRC16_INIT);

    writer.write_all(&header)?;
    writer.write_all(&type_bytes)?;
    writer.write_all(&body)?;
    writer.write_all(&crc16_value.to_le_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::TypedHandler;
    use crate::message::InboundMessage;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, PartialEq, Eq)]
    struct Ping(u8);

    impl InboundMessage for Ping {
        const TYPE_ID: u16 = 0x0042;

        fn parse(body: &[u8]) -> Result<Self, UartError> {
            body.first().copied().map(Ping).ok_or(UartError::UnhandledParse(0x0042))
        }
    }

    fn frame_bytes(type_id: u16, body: &[u8], seq: u8) -> Vec<u8> {
        let len = body.len() as u16;
        let len_bytes = len.to_le_bytes();
        let mut header = vec![SYNC_BYTE, len_bytes[0], len_bytes[1], seq];
        header.push(crc8(&header, CRC8_INIT));
        let type_bytes = type_id.to_le_bytes();
        let mut crc_input = header.clone();
        crc_input.extend_from_slice(&type_bytes);
        crc_input.extend_from_slice(body);
        let crc16_value = crc16(&crc_input, CRC16_INIT);
        let mut frame = header;
        frame.extend_from_slice(&type_bytes);
        frame.extend_from_slice(body);
        frame.extend_from_slice(&crc16_value.to_le_bytes());
        frame
    }

    #[test]
    fn round_trips_a_well_formed_frame() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        let handler = TypedHandler::new(move |message: Ping, _t| received_clone.lock().unwrap().push(message));
        let mut registry = HandlerRegistry::new(vec![Box::new(handler)]).unwrap();

        let mut transceiver = Transceiver::new(8);
        transceiver.feed(&frame_bytes(0x0042, &[7], 1));
        let handled = transceiver.poll(Timestamp::from_micros(0), &mut registry).unwrap();

        assert_eq!(handled, 1);
        assert_eq!(*received.lock().unwrap(), vec![Ping(7)]);
    }

    #[test]
    fn ignores_junk_bytes_before_sync() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        let handler = TypedHandler::new(move |message: Ping, _t| received_clone.lock().unwrap().push(message));
        let mut registry = HandlerRegistry::new(vec![Box::new(handler)]).unwrap();

        let mut transceiver = Transceiver::new(8);
        let mut bytes = vec![0x00, 0xFF, 0x01];
        bytes.extend_from_slice(&frame_bytes(0x0042, &[9], 2));
        transceiver.feed(&bytes);
        let handled = transceiver.poll(Timestamp::from_micros(0), &mut registry).unwrap();

        assert_eq!(handled, 1);
        assert_eq!(*received.lock().unwrap(), vec![Ping(9)]);
    }

    #[test]
    fn detects_body_crc_mismatch_and_resyncs() {
        let handler = TypedHandler::new(|_message: Ping, _t| {});
        let mut registry = HandlerRegistry::new(vec![Box::new(handler)]).unwrap();

        let mut transceiver = Transceiver::new(8);
        let mut frame = frame_bytes(0x0042, &[9], 2);
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        transceiver.feed(&frame);
        let handled = transceiver.poll(Timestamp::from_micros(0), &mut registry).unwrap();

        assert_eq!(handled, 0);
    }

    #[test]
    fn partial_frame_waits_for_more_bytes() {
        let handler = TypedHandler::new(|_message: Ping, _t| {});
        let mut registry = HandlerRegistry::new(vec![Box::new(handler)]).unwrap();

        let mut transceiver = Transceiver::new(8);
        let frame = frame_bytes(0x0042, &[9], 2);
        transceiver.feed(&frame[..frame.len() - 1]);
        let handled = transceiver.poll(Timestamp::from_micros(0), &mut registry).unwrap();
        assert_eq!(handled, 0);

        transceiver.feed(&frame[frame.len() - 1..]);
        let handled = transceiver.poll(Timestamp::from_micros(0), &mut registry).unwrap();
        assert_eq!(handled, 1);
    }

    #[test]
    fn send_produces_a_frame_poll_accepts() {
        use crate::message::OutboundMessage;

        struct Pong;
        impl OutboundMessage for Pong {
            const TYPE_ID: u16 = 0x0042;
            fn serialize_body(&self) -> Vec<u8> {
                vec![5]
            }
        }

        let mut buf = Vec::new();
        send(&mut buf, 3, &Pong).unwrap();

        let handler = TypedHandler::new(|_message: Ping, _t| {});
        let mut registry = HandlerRegistry::new(vec![Box::new(handler)]).unwrap();
        let mut transceiver = Transceiver::new(8);
        transceiver.feed(&buf);
        let handled = transceiver.poll(Timestamp::from_micros(0), &mut registry).unwrap();
        assert_eq!(handled, 1);
    }
}
