use autoaim_core::time::{Local, Timestamp};
use tracing::warn;

use crate::error::UartError;
use crate::handler::HandlerRegistry;
use crate::transceiver::Transceiver;

/// Wraps a [`Transceiver`], tolerating up to `max_num_parse_errors` body
/// parse failures before treating the link as unrecoverable. Any other
/// error is propagated immediately.
pub struct PerseveringReceiver {
    transceiver: Transceiver,
    max_num_parse_errors: u32,
    parse_error_count: u32,
}

impl PerseveringReceiver {
    pub fn new(transceiver: Transceiver, max_num_parse_errors: u32) -> Self {
        PerseveringReceiver {
            transceiver,
            max_num_parse_errors,
            parse_error_count: 0,
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.transceiver.feed(bytes);
    }

    /// Polls the wrapped transceiver, absorbing parse errors up to the
    /// configured budget.
    pub fn poll(&mut self, now: Timestamp<Local>, registry: &mut HandlerRegistry) -> Result<usize, UartError> {
        match self.transceiver.poll(now, registry) {
            Ok(handled) => Ok(handled),
            Err(UartError::UnhandledParse(type_id)) => {
                self.parse_error_count += 1;
                if self.parse_error_count > self.max_num_parse_errors {
                    Err(UartError::ParseBudgetExhausted(self.max_num_parse_errors))
                } else {
                    warn!(
                        type_id,
                        count = self.parse_error_count,
                        budget = self.max_num_parse_errors,
                        "tolerating message parse failure"
                    );
                    Ok(0)
                }
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::TypedHandler;
    use crate::message::InboundMessage;

    struct AlwaysFails;
    impl InboundMessage for AlwaysFails {
        const TYPE_ID: u16 = 0x00AA;
        fn parse(_body: &[u8]) -> Result<Self, UartError> {
            Err(UartError::UnhandledParse(0x00AA))
        }
    }

    fn frame_with_crc(body: &[u8]) -> Vec<u8> {
        use crate::crc::{crc16, crc8, CRC16_INIT, CRC8_INIT};
        let len = body.len() as u16;
        let len_bytes = len.to_le_bytes();
        let mut header = vec![0xA5u8, len_bytes[0], len_bytes[1], 0];
        header.push(crc8(&header, CRC8_INIT));
        let type_bytes = 0x00AAu16.to_le_bytes();
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
    fn tolerates_parse_errors_up_to_budget_then_raises_fatally() {
        let handler = TypedHandler::new(|_m: AlwaysFails, _t| {});
        let mut registry = HandlerRegistry::new(vec![Box::new(handler)]).unwrap();
        let mut receiver = PerseveringReceiver::new(Transceiver::new(8), 2);

        for _ in 0..2 {
            receiver.feed(&frame_with_crc(&[1]));
            assert!(receiver.poll(Timestamp::from_micros(0), &mut registry).is_ok());
        }

        receiver.feed(&frame_with_crc(&[1]));
        let result = receiver.poll(Timestamp::from_micros(0), &mut registry);
        assert!(matches!(result, Err(UartError::ParseBudgetExhausted(2))));
    }
}
