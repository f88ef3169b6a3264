use thiserror::Error;

#[derive(Debug, Error)]
pub enum UartError {
    #[error("duplicate message type id {0:#06x} registered with two handlers")]
    DuplicateTypeId(u16),

    #[error("failed to parse message body for type {0:#06x}")]
    UnhandledParse(u16),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "hardware")]
    #[error(transparent)]
    Serial(#[from] serialport::Error),

    #[error("perseverance budget of {0} parse errors exhausted")]
    ParseBudgetExhausted(u32),
}
