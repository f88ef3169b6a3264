use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config shape mismatch after merging all config files")]
    ConfigShapeMismatch(#[source] serde_yaml::Error),

    #[error(transparent)]
    Uart(#[from] autoaim_uart::UartError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serial port open failure")]
    SerialOpen(#[source] std::io::Error),
}
