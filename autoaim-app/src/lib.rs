//! Configuration, logging, CLI, synchronized host state, the debug HTTP
//! surface and main-loop orchestration for the auto-aim process.

pub mod cli;
pub mod config;
pub mod error;
pub mod host_state;
pub mod http_debug;
pub mod logging;
pub mod main_loop;
pub mod telemetry;

pub use error::AppError;
