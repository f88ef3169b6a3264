//! Tracing subscriber setup: stdout (unless silenced) plus a session log
//! file that is always written, uptime-stamped.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;

use tracing_subscriber::fmt::time::Uptime;
use tracing_subscriber::EnvFilter;

struct SessionWriter {
    file: Mutex<File>,
    echo_to_stdout: bool,
}

impl Write for &SessionWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.echo_to_stdout {
            io::stdout().write_all(buf)?;
        }
        self.file.lock().unwrap().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.echo_to_stdout {
            io::stdout().flush()?;
        }
        self.file.lock().unwrap().flush()
    }
}

/// Initializes the global tracing subscriber. `level` is one of
/// `FATAL|ERROR|WARNING|INFO|DEBUG`; `silent` suppresses the stdout echo
/// but never the session log file.
pub fn init(level: &str, silent: bool, session_log_path: &std::path::Path) -> std::io::Result<()> {
    let filter = EnvFilter::try_new(translate_level(level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let writer: &'static SessionWriter = Box::leak(Box::new(SessionWriter {
        file: Mutex::new(File::create(session_log_path)?),
        echo_to_stdout: !silent,
    }));

    tracing_subscriber::fmt()
        .with_timer(Uptime::default())
        .with_env_filter(filter)
        .with_writer(move || writer)
        .init();

    Ok(())
}

fn translate_level(level: &str) -> &'static str {
    match level.to_ascii_uppercase().as_str() {
        "FATAL" | "ERROR" => "error",
        "WARNING" => "warn",
        "INFO" => "info",
        "DEBUG" => "debug",
        _ => "info",
    }
}
