//! Logging module
//!
//! Timestamped info/access/error logging for the delivery layer. Targets are
//! resolved once at startup: stdout/stderr by default, files when configured.

use crate::config::LoggingConfig;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Mutex, OnceLock};

/// Global log writer, set once by [`init`].
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback_stderr: bool) -> io::Result<Self> {
        match path {
            Some(p) => {
                let file = OpenOptions::new().create(true).append(true).open(p)?;
                Ok(Self::File(Mutex::new(file)))
            }
            None if fallback_stderr => Ok(Self::Stderr),
            None => Ok(Self::Stdout),
        }
    }

    fn write_line(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Stderr => eprintln!("{line}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    // A failed log write has nowhere better to go.
                    let _ = writeln!(f, "{line}");
                }
            }
        }
    }
}

/// Thread-safe writer pair for access and error lines.
struct LogWriter {
    access: LogTarget,
    error: LogTarget,
}

/// Initialize the logger from configuration. Call once at startup; later
/// calls keep the first configuration.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let writer = LogWriter {
        access: LogTarget::open(config.access_log_file.as_deref(), false)?,
        error: LogTarget::open(config.error_log_file.as_deref(), true)?,
    };
    let _ = LOG_WRITER.set(writer);
    Ok(())
}

fn stamp(message: &str) -> String {
    format!("[{}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S"))
}

fn write_info(message: &str) {
    match LOG_WRITER.get() {
        Some(w) => w.access.write_line(&stamp(message)),
        None => println!("{}", stamp(message)),
    }
}

fn write_error(message: &str) {
    match LOG_WRITER.get() {
        Some(w) => w.error.write_line(&stamp(message)),
        None => eprintln!("{}", stamp(message)),
    }
}

pub fn log_server_start(addr: &SocketAddr) {
    write_info("======================================");
    write_info("Server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info("======================================");
}

pub fn log_request(method: &hyper::Method, path: &str) {
    write_info(&format!("[Request] {method} {path}"));
}

pub fn log_response(status: u16, body_bytes: u64) {
    write_info(&format!("[Response] {status} ({body_bytes} bytes)"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARNING] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}
