//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr, gated by the
//! configured log level.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use crate::config::LogLevel;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(Mutex<File>),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Access and info log target
    access: LogTarget,
    /// Error and warning log target
    error: LogTarget,
    level: LogLevel,
}

impl LogWriter {
    /// Create a new log writer with optional file paths
    fn new(
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
        level: LogLevel,
    ) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            access,
            error,
            level,
        })
    }

    /// Write to access log (not subject to the level gate)
    pub fn write_access(&self, message: &str) {
        write_to_target(&self.access, message);
    }

    /// Write info message (to access log target)
    pub fn write_info(&self, message: &str) {
        if self.level >= LogLevel::Info {
            write_to_target(&self.access, message);
        }
    }

    /// Write debug message (to access log target)
    pub fn write_debug(&self, message: &str) {
        if self.level >= LogLevel::Debug {
            write_to_target(&self.access, message);
        }
    }

    /// Write warning (to error log target)
    pub fn write_warning(&self, message: &str) {
        if self.level >= LogLevel::Warn {
            write_to_target(&self.error, message);
        }
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        write_to_target(&self.error, message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => {
            println!("{message}");
        }
        LogTarget::Stderr => {
            eprintln!("{message}");
        }
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
    level: LogLevel,
) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file, level)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has been called
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
