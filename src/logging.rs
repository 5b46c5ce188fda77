//! Logging configuration module
//!
//! Redis-compatible log output through the `log` facade:
//! - Log levels (debug, verbose, notice, warning, nothing)
//! - `pid:level-char timestamp message` lines
//! - Optional append-only log file, stderr otherwise

use crate::config::EngineConfig;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::SystemTime;

/// Redis-style log levels mapped to Rust log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedisLogLevel {
    Debug,
    Verbose,
    Notice,
    Warning,
    Nothing,
}

impl RedisLogLevel {
    /// Parse Redis-style log level string, defaulting to notice
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "debug" => Self::Debug,
            "verbose" => Self::Verbose,
            "notice" => Self::Notice,
            "warning" => Self::Warning,
            "nothing" => Self::Nothing,
            _ => Self::Notice,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::Trace,
            Self::Verbose => LevelFilter::Debug,
            Self::Notice => LevelFilter::Info,
            Self::Warning => LevelFilter::Warn,
            Self::Nothing => LevelFilter::Off,
        }
    }
}

/// Logger writing Redis-formatted lines to a file or stderr
pub struct MemoraLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl MemoraLogger {
    pub fn new(config: &EngineConfig) -> Self {
        let level = RedisLogLevel::parse(&config.loglevel).to_level_filter();

        let file = if config.logfile.is_empty() {
            None
        } else {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.logfile)
            {
                Ok(f) => Some(Mutex::new(f)),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to open log file '{}': {}",
                        config.logfile, e
                    );
                    None
                }
            }
        };

        Self { level, file }
    }

    fn format_record(&self, record: &Record) -> String {
        let level_char = match record.level() {
            log::Level::Error => '!',
            log::Level::Warn => '#',
            log::Level::Info => '*',
            log::Level::Debug => '-',
            log::Level::Trace => '.',
        };

        format!(
            "{}:{} {} {}\n",
            std::process::id(),
            level_char,
            timestamp(),
            record.args()
        )
    }
}

impl Log for MemoraLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let formatted = self.format_record(record);
        match &self.file {
            Some(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = f.write_all(formatted.as_bytes());
                }
            }
            None => eprint!("{}", formatted),
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Seconds and milliseconds since the epoch
fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}

/// Install `MemoraLogger` as the global logger
pub fn init_logging(config: &EngineConfig) -> Result<(), log::SetLoggerError> {
    let logger = Box::new(MemoraLogger::new(config));
    let level = RedisLogLevel::parse(&config.loglevel).to_level_filter();

    log::set_boxed_logger(logger)?;
    log::set_max_level(level);

    Ok(())
}
