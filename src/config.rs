//! Engine configuration
//!
//! Values come from `Default`, a `redis.conf`-style text (`name value` per
//! line, `#` comments) or runtime `set` calls. Names are resolved through
//! the table in `config_table`.

use std::path::Path;

use crate::config_table::find_config;
use crate::error::{Error, Result};
use crate::storage::quicklist::DEFAULT_NODE_MAX_BYTES;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    // --- Probabilistic defaults for lazily created filters ---
    /// Capacity of a Bloom filter created by BF.ADD (default: 100)
    pub bf_default_capacity: u64,
    /// Error rate of a Bloom filter created by BF.ADD (default: 0.01)
    pub bf_default_error_rate: f64,
    /// Capacity of a Cuckoo filter created by CF.ADD (default: 128)
    pub cf_default_capacity: u64,
    /// Error rate of a Cuckoo filter created by CF.ADD (default: 0.01)
    pub cf_default_error_rate: f64,

    // --- Encoding ---
    /// Max bytes of a single list node (list-max-listpack-size, default: 8192)
    pub list_max_listpack_size: usize,

    // --- Logging ---
    /// Log level (default: "notice")
    pub loglevel: String,
    /// Log file path (default: "" - stderr)
    pub logfile: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bf_default_capacity: 100,
            bf_default_error_rate: 0.01,
            cf_default_capacity: 128,
            cf_default_error_rate: 0.01,
            list_max_listpack_size: DEFAULT_NODE_MAX_BYTES,
            loglevel: "notice".to_string(),
            logfile: String::new(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration text on top of the defaults
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (name, value) = match line.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (line, ""),
            };
            config.set(name, unquote(value))?;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Current value of a parameter, or None if the name is unknown
    pub fn get(&self, name: &str) -> Option<String> {
        find_config(name).map(|entry| (entry.getter)(self))
    }

    /// Update a parameter by name
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let entry = find_config(name).ok_or_else(|| Error::InvalidConfig {
            name: name.to_string(),
            value: value.to_string(),
            reason: "unknown parameter",
        })?;

        (entry.setter)(self, value).map_err(|reason| Error::InvalidConfig {
            name: entry.name.to_string(),
            value: value.to_string(),
            reason,
        })
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
