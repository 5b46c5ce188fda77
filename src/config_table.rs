//! Table-driven configuration parameters
//!
//! Each entry names a parameter and carries its getter and setter, so
//! `EngineConfig::get`/`set` and the config file parser share one lookup.

use crate::config::EngineConfig;

/// Getter function type
pub type ConfigGetter = fn(&EngineConfig) -> String;
/// Setter function type
pub type ConfigSetter = fn(&mut EngineConfig, &str) -> Result<(), &'static str>;

/// A configuration entry in the table
pub struct ConfigEntry {
    pub name: &'static str,
    pub default_value: &'static str,
    pub getter: ConfigGetter,
    pub setter: ConfigSetter,
}

macro_rules! display_getter {
    ($field:ident) => {
        |c| c.$field.to_string()
    };
}

macro_rules! positive_int_setter {
    ($field:ident, $ty:ty) => {
        |c, v| {
            let n = v.parse::<$ty>().map_err(|_| "Invalid integer")?;
            if n == 0 {
                return Err("Must be positive");
            }
            c.$field = n;
            Ok(())
        }
    };
}

macro_rules! rate_setter {
    ($field:ident) => {
        |c, v| {
            let rate = v.parse::<f64>().map_err(|_| "Invalid float")?;
            if !(rate > 0.0 && rate < 1.0) {
                return Err("Must be between 0 and 1");
            }
            c.$field = rate;
            Ok(())
        }
    };
}

/// The static configuration table
pub static CONFIG_TABLE: &[ConfigEntry] = &[
    // === Bloom / Cuckoo defaults ===
    ConfigEntry {
        name: "bf-default-capacity",
        default_value: "100",
        getter: display_getter!(bf_default_capacity),
        setter: positive_int_setter!(bf_default_capacity, u64),
    },
    ConfigEntry {
        name: "bf-default-error-rate",
        default_value: "0.01",
        getter: display_getter!(bf_default_error_rate),
        setter: rate_setter!(bf_default_error_rate),
    },
    ConfigEntry {
        name: "cf-default-capacity",
        default_value: "128",
        getter: display_getter!(cf_default_capacity),
        setter: positive_int_setter!(cf_default_capacity, u64),
    },
    ConfigEntry {
        name: "cf-default-error-rate",
        default_value: "0.01",
        getter: display_getter!(cf_default_error_rate),
        setter: rate_setter!(cf_default_error_rate),
    },
    // === Encoding ===
    ConfigEntry {
        name: "list-max-listpack-size",
        default_value: "8192",
        getter: display_getter!(list_max_listpack_size),
        setter: positive_int_setter!(list_max_listpack_size, usize),
    },
    // === Logging ===
    ConfigEntry {
        name: "loglevel",
        default_value: "notice",
        getter: |c| c.loglevel.clone(),
        setter: |c, v| {
            let level = v.to_lowercase();
            match level.as_str() {
                "debug" | "verbose" | "notice" | "warning" | "nothing" => {
                    c.loglevel = level;
                    Ok(())
                }
                _ => Err("Invalid log level"),
            }
        },
    },
    ConfigEntry {
        name: "logfile",
        default_value: "",
        getter: |c| c.logfile.clone(),
        setter: |c, v| {
            c.logfile = v.to_string();
            Ok(())
        },
    },
];

/// Find a config entry by name, case-insensitively
pub fn find_config(name: &str) -> Option<&'static ConfigEntry> {
    CONFIG_TABLE
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name))
}
