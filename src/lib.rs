#![allow(clippy::large_enum_variant)] // DataType variants are boxed but still differ in size

pub mod commands;
pub mod config;
pub mod config_table;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod storage;

pub use commands::Dispatcher;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use protocol::RespValue;
pub use storage::Store;
