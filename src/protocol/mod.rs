//! Reply values produced by the command layer

mod types;

pub use types::RespValue;
