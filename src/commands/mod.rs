//! Command implementations
//!
//! Handlers take an already split argument vector and return a `RespValue`.
//! Each family module exposes `execute(store, cmd, args)`.

pub mod bloom;
pub mod cms;
pub mod cuckoo;
pub mod generic;
pub mod list;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::protocol::RespValue;
use crate::storage::Store;

/// Command dispatcher - routes commands to appropriate handlers
pub struct Dispatcher;

impl Dispatcher {
    /// Execute a command, turning handler errors into error replies
    #[inline]
    pub fn execute(store: &Store, cmd: &[u8], args: &[Bytes]) -> RespValue {
        match Self::execute_inner(store, cmd, args) {
            Ok(resp) => resp,
            Err(e) => RespValue::error(&e.to_string()),
        }
    }

    fn execute_inner(store: &Store, cmd: &[u8], args: &[Bytes]) -> Result<RespValue> {
        let name = cmd.to_ascii_uppercase();

        if name.starts_with(b"BF.") {
            return bloom::execute(store, &name, args);
        }
        if name.starts_with(b"CF.") {
            return cuckoo::execute(store, &name, args);
        }
        if name.starts_with(b"CMS.") {
            return cms::execute(store, &name, args);
        }

        match name.as_slice() {
            b"LPUSH" | b"RPUSH" | b"LPOP" | b"RPOP" | b"LLEN" | b"LRANGE" | b"LINDEX" => {
                list::execute(store, &name, args)
            }
            b"DEL" | b"EXISTS" | b"TYPE" => generic::execute(store, &name, args),
            _ => Err(unknown_command(cmd)),
        }
    }
}

pub(crate) fn unknown_command(cmd: &[u8]) -> Error {
    Error::UnknownCommand(String::from_utf8_lossy(cmd).into_owned())
}

pub(crate) fn parse_int(b: &[u8]) -> Result<i64> {
    std::str::from_utf8(b)
        .map_err(|_| Error::NotInteger)?
        .parse()
        .map_err(|_| Error::NotInteger)
}

pub(crate) fn parse_u64(b: &[u8]) -> Result<u64> {
    std::str::from_utf8(b)
        .map_err(|_| Error::NotInteger)?
        .parse()
        .map_err(|_| Error::NotInteger)
}

pub(crate) fn parse_float(b: &[u8]) -> Result<f64> {
    std::str::from_utf8(b)
        .map_err(|_| Error::NotFloat)?
        .parse()
        .map_err(|_| Error::NotFloat)
}

/// Integer reply for an unsigned count, clamped to i64
#[inline]
pub(crate) fn count_reply<T: TryInto<i64>>(n: T) -> RespValue {
    RespValue::integer(n.try_into().unwrap_or(i64::MAX))
}

#[cfg(test)]
pub(crate) fn args(parts: &[&str]) -> Vec<Bytes> {
    parts
        .iter()
        .map(|p| Bytes::copy_from_slice(p.as_bytes()))
        .collect()
}
