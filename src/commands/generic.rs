//! Key-space commands that work on any type

use bytes::Bytes;

use super::{count_reply, unknown_command};
use crate::error::{Error, Result};
use crate::protocol::RespValue;
use crate::storage::Store;

pub fn execute(store: &Store, cmd: &[u8], args: &[Bytes]) -> Result<RespValue> {
    match cmd {
        b"DEL" => cmd_del(store, args),
        b"EXISTS" => cmd_exists(store, args),
        b"TYPE" => cmd_type(store, args),
        _ => Err(unknown_command(cmd)),
    }
}

/// DEL key [key ...]
fn cmd_del(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.is_empty() {
        return Err(Error::WrongArity("DEL"));
    }
    let deleted = args.iter().filter(|key| store.del(key)).count();
    Ok(count_reply(deleted))
}

/// EXISTS key [key ...] - repeated keys are counted each time
fn cmd_exists(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.is_empty() {
        return Err(Error::WrongArity("EXISTS"));
    }
    let found = args.iter().filter(|key| store.exists(key)).count();
    Ok(count_reply(found))
}

/// TYPE key
fn cmd_type(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 1 {
        return Err(Error::WrongArity("TYPE"));
    }
    let name = store.key_type(&args[0]).unwrap_or("none");
    Ok(RespValue::bulk_string(name))
}
