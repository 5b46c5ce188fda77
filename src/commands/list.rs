//! List commands

use bytes::Bytes;

use super::{count_reply, parse_int, unknown_command};
use crate::error::{Error, Result};
use crate::protocol::RespValue;
use crate::storage::Store;

pub fn execute(store: &Store, cmd: &[u8], args: &[Bytes]) -> Result<RespValue> {
    match cmd {
        b"LPUSH" => cmd_lpush(store, args),
        b"RPUSH" => cmd_rpush(store, args),
        b"LPOP" => cmd_pop(store, args, true),
        b"RPOP" => cmd_pop(store, args, false),
        b"LLEN" => cmd_llen(store, args),
        b"LRANGE" => cmd_lrange(store, args),
        b"LINDEX" => cmd_lindex(store, args),
        _ => Err(unknown_command(cmd)),
    }
}

fn bulk_array(values: Vec<Bytes>) -> RespValue {
    RespValue::array(values.into_iter().map(RespValue::bulk).collect())
}

/// LPUSH key element [element ...]
fn cmd_lpush(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() < 2 {
        return Err(Error::WrongArity("LPUSH"));
    }
    Ok(count_reply(store.lpush(&args[0], &args[1..])?))
}

/// RPUSH key element [element ...]
fn cmd_rpush(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() < 2 {
        return Err(Error::WrongArity("RPUSH"));
    }
    Ok(count_reply(store.rpush(&args[0], &args[1..])?))
}

/// LPOP/RPOP key [count]
///
/// Without a count the reply is a single element or nil. With a count it is
/// an array, or nil when the key is missing.
fn cmd_pop(store: &Store, args: &[Bytes], left: bool) -> Result<RespValue> {
    let name = if left { "LPOP" } else { "RPOP" };
    if args.is_empty() || args.len() > 2 {
        return Err(Error::WrongArity(name));
    }

    let key = &args[0];
    let count = match args.get(1) {
        Some(arg) => {
            let n = parse_int(arg)?;
            if n < 0 {
                return Err(Error::OutOfRange);
            }
            Some(n as usize)
        }
        None => None,
    };

    let pop = |n| {
        if left {
            store.lpop(key, n)
        } else {
            store.rpop(key, n)
        }
    };

    match count {
        None => Ok(RespValue::optional(
            pop(1)?.and_then(|values| values.into_iter().next()),
        )),
        Some(0) => {
            if store.exists(key) {
                // Surface WRONGTYPE before answering
                store.llen(key)?;
                Ok(RespValue::array(Vec::new()))
            } else {
                Ok(RespValue::Nil)
            }
        }
        Some(n) => Ok(pop(n)?.map_or(RespValue::Nil, bulk_array)),
    }
}

/// LLEN key
fn cmd_llen(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 1 {
        return Err(Error::WrongArity("LLEN"));
    }
    Ok(count_reply(store.llen(&args[0])?))
}

/// LRANGE key start stop
fn cmd_lrange(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 3 {
        return Err(Error::WrongArity("LRANGE"));
    }
    let start = parse_int(&args[1])?;
    let stop = parse_int(&args[2])?;
    Ok(bulk_array(store.lrange(&args[0], start, stop)?))
}

/// LINDEX key index
fn cmd_lindex(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 2 {
        return Err(Error::WrongArity("LINDEX"));
    }
    let index = parse_int(&args[1])?;
    Ok(RespValue::optional(store.lindex(&args[0], index)?))
}
