//! Bloom filter commands (BF.*)

use bytes::Bytes;

use super::{count_reply, parse_float, parse_u64, unknown_command};
use crate::error::{Error, Result};
use crate::protocol::RespValue;
use crate::storage::Store;

pub fn execute(store: &Store, cmd: &[u8], args: &[Bytes]) -> Result<RespValue> {
    match cmd {
        b"BF.RESERVE" => cmd_bf_reserve(store, args),
        b"BF.ADD" => cmd_bf_add(store, args),
        b"BF.MADD" => cmd_bf_madd(store, args),
        b"BF.EXISTS" => cmd_bf_exists(store, args),
        b"BF.MEXISTS" => cmd_bf_mexists(store, args),
        b"BF.INFO" => cmd_bf_info(store, args),
        b"BF.CARD" => cmd_bf_card(store, args),
        _ => Err(unknown_command(cmd)),
    }
}

fn booleans(results: Vec<bool>) -> RespValue {
    RespValue::array(results.into_iter().map(RespValue::boolean).collect())
}

/// BF.RESERVE key error_rate capacity
fn cmd_bf_reserve(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 3 {
        return Err(Error::WrongArity("BF.RESERVE"));
    }
    let error_rate = parse_float(&args[1])?;
    let capacity = parse_u64(&args[2])?;
    store.bf_reserve(&args[0], error_rate, capacity)?;
    Ok(RespValue::ok())
}

/// BF.ADD key item
fn cmd_bf_add(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 2 {
        return Err(Error::WrongArity("BF.ADD"));
    }
    let added = store.bf_add(&args[0], &args[1])?;
    Ok(RespValue::boolean(added))
}

/// BF.MADD key item [item ...]
fn cmd_bf_madd(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() < 2 {
        return Err(Error::WrongArity("BF.MADD"));
    }
    Ok(booleans(store.bf_madd(&args[0], &args[1..])?))
}

/// BF.EXISTS key item
fn cmd_bf_exists(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 2 {
        return Err(Error::WrongArity("BF.EXISTS"));
    }
    Ok(RespValue::boolean(store.bf_exists(&args[0], &args[1])?))
}

/// BF.MEXISTS key item [item ...]
fn cmd_bf_mexists(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() < 2 {
        return Err(Error::WrongArity("BF.MEXISTS"));
    }
    Ok(booleans(store.bf_mexists(&args[0], &args[1..])?))
}

/// BF.INFO key
fn cmd_bf_info(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 1 {
        return Err(Error::WrongArity("BF.INFO"));
    }
    let info = store.bf_info(&args[0])?;
    Ok(RespValue::array(vec![
        RespValue::bulk_string("Capacity"),
        count_reply(info.capacity),
        RespValue::bulk_string("Size"),
        count_reply(info.size_bytes),
        RespValue::bulk_string("Number of items inserted"),
        count_reply(info.items),
        RespValue::bulk_string("Number of hash functions"),
        count_reply(info.num_hashes),
        RespValue::bulk_string("Error rate"),
        RespValue::bulk_string(&info.error_rate.to_string()),
    ]))
}

/// BF.CARD key
fn cmd_bf_card(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 1 {
        return Err(Error::WrongArity("BF.CARD"));
    }
    Ok(count_reply(store.bf_card(&args[0])?))
}
