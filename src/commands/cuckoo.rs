//! Cuckoo filter commands (CF.*)

use bytes::Bytes;

use super::{count_reply, parse_float, parse_u64, unknown_command};
use crate::error::{Error, Result};
use crate::protocol::RespValue;
use crate::storage::Store;

pub fn execute(store: &Store, cmd: &[u8], args: &[Bytes]) -> Result<RespValue> {
    match cmd {
        b"CF.RESERVE" => cmd_cf_reserve(store, args),
        b"CF.ADD" => cmd_cf_add(store, args),
        b"CF.ADDNX" => cmd_cf_addnx(store, args),
        b"CF.EXISTS" => cmd_cf_exists(store, args),
        b"CF.MEXISTS" => cmd_cf_mexists(store, args),
        b"CF.DEL" => cmd_cf_del(store, args),
        b"CF.INFO" => cmd_cf_info(store, args),
        _ => Err(unknown_command(cmd)),
    }
}

/// CF.RESERVE key error_rate capacity
fn cmd_cf_reserve(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 3 {
        return Err(Error::WrongArity("CF.RESERVE"));
    }
    let error_rate = parse_float(&args[1])?;
    let capacity = parse_u64(&args[2])?;
    store.cf_reserve(&args[0], error_rate, capacity)?;
    Ok(RespValue::ok())
}

/// CF.ADD key item
fn cmd_cf_add(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 2 {
        return Err(Error::WrongArity("CF.ADD"));
    }
    store.cf_add(&args[0], &args[1])?;
    Ok(RespValue::integer(1))
}

/// CF.ADDNX key item
fn cmd_cf_addnx(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 2 {
        return Err(Error::WrongArity("CF.ADDNX"));
    }
    Ok(RespValue::boolean(store.cf_addnx(&args[0], &args[1])?))
}

/// CF.EXISTS key item
fn cmd_cf_exists(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 2 {
        return Err(Error::WrongArity("CF.EXISTS"));
    }
    Ok(RespValue::boolean(store.cf_exists(&args[0], &args[1])?))
}

/// CF.MEXISTS key item [item ...]
fn cmd_cf_mexists(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() < 2 {
        return Err(Error::WrongArity("CF.MEXISTS"));
    }
    let results = store.cf_mexists(&args[0], &args[1..])?;
    Ok(RespValue::array(
        results.into_iter().map(RespValue::boolean).collect(),
    ))
}

/// CF.DEL key item
fn cmd_cf_del(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 2 {
        return Err(Error::WrongArity("CF.DEL"));
    }
    Ok(RespValue::boolean(store.cf_del(&args[0], &args[1])?))
}

/// CF.INFO key
fn cmd_cf_info(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 1 {
        return Err(Error::WrongArity("CF.INFO"));
    }
    let info = store.cf_info(&args[0])?;
    Ok(RespValue::array(vec![
        RespValue::bulk_string("Size"),
        count_reply(info.size_bytes),
        RespValue::bulk_string("Number of buckets"),
        count_reply(info.num_buckets),
        RespValue::bulk_string("Number of items inserted"),
        count_reply(info.items),
        RespValue::bulk_string("Bucket size"),
        count_reply(info.bucket_size),
        RespValue::bulk_string("Fingerprint bits"),
        count_reply(info.fingerprint_bits),
        RespValue::bulk_string("Max iterations"),
        count_reply(info.max_kicks),
        RespValue::bulk_string("Capacity"),
        count_reply(info.capacity),
    ]))
}
