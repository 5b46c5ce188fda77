//! Count-Min Sketch commands (CMS.*)

use bytes::Bytes;

use super::{count_reply, parse_float, parse_u64, unknown_command};
use crate::error::{Error, Result};
use crate::protocol::RespValue;
use crate::storage::Store;

pub fn execute(store: &Store, cmd: &[u8], args: &[Bytes]) -> Result<RespValue> {
    match cmd {
        b"CMS.INITBYDIM" => cmd_cms_initbydim(store, args),
        b"CMS.INITBYPROB" => cmd_cms_initbyprob(store, args),
        b"CMS.INCRBY" => cmd_cms_incrby(store, args),
        b"CMS.QUERY" => cmd_cms_query(store, args),
        b"CMS.INFO" => cmd_cms_info(store, args),
        _ => Err(unknown_command(cmd)),
    }
}

fn parse_dimension(b: &[u8]) -> Result<usize> {
    usize::try_from(parse_u64(b)?).map_err(|_| Error::NotInteger)
}

fn counts(values: Vec<u64>) -> RespValue {
    RespValue::array(values.into_iter().map(count_reply).collect())
}

/// CMS.INITBYDIM key width depth
///
/// `width` is the number of counters per row, `depth` the number of rows.
fn cmd_cms_initbydim(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 3 {
        return Err(Error::WrongArity("CMS.INITBYDIM"));
    }
    let width = parse_dimension(&args[1])?;
    let depth = parse_dimension(&args[2])?;
    store.cms_init_by_dim(&args[0], depth, width)?;
    Ok(RespValue::ok())
}

/// CMS.INITBYPROB key error probability
fn cmd_cms_initbyprob(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 3 {
        return Err(Error::WrongArity("CMS.INITBYPROB"));
    }
    let error_rate = parse_float(&args[1])?;
    let probability = parse_float(&args[2])?;
    store.cms_init_by_prob(&args[0], error_rate, probability)?;
    Ok(RespValue::ok())
}

/// CMS.INCRBY key item increment [item increment ...]
fn cmd_cms_incrby(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() < 3 || args.len() % 2 == 0 {
        return Err(Error::WrongArity("CMS.INCRBY"));
    }

    let pairs = args[1..]
        .chunks_exact(2)
        .map(|pair| Ok((&pair[0], parse_u64(&pair[1])?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(counts(store.cms_incrby(&args[0], &pairs)?))
}

/// CMS.QUERY key item [item ...]
fn cmd_cms_query(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() < 2 {
        return Err(Error::WrongArity("CMS.QUERY"));
    }
    Ok(counts(store.cms_query(&args[0], &args[1..])?))
}

/// CMS.INFO key
fn cmd_cms_info(store: &Store, args: &[Bytes]) -> Result<RespValue> {
    if args.len() != 1 {
        return Err(Error::WrongArity("CMS.INFO"));
    }
    let info = store.cms_info(&args[0])?;
    Ok(RespValue::array(vec![
        RespValue::bulk_string("width"),
        count_reply(info.columns),
        RespValue::bulk_string("depth"),
        count_reply(info.rows),
        RespValue::bulk_string("count"),
        count_reply(info.count),
    ]))
}
