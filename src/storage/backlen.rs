//! Reverse varint used as the trailing `backlen` field of listpack entries
//!
//! The first byte holds the most significant 7 bits and has no continuation
//! flag; every following byte holds 7 bits with the high bit set. Decoding
//! starts from the last byte, so an entry's length can be recovered from the
//! position right after it and the buffer walked right-to-left.

/// Largest width of an encoded backlen
pub const MAX_BACKLEN_BYTES: usize = 5;

const CONTINUATION: u8 = 0x80;

/// Number of bytes needed to encode `length`
#[inline]
pub fn encoded_len(length: u64) -> usize {
    match length {
        0..=127 => 1,
        128..=16383 => 2,
        16384..=2_097_151 => 3,
        2_097_152..=268_435_455 => 4,
        _ => 5,
    }
}

/// Encode `length` into `buf`, returning the number of bytes written.
/// `buf` must hold at least `encoded_len(length)` bytes.
pub fn encode_into(buf: &mut [u8], length: u64) -> usize {
    let width = encoded_len(length);
    for (i, byte) in buf[..width].iter_mut().enumerate() {
        let shift = 7 * (width - 1 - i);
        let bits = ((length >> shift) & 0x7F) as u8;
        *byte = if i == 0 { bits } else { bits | CONTINUATION };
    }
    width
}

/// Encode `length` into a fresh stack buffer
#[inline]
pub fn encode(length: u64) -> ([u8; MAX_BACKLEN_BYTES], usize) {
    let mut buf = [0u8; MAX_BACKLEN_BYTES];
    let n = encode_into(&mut buf, length);
    (buf, n)
}

/// Decode the backlen that ends at the last byte of `bytes`.
/// Returns None if no terminating byte is found within 5 bytes.
pub fn decode(bytes: &[u8]) -> Option<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;

    for &byte in bytes.iter().rev().take(MAX_BACKLEN_BYTES) {
        value |= u64::from(byte & 0x7F) << shift;
        if byte & CONTINUATION == 0 {
            return Some(value);
        }
        shift += 7;
    }

    None
}
