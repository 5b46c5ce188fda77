//! Listpack - compact, self-describing sequence of strings and integers
//!
//! A listpack is one contiguous buffer:
//!
//! ```text
//! [total_bytes: u32 LE] [num_elements: u16 LE] [entry1] ... [entryN] [0xFF]
//! ```
//!
//! Each entry is `[encoding tag (+ length bytes)] [payload] [backlen]`, where
//! backlen is the byte length of tag + payload written as a reverse varint
//! (see `backlen`). Forward traversal reads the tag to learn the entry size,
//! backward traversal reads the backlen that precedes a position.
//!
//! Integers are only used for canonical decimal strings, so every value comes
//! back exactly as it was pushed ("007" stays a string, "-15" becomes an int).

use bytes::Bytes;

use super::backlen;
use crate::error::{Error, Result};

/// Header: 4-byte total length + 2-byte element count
pub const LP_HEADER_SIZE: usize = 6;
/// Terminator byte, never a valid encoding tag
pub const LP_EOF: u8 = 0xFF;
/// Element count value meaning "too many to fit in the header"
pub const LP_NUMELE_UNKNOWN: u16 = u16::MAX;

const LP_ENCODING_7BIT_UINT: u8 = 0x00; // 0xxxxxxx
const LP_ENCODING_7BIT_UINT_MASK: u8 = 0x80;
const LP_ENCODING_6BIT_STR: u8 = 0x80; // 10xxxxxx
const LP_ENCODING_6BIT_STR_MASK: u8 = 0xC0;
const LP_ENCODING_12BIT_STR: u8 = 0xE0; // 1110xxxx xxxxxxxx
const LP_ENCODING_12BIT_STR_MASK: u8 = 0xF0;
const LP_ENCODING_32BIT_STR: u8 = 0xF0;
const LP_ENCODING_16BIT_INT: u8 = 0xF1;
const LP_ENCODING_32BIT_INT: u8 = 0xF3;
const LP_ENCODING_64BIT_INT: u8 = 0xF4;

/// Longest string the 32-bit length tag can describe
pub const LP_MAX_STR_LEN: usize = u32::MAX as usize;

/// A decoded listpack entry borrowing from the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListpackValue<'a> {
    Int(i64),
    Str(&'a [u8]),
}

impl ListpackValue<'_> {
    /// String form of the entry, as a client would read it back
    pub fn to_bytes(&self) -> Bytes {
        match self {
            ListpackValue::Int(n) => Bytes::from(n.to_string()),
            ListpackValue::Str(s) => Bytes::copy_from_slice(s),
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ListpackValue::Int(n) => Some(*n),
            ListpackValue::Str(_) => None,
        }
    }
}

/// Parse `s` as an integer only if it is the canonical decimal rendering of
/// an i64: "0", or an optional '-' followed by a non-zero digit and more
/// digits, within range.
pub fn parse_canonical_int(s: &[u8]) -> Option<i64> {
    if s.is_empty() || s.len() > 20 {
        return None;
    }
    if s == b"0" {
        return Some(0);
    }

    let (negative, digits) = match s.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, s),
    };

    match digits.first() {
        Some(b'1'..=b'9') => {}
        _ => return None,
    }

    let mut value: u64 = 0;
    for &c in digits {
        if !c.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(u64::from(c - b'0'))?;
    }

    if negative {
        if value > i64::MAX as u64 + 1 {
            return None;
        }
        Some((value as i64).wrapping_neg())
    } else {
        i64::try_from(value).ok()
    }
}

/// Size of `[tag][payload]` for a string of `len` bytes
fn str_encoded_size(len: usize) -> Result<usize> {
    match len {
        0..=63 => Ok(1 + len),
        64..=4095 => Ok(2 + len),
        _ if len <= LP_MAX_STR_LEN => Ok(5 + len),
        _ => Err(Error::Encoding(len)),
    }
}

#[inline]
fn int_encoded_size(n: i64) -> usize {
    if (0..=127).contains(&n) {
        1
    } else if i16::try_from(n).is_ok() {
        3
    } else if i32::try_from(n).is_ok() {
        5
    } else {
        9
    }
}

/// Pick the encoding for a raw value
#[inline]
fn classify(value: &[u8]) -> ListpackValue<'_> {
    match parse_canonical_int(value) {
        Some(n) => ListpackValue::Int(n),
        None => ListpackValue::Str(value),
    }
}

/// Size of `[tag][payload]` for a classified value
fn encoded_size(value: &ListpackValue<'_>) -> Result<usize> {
    match value {
        ListpackValue::Int(n) => Ok(int_encoded_size(*n)),
        ListpackValue::Str(s) => str_encoded_size(s.len()),
    }
}

/// Append `[tag][payload][backlen]` to `out`. `size` must be `encoded_size(value)`.
fn write_entry(out: &mut Vec<u8>, value: &ListpackValue<'_>, size: usize) {
    match *value {
        ListpackValue::Int(n) => match size {
            1 => out.push(LP_ENCODING_7BIT_UINT | n as u8),
            3 => {
                out.push(LP_ENCODING_16BIT_INT);
                out.extend_from_slice(&(n as i16).to_le_bytes());
            }
            5 => {
                out.push(LP_ENCODING_32BIT_INT);
                out.extend_from_slice(&(n as i32).to_le_bytes());
            }
            _ => {
                out.push(LP_ENCODING_64BIT_INT);
                out.extend_from_slice(&n.to_le_bytes());
            }
        },
        ListpackValue::Str(s) => {
            let len = s.len();
            if len < 64 {
                out.push(LP_ENCODING_6BIT_STR | len as u8);
            } else if len < 4096 {
                out.push(LP_ENCODING_12BIT_STR | (len >> 8) as u8);
                out.push((len & 0xFF) as u8);
            } else {
                out.push(LP_ENCODING_32BIT_STR);
                out.extend_from_slice(&(len as u32).to_le_bytes());
            }
            out.extend_from_slice(s);
        }
    }

    let (buf, n) = backlen::encode(size as u64);
    out.extend_from_slice(&buf[..n]);
}

/// A memory-efficient packed sequence of values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listpack {
    /// Packed data: [header] [entries...] [0xFF]
    data: Vec<u8>,
    /// Exact number of entries (the header saturates at LP_NUMELE_UNKNOWN)
    len: usize,
}

impl Default for Listpack {
    fn default() -> Self {
        Self::new()
    }
}

impl Listpack {
    /// Create a new empty listpack
    pub fn new() -> Self {
        let mut data = Vec::with_capacity(64);
        data.extend_from_slice(&((LP_HEADER_SIZE + 1) as u32).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.push(LP_EOF);
        Self { data, len: 0 }
    }

    /// Rebuild a listpack from its serialized bytes, validating the layout.
    /// Returns None if the header, any entry, or the terminator is malformed.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < LP_HEADER_SIZE + 1 || data[data.len() - 1] != LP_EOF {
            return None;
        }
        let total = u32::from_le_bytes(data[0..4].try_into().ok()?) as usize;
        let numele = u16::from_le_bytes(data[4..6].try_into().ok()?);
        if total != data.len() {
            return None;
        }

        let lp = Self {
            data: data.to_vec(),
            len: 0,
        };

        let eof = data.len() - 1;
        let mut pos = LP_HEADER_SIZE;
        let mut count = 0usize;
        while pos < eof {
            let size = lp.encoded_size_at(pos)?;
            let width = backlen::encoded_len(size as u64);
            let end = pos + size + width;
            if end > eof || backlen::decode(&data[..end])? != size as u64 {
                return None;
            }
            pos = end;
            count += 1;
        }

        if numele != LP_NUMELE_UNKNOWN && usize::from(numele) != count {
            return None;
        }

        Some(Self { len: count, ..lp })
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total size in bytes, header and terminator included
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Raw serialized buffer
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Value of the total-bytes header field
    #[inline]
    pub fn header_total_bytes(&self) -> u32 {
        u32::from_le_bytes([self.data[0], self.data[1], self.data[2], self.data[3]])
    }

    /// Value of the element-count header field
    #[inline]
    pub fn header_num_elements(&self) -> u16 {
        u16::from_le_bytes([self.data[4], self.data[5]])
    }

    /// Offset of the terminator byte
    #[inline]
    fn eof_offset(&self) -> usize {
        self.data.len() - 1
    }

    /// Bytes a value would occupy as an entry (tag + payload + backlen)
    pub fn entry_size(value: &[u8]) -> Result<usize> {
        let size = encoded_size(&classify(value))?;
        Ok(size + backlen::encoded_len(size as u64))
    }

    fn update_header(&mut self) {
        let total = self.data.len() as u32;
        let numele = u16::try_from(self.len)
            .ok()
            .filter(|&n| n != LP_NUMELE_UNKNOWN)
            .unwrap_or(LP_NUMELE_UNKNOWN);
        self.data[0..4].copy_from_slice(&total.to_le_bytes());
        self.data[4..6].copy_from_slice(&numele.to_le_bytes());
    }

    /// Encode `values` in order onto the end of `out`, skipping anything that
    /// cannot be encoded or would push the listpack past the 32-bit total
    /// length. `reserved` counts bytes outside `out` that end up in the same
    /// buffer. Returns the number of encoded values.
    fn encode_all<T: AsRef<[u8]>>(values: &[T], reserved: usize, out: &mut Vec<u8>) -> usize {
        let mut added = 0;
        for value in values {
            let value = classify(value.as_ref());
            let Ok(size) = encoded_size(&value) else {
                continue;
            };
            let entry_len = size + backlen::encoded_len(size as u64);
            if reserved + out.len() + entry_len > u32::MAX as usize {
                continue;
            }
            write_entry(out, &value, size);
            added += 1;
        }
        added
    }

    /// Append values at the tail, in call order.
    /// Returns how many values were encoded; oversize values are skipped.
    pub fn push_right<T: AsRef<[u8]>>(&mut self, values: &[T]) -> usize {
        if self.data.last() == Some(&LP_EOF) {
            self.data.pop();
        }

        // One byte stays reserved for the terminator
        let added = Self::encode_all(values, 1, &mut self.data);
        self.data.push(LP_EOF);

        self.len += added;
        self.update_header();
        added
    }

    /// Insert values before the current head so that `values[0]` becomes the
    /// new first entry. Returns how many values were encoded.
    pub fn push_left<T: AsRef<[u8]>>(&mut self, values: &[T]) -> usize {
        let mut block = Vec::new();
        let added = Self::encode_all(values, self.data.len(), &mut block);
        if added == 0 {
            return 0;
        }

        self.data.splice(LP_HEADER_SIZE..LP_HEADER_SIZE, block);

        self.len += added;
        self.update_header();
        added
    }

    /// Size of `[tag][payload]` of the entry at `pos`, bounds-checked
    fn encoded_size_at(&self, pos: usize) -> Option<usize> {
        let tag = *self.data.get(pos)?;
        let size = if tag & LP_ENCODING_7BIT_UINT_MASK == LP_ENCODING_7BIT_UINT {
            1
        } else if tag & LP_ENCODING_6BIT_STR_MASK == LP_ENCODING_6BIT_STR {
            1 + usize::from(tag & 0x3F)
        } else if tag & LP_ENCODING_12BIT_STR_MASK == LP_ENCODING_12BIT_STR {
            let low = *self.data.get(pos + 1)?;
            2 + ((usize::from(tag & 0x0F) << 8) | usize::from(low))
        } else {
            match tag {
                LP_ENCODING_16BIT_INT => 3,
                LP_ENCODING_32BIT_INT => 5,
                LP_ENCODING_64BIT_INT => 9,
                LP_ENCODING_32BIT_STR => {
                    let len = self.data.get(pos + 1..pos + 5)?;
                    5 + u32::from_le_bytes(len.try_into().ok()?) as usize
                }
                _ => return None,
            }
        };

        if pos + size > self.eof_offset() {
            return None;
        }
        Some(size)
    }

    /// Position of the first entry
    #[inline]
    pub fn first(&self) -> Option<usize> {
        (self.data[LP_HEADER_SIZE] != LP_EOF).then_some(LP_HEADER_SIZE)
    }

    /// Position of the last entry
    #[inline]
    pub fn last(&self) -> Option<usize> {
        self.prev(self.eof_offset())
    }

    /// Position of the entry following the one at `pos`.
    /// Returns None when `pos` is the last entry or the terminator.
    pub fn next(&self, pos: usize) -> Option<usize> {
        if pos < LP_HEADER_SIZE || pos >= self.eof_offset() {
            return None;
        }
        let size = self.encoded_size_at(pos)?;
        let next = pos + size + backlen::encoded_len(size as u64);
        (next < self.eof_offset()).then_some(next)
    }

    /// Position of the entry preceding `pos`, found through the backlen that
    /// ends right before `pos`. `pos` may be the terminator offset.
    /// Returns None at the first entry.
    pub fn prev(&self, pos: usize) -> Option<usize> {
        if pos <= LP_HEADER_SIZE || pos > self.eof_offset() {
            return None;
        }
        let window_start = pos.saturating_sub(backlen::MAX_BACKLEN_BYTES).max(LP_HEADER_SIZE);
        let size = backlen::decode(&self.data[window_start..pos])? as usize;
        let step = size + backlen::encoded_len(size as u64);
        pos.checked_sub(step).filter(|&p| p >= LP_HEADER_SIZE)
    }

    /// Decode the entry at `pos`
    pub fn get(&self, pos: usize) -> Option<ListpackValue<'_>> {
        let size = self.encoded_size_at(pos)?;
        let tag = self.data[pos];
        let entry = &self.data[pos..pos + size];

        let value = if tag & LP_ENCODING_7BIT_UINT_MASK == LP_ENCODING_7BIT_UINT {
            ListpackValue::Int(i64::from(tag))
        } else if tag & LP_ENCODING_6BIT_STR_MASK == LP_ENCODING_6BIT_STR {
            ListpackValue::Str(&entry[1..])
        } else if tag & LP_ENCODING_12BIT_STR_MASK == LP_ENCODING_12BIT_STR {
            ListpackValue::Str(&entry[2..])
        } else {
            match tag {
                LP_ENCODING_16BIT_INT => {
                    ListpackValue::Int(i64::from(i16::from_le_bytes([entry[1], entry[2]])))
                }
                LP_ENCODING_32BIT_INT => ListpackValue::Int(i64::from(i32::from_le_bytes(
                    entry[1..5].try_into().ok()?,
                ))),
                LP_ENCODING_64BIT_INT => {
                    ListpackValue::Int(i64::from_le_bytes(entry[1..9].try_into().ok()?))
                }
                LP_ENCODING_32BIT_STR => ListpackValue::Str(&entry[5..]),
                _ => return None,
            }
        };
        Some(value)
    }

    /// Remove the entry spanning `pos..end` and return its string form
    fn remove_range(&mut self, pos: usize, end: usize) -> Option<Bytes> {
        let value = self.get(pos)?.to_bytes();
        self.data.drain(pos..end);
        self.len -= 1;
        self.update_header();
        Some(value)
    }

    /// Remove and return the first entry
    pub fn pop_left(&mut self) -> Option<Bytes> {
        let pos = self.first()?;
        let size = self.encoded_size_at(pos)?;
        let end = pos + size + backlen::encoded_len(size as u64);
        self.remove_range(pos, end)
    }

    /// Remove and return the last entry
    pub fn pop_right(&mut self) -> Option<Bytes> {
        let pos = self.last()?;
        let end = self.eof_offset();
        self.remove_range(pos, end)
    }

    /// Iterate entries front to back
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            lp: self,
            pos: self.first(),
        }
    }

    /// Iterate entries back to front
    #[inline]
    pub fn iter_rev(&self) -> RevIter<'_> {
        RevIter {
            lp: self,
            pos: self.last(),
        }
    }
}

/// Forward iterator over listpack entries
pub struct Iter<'a> {
    lp: &'a Listpack,
    pos: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = ListpackValue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos?;
        self.pos = self.lp.next(pos);
        self.lp.get(pos)
    }
}

/// Backward iterator over listpack entries
pub struct RevIter<'a> {
    lp: &'a Listpack,
    pos: Option<usize>,
}

impl<'a> Iterator for RevIter<'a> {
    type Item = ListpackValue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos?;
        self.pos = self.lp.prev(pos);
        self.lp.get(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collect(lp: &Listpack) -> Vec<Bytes> {
        lp.iter().map(|v| v.to_bytes()).collect()
    }

    #[test]
    fn test_empty_layout() {
        let lp = Listpack::new();
        assert_eq!(lp.as_bytes(), &[7, 0, 0, 0, 0, 0, 0xFF]);
        assert!(lp.is_empty());
        assert_eq!(lp.first(), None);
        assert_eq!(lp.last(), None);
    }

    #[test]
    fn test_traversal_both_directions() {
        let mut lp = Listpack::new();
        assert_eq!(lp.push_right(&["hello", "123", "world"]), 3);

        let forward: Vec<ListpackValue<'_>> = lp.iter().collect();
        assert_eq!(
            forward,
            vec![
                ListpackValue::Str(b"hello"),
                ListpackValue::Int(123),
                ListpackValue::Str(b"world"),
            ]
        );

        let backward: Vec<ListpackValue<'_>> = lp.iter_rev().collect();
        assert_eq!(
            backward,
            vec![
                ListpackValue::Str(b"world"),
                ListpackValue::Int(123),
                ListpackValue::Str(b"hello"),
            ]
        );
    }

    #[test]
    fn test_header_tracks_buffer() {
        let mut lp = Listpack::new();
        lp.push_right(&["a", "bb", "ccc"]);
        assert_eq!(lp.header_total_bytes() as usize, lp.size_bytes());
        assert_eq!(lp.header_num_elements(), 3);
        assert_eq!(*lp.as_bytes().last().unwrap(), LP_EOF);
    }

    #[test]
    fn test_exact_entry_bytes() {
        let mut lp = Listpack::new();
        lp.push_right(&["hi", "5", "-2"]);
        assert_eq!(
            &lp.as_bytes()[LP_HEADER_SIZE..],
            &[
                0x82, b'h', b'i', 0x03, // 6-bit string + backlen 3
                0x05, 0x01, // 7-bit uint + backlen 1
                0xF1, 0xFE, 0xFF, 0x03, // 16-bit int -2 + backlen 3
                0xFF,
            ]
        );
    }

    #[test]
    fn test_integer_widths() {
        let cases: [(&str, u8, usize); 7] = [
            ("127", 0x7F, 2),
            ("128", LP_ENCODING_16BIT_INT, 4),
            ("-32768", LP_ENCODING_16BIT_INT, 4),
            ("32768", LP_ENCODING_32BIT_INT, 6),
            ("-2147483648", LP_ENCODING_32BIT_INT, 6),
            ("2147483648", LP_ENCODING_64BIT_INT, 10),
            ("-9223372036854775808", LP_ENCODING_64BIT_INT, 10),
        ];
        for (input, tag, entry_len) in cases {
            let mut lp = Listpack::new();
            lp.push_right(&[input]);
            assert_eq!(lp.as_bytes()[LP_HEADER_SIZE], tag, "tag for {}", input);
            assert_eq!(Listpack::entry_size(input.as_bytes()).unwrap(), entry_len);
            assert_eq!(lp.iter().next().unwrap().to_bytes(), Bytes::from(input));
        }
    }

    #[test]
    fn test_canonical_numeric_preserved() {
        let mut lp = Listpack::new();
        lp.push_right(&["007", "-0", "+5", "0", "9223372036854775808", "1e3", "-"]);
        let values: Vec<ListpackValue<'_>> = lp.iter().collect();
        assert_eq!(values[0], ListpackValue::Str(b"007"));
        assert_eq!(values[1], ListpackValue::Str(b"-0"));
        assert_eq!(values[2], ListpackValue::Str(b"+5"));
        assert_eq!(values[3], ListpackValue::Int(0));
        assert_eq!(values[4], ListpackValue::Str(b"9223372036854775808"));
        assert_eq!(values[5], ListpackValue::Str(b"1e3"));
        assert_eq!(values[6], ListpackValue::Str(b"-"));
    }

    #[test]
    fn test_parse_canonical_int_bounds() {
        assert_eq!(parse_canonical_int(b"9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_canonical_int(b"-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_canonical_int(b"-9223372036854775809"), None);
        assert_eq!(parse_canonical_int(b"99999999999999999999"), None);
        assert_eq!(parse_canonical_int(b""), None);
        assert_eq!(parse_canonical_int(b" 1"), None);
    }

    #[test]
    fn test_string_length_tiers() {
        let s12 = "x".repeat(100);
        let s32 = "y".repeat(5000);
        let mut lp = Listpack::new();
        lp.push_right(&[s12.as_str(), s32.as_str()]);

        assert_eq!(lp.as_bytes()[LP_HEADER_SIZE] & 0xF0, LP_ENCODING_12BIT_STR);
        let second = lp.next(LP_HEADER_SIZE).unwrap();
        assert_eq!(lp.as_bytes()[second], LP_ENCODING_32BIT_STR);

        assert_eq!(collect(&lp), vec![Bytes::from(s12.clone()), Bytes::from(s32.clone())]);
        let rev: Vec<Bytes> = lp.iter_rev().map(|v| v.to_bytes()).collect();
        assert_eq!(rev, vec![Bytes::from(s32), Bytes::from(s12)]);
    }

    #[test]
    fn test_oversize_string_rejected() {
        assert!(str_encoded_size(LP_MAX_STR_LEN).is_ok());
        assert!(matches!(
            str_encoded_size(LP_MAX_STR_LEN + 1),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_push_left_first_value_is_head() {
        let mut lp = Listpack::new();
        lp.push_right(&["c"]);
        assert_eq!(lp.push_left(&["a", "b"]), 2);
        assert_eq!(
            collect(&lp),
            vec![
                Bytes::from_static(b"a"),
                Bytes::from_static(b"b"),
                Bytes::from_static(b"c"),
            ]
        );
        assert_eq!(lp.header_num_elements(), 3);
        assert_eq!(lp.header_total_bytes() as usize, lp.size_bytes());
    }

    #[test]
    fn test_next_prev_ends() {
        let mut lp = Listpack::new();
        lp.push_right(&["one", "two"]);
        let first = lp.first().unwrap();
        let second = lp.next(first).unwrap();
        assert_eq!(lp.next(second), None);
        assert_eq!(lp.prev(second), Some(first));
        assert_eq!(lp.prev(first), None);
        assert_eq!(lp.last(), Some(second));
    }

    #[test]
    fn test_prev_across_multibyte_backlen() {
        // 200-byte payload: size 202, backlen needs two bytes
        let big = "z".repeat(200);
        let mut lp = Listpack::new();
        lp.push_right(&[big.as_str(), "tail"]);
        let tail = lp.last().unwrap();
        assert_eq!(lp.prev(tail), Some(LP_HEADER_SIZE));
        assert_eq!(lp.get(LP_HEADER_SIZE).unwrap().to_bytes(), Bytes::from(big));
    }

    #[test]
    fn test_pop_both_ends() {
        let mut lp = Listpack::new();
        lp.push_right(&["1", "two", "3"]);
        assert_eq!(lp.pop_left(), Some(Bytes::from("1")));
        assert_eq!(lp.pop_right(), Some(Bytes::from("3")));
        assert_eq!(lp.len(), 1);
        assert_eq!(lp.pop_right(), Some(Bytes::from("two")));
        assert_eq!(lp.pop_left(), None);
        assert_eq!(lp.as_bytes(), Listpack::new().as_bytes());
    }

    #[test]
    fn test_from_bytes_validation() {
        let mut lp = Listpack::new();
        lp.push_right(&["alpha", "42", "beta"]);
        let restored = Listpack::from_bytes(lp.as_bytes()).unwrap();
        assert_eq!(restored, lp);

        let mut bad = lp.as_bytes().to_vec();
        bad[4] = 9; // wrong element count
        assert!(Listpack::from_bytes(&bad).is_none());

        let mut truncated = lp.as_bytes().to_vec();
        truncated.pop();
        assert!(Listpack::from_bytes(&truncated).is_none());
    }

    proptest! {
        #[test]
        fn prop_round_trip(values in prop::collection::vec(
            prop_oneof![
                any::<i64>().prop_map(|n| n.to_string()),
                "[a-z0-9-]{0,80}",
            ],
            0..40,
        )) {
            let mut lp = Listpack::new();
            prop_assert_eq!(lp.push_right(&values), values.len());
            let forward: Vec<Bytes> = lp.iter().map(|v| v.to_bytes()).collect();
            let expected: Vec<Bytes> = values.iter().map(|v| Bytes::from(v.clone())).collect();
            prop_assert_eq!(&forward, &expected);

            let mut backward: Vec<Bytes> = lp.iter_rev().map(|v| v.to_bytes()).collect();
            backward.reverse();
            prop_assert_eq!(backward, expected);
            prop_assert_eq!(lp.header_total_bytes() as usize, lp.size_bytes());
        }
    }
}
