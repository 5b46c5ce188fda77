//! Fixed-size Bloom filter
//!
//! One seeded 128-bit MurmurHash3 per item, split into lanes `(x, y)`; probe
//! `i` tests bit `(x + y * i) mod num_bits`. The bit array is stored as u64
//! words and its length is always a multiple of 64.

use std::f64::consts::LN_2;

use super::hash::{DEFAULT_SEED, hash128};
use crate::error::{Error, Result};

/// Largest bit array a filter may allocate (512 MiB)
pub const MAX_BITS: u64 = 1 << 32;

/// Bits per entry for a target false positive rate
#[inline]
pub fn bits_per_entry(error_rate: f64) -> f64 {
    error_rate.ln().abs() / (LN_2 * LN_2)
}

/// Summary reported by BF.INFO
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomFilterInfo {
    pub capacity: u64,
    pub size_bytes: usize,
    pub items: u64,
    pub error_rate: f64,
    pub num_hashes: u32,
}

/// A single Bloom filter with fixed capacity
#[derive(Debug, Clone)]
pub struct BloomFilter {
    /// Bit array stored as u64s
    bits: Vec<u64>,
    num_bits: u64,
    num_hashes: u32,
    /// Items whose add set at least one new bit
    items_added: u64,
    capacity: u64,
    error_rate: f64,
}

impl BloomFilter {
    /// Create a filter sized for `entries` items at `error_rate`
    pub fn new(entries: u64, error_rate: f64) -> Result<Self> {
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(Error::Config("error rate should be between 0 and 1"));
        }
        if entries == 0 {
            return Err(Error::Config("capacity must be positive"));
        }

        let bpe = bits_per_entry(error_rate);
        let required = (entries as f64 * bpe).ceil();
        if !(required <= MAX_BITS as f64) {
            return Err(Error::Config("capacity too large"));
        }
        let num_bits = (required as u64)
            .div_ceil(64)
            .max(1)
            .checked_mul(64)
            .filter(|&n| n <= MAX_BITS)
            .ok_or(Error::Config("capacity too large"))?;
        let num_hashes = ((LN_2 * bpe).ceil() as u32).max(1);

        let words = (num_bits / 64) as usize;
        let mut bits = Vec::new();
        bits.try_reserve_exact(words)
            .map_err(|_| Error::Config("not enough memory for filter"))?;
        bits.resize(words, 0u64);

        Ok(Self {
            bits,
            num_bits,
            num_hashes,
            items_added: 0,
            capacity: entries,
            error_rate,
        })
    }

    /// Bit positions probed for `item`
    #[inline]
    fn probes(&self, item: &[u8]) -> impl Iterator<Item = usize> + use<> {
        let h = hash128(item, DEFAULT_SEED);
        let num_bits = self.num_bits;
        (0..u64::from(self.num_hashes))
            .map(move |i| (h.x.wrapping_add(h.y.wrapping_mul(i)) % num_bits) as usize)
    }

    /// Add an item. Returns true if any probed bit was previously unset.
    pub fn add(&mut self, item: &[u8]) -> bool {
        let mut newly_set = false;

        for bit in self.probes(item) {
            let mask = 1u64 << (bit % 64);
            let word = &mut self.bits[bit / 64];
            if *word & mask == 0 {
                newly_set = true;
                *word |= mask;
            }
        }

        if newly_set {
            self.items_added += 1;
        }
        newly_set
    }

    /// Check if an item might exist in the filter
    pub fn exists(&self, item: &[u8]) -> bool {
        self.probes(item)
            .all(|bit| self.bits[bit / 64] & (1u64 << (bit % 64)) != 0)
    }

    pub fn mexists<T: AsRef<[u8]>>(&self, items: &[T]) -> Vec<bool> {
        items.iter().map(|i| self.exists(i.as_ref())).collect()
    }

    /// Number of adds that set a new bit
    #[inline]
    pub fn card(&self) -> u64 {
        self.items_added
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Size of the bit array in bytes
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.bits.len() * 8
    }

    #[inline]
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    #[inline]
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    #[inline]
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn info(&self) -> BloomFilterInfo {
        BloomFilterInfo {
            capacity: self.capacity,
            size_bytes: self.size_bytes(),
            items: self.items_added,
            error_rate: self.error_rate,
            num_hashes: self.num_hashes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizing() {
        let bf = BloomFilter::new(100, 0.01).unwrap();
        // 100 * 9.585.. = 959 bits, rounded up to a multiple of 64
        assert_eq!(bf.num_bits(), 960);
        assert_eq!(bf.num_hashes(), 7);
        assert_eq!(bf.size_bytes(), 120);
        assert_eq!(bf.capacity(), 100);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(BloomFilter::new(100, 0.0), Err(Error::Config(_))));
        assert!(matches!(BloomFilter::new(100, 1.0), Err(Error::Config(_))));
        assert!(matches!(BloomFilter::new(100, f64::NAN), Err(Error::Config(_))));
        assert!(matches!(BloomFilter::new(0, 0.01), Err(Error::Config(_))));
    }

    #[test]
    fn test_oversized_capacity_is_rejected() {
        assert!(matches!(
            BloomFilter::new(u64::MAX, 0.01),
            Err(Error::Config("capacity too large"))
        ));
        assert!(matches!(
            BloomFilter::new(1 << 40, 1e-9),
            Err(Error::Config("capacity too large"))
        ));
    }

    #[test]
    fn test_add_exists() {
        let mut bf = BloomFilter::new(100, 0.01).unwrap();
        assert!(!bf.exists(b"foo"));
        assert!(bf.add(b"foo"));
        assert!(bf.exists(b"foo"));
        assert_eq!(bf.card(), 1);

        // Re-adding sets nothing new
        assert!(!bf.add(b"foo"));
        assert_eq!(bf.card(), 1);
    }

    #[test]
    fn test_no_false_negatives_past_capacity() {
        let mut bf = BloomFilter::new(1000, 0.01).unwrap();
        for i in 0..5000 {
            bf.add(format!("item{}", i).as_bytes());
        }
        for i in 0..5000 {
            assert!(bf.exists(format!("item{}", i).as_bytes()));
        }
    }

    #[test]
    fn test_false_positive_rate() {
        let mut bf = BloomFilter::new(10000, 0.01).unwrap();
        for i in 0..10000 {
            bf.add(format!("item{}", i).as_bytes());
        }

        let false_positives = (10000..20000)
            .filter(|i| bf.exists(format!("item{}", i).as_bytes()))
            .count();
        let fp_rate = false_positives as f64 / 10000.0;
        assert!(fp_rate < 0.02, "False positive rate too high: {}", fp_rate);
    }

    #[test]
    fn test_mexists() {
        let mut bf = BloomFilter::new(100, 0.01).unwrap();
        bf.add(b"a");
        bf.add(b"c");
        assert_eq!(bf.mexists(&["a", "c"]), vec![true, true]);
        assert!(bf.mexists(&["a", "b"])[0]);
    }
}
