//! Cuckoo filter with bit-packed buckets
//!
//! Each bucket holds four fingerprints packed back to back at
//! `fingerprint_bits` width, so a 10-bit filter spends 5 bytes per bucket.
//! Slot value 0 means empty; a fingerprint that hashes to 0 is stored as 1.
//!
//! Candidate buckets follow partial-key cuckoo hashing:
//! `i1 = x mod n`, `i2 = (i1 ^ hash32(fp)) mod n`. The bucket count is a
//! power of two so the alternate-index step is its own inverse and an evicted
//! fingerprint can always find its way back.

use super::hash::{DEFAULT_SEED, hash32, hash128};
use crate::error::{Error, Result};

/// Slots per bucket
pub const BUCKET_SIZE: usize = 4;

/// Maximum evictions attempted by a single add
pub const MAX_KICKS: usize = 500;

/// Largest bucket count a filter may allocate
pub const MAX_BUCKETS: usize = 1 << 24;

/// Source of the random choices made while evicting
pub trait EvictionRng {
    /// Uniform value in `0..upper`
    fn pick(&mut self, upper: usize) -> usize;
}

impl EvictionRng for fastrand::Rng {
    #[inline]
    fn pick(&mut self, upper: usize) -> usize {
        self.usize(..upper)
    }
}

/// Width in bits of the fingerprint for a target error rate
#[inline]
pub fn fingerprint_bits_for(error_rate: f64) -> u32 {
    ((2.0 * BUCKET_SIZE as f64 / error_rate).log2().ceil() as u32).clamp(1, 32)
}

// ============================================================================
// Bucket
// ============================================================================

/// Four fingerprints bit-packed LSB-first into `ceil(4 * bits / 8)` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    data: Vec<u8>,
}

impl Bucket {
    pub fn new(fp_bits: u32) -> Self {
        Self {
            data: vec![0u8; bucket_bytes(fp_bits)],
        }
    }

    /// Read the `bits`-wide field of `slot`
    pub fn get_slot(&self, slot: usize, bits: u32) -> u32 {
        let start = slot * bits as usize;
        let mut byte = start / 8;
        let mut shift = (start % 8) as u32;
        let mut read = 0u32;
        let mut value = 0u64;

        while read < bits {
            let take = (8 - shift).min(bits - read);
            let mask = ((1u16 << take) - 1) as u8;
            let chunk = (self.data[byte] >> shift) & mask;
            value |= u64::from(chunk) << read;
            read += take;
            byte += 1;
            shift = 0;
        }

        value as u32
    }

    /// Overwrite the `bits`-wide field of `slot`, leaving neighbours intact
    pub fn set_slot(&mut self, slot: usize, bits: u32, value: u32) {
        let start = slot * bits as usize;
        let mut byte = start / 8;
        let mut shift = (start % 8) as u32;
        let mut written = 0u32;

        while written < bits {
            let take = (8 - shift).min(bits - written);
            let mask = (((1u16 << take) - 1) as u8) << shift;
            let chunk = (((value >> written) as u8) << shift) & mask;
            self.data[byte] = (self.data[byte] & !mask) | chunk;
            written += take;
            byte += 1;
            shift = 0;
        }
    }

    #[inline]
    fn contains(&self, fp: u32, bits: u32) -> bool {
        (0..BUCKET_SIZE).any(|s| self.get_slot(s, bits) == fp)
    }

    /// Store `fp` in the first empty slot
    #[inline]
    fn insert(&mut self, fp: u32, bits: u32) -> bool {
        match (0..BUCKET_SIZE).find(|&s| self.get_slot(s, bits) == 0) {
            Some(slot) => {
                self.set_slot(slot, bits, fp);
                true
            }
            None => false,
        }
    }

    /// Clear the first slot holding `fp`
    #[inline]
    fn delete(&mut self, fp: u32, bits: u32) -> bool {
        match (0..BUCKET_SIZE).find(|&s| self.get_slot(s, bits) == fp) {
            Some(slot) => {
                self.set_slot(slot, bits, 0);
                true
            }
            None => false,
        }
    }
}

#[inline]
fn bucket_bytes(fp_bits: u32) -> usize {
    (BUCKET_SIZE * fp_bits as usize).div_ceil(8)
}

// ============================================================================
// Cuckoo Filter
// ============================================================================

/// Summary reported by CF.INFO
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuckooFilterInfo {
    pub capacity: u64,
    pub size_bytes: usize,
    pub num_buckets: usize,
    pub items: u64,
    pub fingerprint_bits: u32,
    pub bucket_size: usize,
    pub max_kicks: usize,
}

/// A fixed-capacity cuckoo filter
#[derive(Debug, Clone)]
pub struct CuckooFilter<R = fastrand::Rng> {
    buckets: Vec<Bucket>,
    /// Power of two, at least the requested capacity
    num_buckets: usize,
    fingerprint_bits: u32,
    fp_mask: u64,
    count: u64,
    capacity: u64,
    error_rate: f64,
    rng: R,
}

impl CuckooFilter {
    /// Create a filter with `capacity` buckets at `error_rate`
    pub fn new(error_rate: f64, capacity: u64) -> Result<Self> {
        Self::with_rng(error_rate, capacity, fastrand::Rng::new())
    }
}

impl<R: EvictionRng> CuckooFilter<R> {
    /// Create a filter that draws eviction choices from `rng`
    pub fn with_rng(error_rate: f64, capacity: u64, rng: R) -> Result<Self> {
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(Error::Config("error rate should be between 0 and 1"));
        }
        if capacity == 0 {
            return Err(Error::Config("capacity must be positive"));
        }

        let fingerprint_bits = fingerprint_bits_for(error_rate);
        let num_buckets = usize::try_from(capacity)
            .ok()
            .and_then(usize::checked_next_power_of_two)
            .filter(|&n| n <= MAX_BUCKETS)
            .ok_or(Error::Config("capacity too large"))?;

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(num_buckets)
            .map_err(|_| Error::Config("not enough memory for filter"))?;
        buckets.resize(num_buckets, Bucket::new(fingerprint_bits));

        Ok(Self {
            buckets,
            num_buckets,
            fingerprint_bits,
            fp_mask: (1u64 << fingerprint_bits) - 1,
            count: 0,
            capacity,
            error_rate,
            rng,
        })
    }

    /// Fingerprint and both candidate buckets for `item`
    #[inline]
    fn indices(&self, item: &[u8]) -> (usize, usize, u32) {
        let h = hash128(item, DEFAULT_SEED);
        let fp = match (h.y & self.fp_mask) as u32 {
            0 => 1,
            fp => fp,
        };
        let i1 = (h.x % self.num_buckets as u64) as usize;
        (i1, self.alt_index(i1, fp), fp)
    }

    #[inline]
    fn alt_index(&self, index: usize, fp: u32) -> usize {
        let offset = hash32(&fp.to_le_bytes(), DEFAULT_SEED) as usize;
        (index ^ offset) % self.num_buckets
    }

    /// Add an item. Fails with `CapacityExceeded` when no slot is found
    /// within `MAX_KICKS` evictions; the filter is left as it was.
    pub fn add(&mut self, item: &[u8]) -> Result<()> {
        let (i1, i2, fp) = self.indices(item);
        let bits = self.fingerprint_bits;

        if self.buckets[i1].insert(fp, bits) || self.buckets[i2].insert(fp, bits) {
            self.count += 1;
            return Ok(());
        }

        self.kick_insert([i1, i2], fp)
    }

    fn kick_insert(&mut self, candidates: [usize; 2], mut fp: u32) -> Result<()> {
        let bits = self.fingerprint_bits;
        let mut index = candidates[self.rng.pick(2)];
        // (bucket, slot, previous fingerprint) for every swap made
        let mut path = Vec::with_capacity(MAX_KICKS);

        for _ in 0..MAX_KICKS {
            let slot = self.rng.pick(BUCKET_SIZE);
            let evicted = self.buckets[index].get_slot(slot, bits);
            self.buckets[index].set_slot(slot, bits, fp);
            path.push((index, slot, evicted));

            fp = evicted;
            index = self.alt_index(index, fp);
            if self.buckets[index].insert(fp, bits) {
                self.count += 1;
                return Ok(());
            }
        }

        for (index, slot, previous) in path.into_iter().rev() {
            self.buckets[index].set_slot(slot, bits, previous);
        }
        Err(Error::CapacityExceeded)
    }

    /// Add only if the item is not already reported present.
    /// Returns false when it was.
    pub fn add_nx(&mut self, item: &[u8]) -> Result<bool> {
        if self.exists(item) {
            return Ok(false);
        }
        self.add(item)?;
        Ok(true)
    }

    /// Check if item might exist in the filter
    pub fn exists(&self, item: &[u8]) -> bool {
        let (i1, i2, fp) = self.indices(item);
        let bits = self.fingerprint_bits;
        self.buckets[i1].contains(fp, bits) || self.buckets[i2].contains(fp, bits)
    }

    pub fn mexists<T: AsRef<[u8]>>(&self, items: &[T]) -> Vec<bool> {
        items.iter().map(|i| self.exists(i.as_ref())).collect()
    }

    /// Delete one occurrence of an item. Only delete items that were added.
    pub fn remove(&mut self, item: &[u8]) -> bool {
        let (i1, i2, fp) = self.indices(item);
        let bits = self.fingerprint_bits;

        if self.buckets[i1].delete(fp, bits) || self.buckets[i2].delete(fp, bits) {
            self.count = self.count.saturating_sub(1);
            return true;
        }
        false
    }

    /// Items currently stored
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    #[inline]
    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    #[inline]
    pub fn fingerprint_bits(&self) -> u32 {
        self.fingerprint_bits
    }

    #[inline]
    pub fn bucket_bytes(&self) -> usize {
        bucket_bytes(self.fingerprint_bits)
    }

    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.num_buckets * self.bucket_bytes()
    }

    #[inline]
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn info(&self) -> CuckooFilterInfo {
        CuckooFilterInfo {
            capacity: self.capacity,
            size_bytes: self.size_bytes(),
            num_buckets: self.num_buckets,
            items: self.count,
            fingerprint_bits: self.fingerprint_bits,
            bucket_size: BUCKET_SIZE,
            max_kicks: MAX_KICKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence of choices
    #[derive(Debug, Clone)]
    struct ScriptedRng {
        script: Vec<usize>,
        pos: usize,
    }

    impl ScriptedRng {
        fn new(script: &[usize]) -> Self {
            Self {
                script: script.to_vec(),
                pos: 0,
            }
        }
    }

    impl EvictionRng for ScriptedRng {
        fn pick(&mut self, upper: usize) -> usize {
            let v = self.script[self.pos % self.script.len()];
            self.pos += 1;
            v % upper
        }
    }

    #[test]
    fn test_sizing() {
        let cf = CuckooFilter::new(0.01, 128).unwrap();
        // ceil(log2(800)) = 10 bits, 4 slots -> 5 bytes
        assert_eq!(cf.fingerprint_bits(), 10);
        assert_eq!(cf.bucket_bytes(), 5);
        assert_eq!(cf.num_buckets(), 128);
        assert_eq!(cf.size_bytes(), 640);

        let cf = CuckooFilter::new(0.01, 100).unwrap();
        assert_eq!(cf.num_buckets(), 128);
        assert_eq!(cf.capacity(), 100);

        // ceil(log2(8e12)) = 43, clamped
        assert_eq!(fingerprint_bits_for(1e-12), 32);
        assert_eq!(fingerprint_bits_for(0.5), 4);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(CuckooFilter::new(0.0, 10), Err(Error::Config(_))));
        assert!(matches!(CuckooFilter::new(1.5, 10), Err(Error::Config(_))));
        assert!(matches!(CuckooFilter::new(0.01, 0), Err(Error::Config(_))));
    }

    #[test]
    fn test_oversized_capacity_is_rejected() {
        assert!(matches!(
            CuckooFilter::new(0.01, 1 << 40),
            Err(Error::Config("capacity too large"))
        ));
        assert!(matches!(
            CuckooFilter::new(0.01, u64::MAX),
            Err(Error::Config("capacity too large"))
        ));
        assert!(matches!(
            CuckooFilter::new(0.01, MAX_BUCKETS as u64 + 1),
            Err(Error::Config("capacity too large"))
        ));
    }

    #[test]
    fn test_slot_layout_12_bits() {
        let mut bucket = Bucket::new(12);
        assert_eq!(bucket.data.len(), 6);
        bucket.set_slot(0, 12, 0xABC);
        bucket.set_slot(1, 12, 0x123);
        assert_eq!(&bucket.data[..3], &[0xBC, 0x3A, 0x12]);
        assert_eq!(bucket.get_slot(0, 12), 0xABC);
        assert_eq!(bucket.get_slot(1, 12), 0x123);
        assert_eq!(bucket.get_slot(2, 12), 0);
    }

    #[test]
    fn test_slot_packing_odd_widths() {
        for bits in [3u32, 5, 7, 10, 13, 17, 31, 32] {
            let mask = if bits == 32 { u32::MAX } else { (1u32 << bits) - 1 };
            let mut bucket = Bucket::new(bits);
            for slot in 0..BUCKET_SIZE {
                bucket.set_slot(slot, bits, mask);
            }
            bucket.set_slot(1, bits, 0);
            bucket.set_slot(2, bits, 0x5555_5555 & mask);

            assert_eq!(bucket.get_slot(0, bits), mask, "bits={}", bits);
            assert_eq!(bucket.get_slot(1, bits), 0, "bits={}", bits);
            assert_eq!(bucket.get_slot(2, bits), 0x5555_5555 & mask, "bits={}", bits);
            assert_eq!(bucket.get_slot(3, bits), mask, "bits={}", bits);
        }
    }

    #[test]
    fn test_add_exists_remove() {
        let mut cf = CuckooFilter::new(0.01, 128).unwrap();
        let items: Vec<String> = (0..100).map(|i| format!("item{}", i)).collect();
        for item in &items {
            cf.add(item.as_bytes()).unwrap();
        }
        assert_eq!(cf.count(), 100);
        assert!(items.iter().all(|i| cf.exists(i.as_bytes())));

        assert!(cf.remove(b"item42"));
        assert!(!cf.exists(b"item42"));
        assert_eq!(cf.count(), 99);
        for item in items.iter().filter(|i| i.as_str() != "item42") {
            assert!(cf.exists(item.as_bytes()));
        }
        assert!(!cf.remove(b"item42"));
    }

    #[test]
    fn test_add_nx() {
        let mut cf = CuckooFilter::new(0.01, 64).unwrap();
        assert!(cf.add_nx(b"a").unwrap());
        assert!(!cf.add_nx(b"a").unwrap());
        assert_eq!(cf.count(), 1);
        assert!(cf.mexists(&["a", "zzz-not-there"])[0]);
    }

    #[test]
    fn test_alt_index_is_involution() {
        let cf = CuckooFilter::new(0.01, 100).unwrap();
        for fp in 1..2000u32 {
            for i in [0usize, 1, 17, 99, 127] {
                assert_eq!(cf.alt_index(cf.alt_index(i, fp), fp), i);
            }
        }
    }

    #[test]
    fn test_scripted_eviction_moves_fingerprint() {
        let mut cf = CuckooFilter::with_rng(0.01, 2, ScriptedRng::new(&[0])).unwrap();
        let bits = cf.fingerprint_bits();

        // An item whose candidates are both bucket 0
        let item = (0..)
            .map(|n| format!("item{}", n))
            .find(|s| {
                let (i1, i2, _) = cf.indices(s.as_bytes());
                i1 == 0 && i2 == 0
            })
            .unwrap();
        let (_, _, fp) = cf.indices(item.as_bytes());

        // Bucket 0 is full of a fingerprint whose alternate is bucket 1
        let movable = (1u32..).find(|&f| f != fp && cf.alt_index(0, f) == 1).unwrap();
        for slot in 0..BUCKET_SIZE {
            cf.buckets[0].set_slot(slot, bits, movable);
        }

        cf.add(item.as_bytes()).unwrap();
        assert_eq!(cf.buckets[0].get_slot(0, bits), fp);
        assert_eq!(cf.buckets[1].get_slot(0, bits), movable);
        assert!(cf.exists(item.as_bytes()));
        assert_eq!(cf.count(), 1);
    }

    #[test]
    fn test_capacity_exceeded_rolls_back() {
        let mut cf = CuckooFilter::with_rng(0.01, 1, ScriptedRng::new(&[1, 3, 0, 2])).unwrap();
        for i in 0..BUCKET_SIZE {
            cf.add(format!("item{}", i).as_bytes()).unwrap();
        }
        let before = cf.buckets.clone();

        assert!(matches!(cf.add(b"one-too-many"), Err(Error::CapacityExceeded)));
        assert_eq!(cf.buckets, before);
        assert_eq!(cf.count(), BUCKET_SIZE as u64);
        for i in 0..BUCKET_SIZE {
            assert!(cf.exists(format!("item{}", i).as_bytes()));
        }
    }

    #[test]
    fn test_same_script_same_state() {
        let fill = || {
            let mut cf =
                CuckooFilter::with_rng(0.01, 16, ScriptedRng::new(&[3, 1, 4, 1, 5, 9, 2, 6]))
                    .unwrap();
            let mut stored = Vec::new();
            for i in 0..200 {
                let item = format!("k{}", i);
                match cf.add(item.as_bytes()) {
                    Ok(()) => stored.push(item),
                    Err(_) => break,
                }
            }
            (cf, stored)
        };

        let (a, stored) = fill();
        let (b, _) = fill();
        assert_eq!(a.buckets, b.buckets);
        assert_eq!(a.count(), stored.len() as u64);
        // Evictions never lose an item
        assert!(stored.iter().all(|i| a.exists(i.as_bytes())));
    }
}
