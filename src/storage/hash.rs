//! Seeded MurmurHash3 primitives shared by the probabilistic structures
//!
//! - `hash128`: x64 128-bit variant, split into two 64-bit lanes for
//!   double hashing (Bloom probes, cuckoo index + fingerprint)
//! - `hash32`: x86 32-bit variant, one seed per Count-Min row and for the
//!   cuckoo alternate-bucket offset

use murmur3::{murmur3_32, murmur3_x64_128};

/// Seed used by the Bloom and Cuckoo filters for the 128-bit item hash
pub const DEFAULT_SEED: u32 = 0x9747_b28c;

/// Two independent 64-bit lanes of a 128-bit hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashValue {
    /// Low 64 bits (h1)
    pub x: u64,
    /// High 64 bits (h2)
    pub y: u64,
}

/// MurmurHash3 x64 128-bit of `data`
#[inline]
pub fn hash128(data: &[u8], seed: u32) -> HashValue {
    let mut src = data;
    // Reading from an in-memory slice cannot fail
    let h = murmur3_x64_128(&mut src, seed).unwrap_or_default();
    HashValue {
        x: h as u64,
        y: (h >> 64) as u64,
    }
}

/// MurmurHash3 x86 32-bit of `data`
#[inline]
pub fn hash32(data: &[u8], seed: u32) -> u32 {
    let mut src = data;
    murmur3_32(&mut src, seed).unwrap_or_default()
}
