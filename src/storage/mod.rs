//! Storage layer module
//!
//! The value types (listpack-backed lists and the probabilistic filters),
//! the keyspace `Store` that owns them, and the per-type operations.
//! Operations are organized into separate modules by data type under `ops/`.

pub mod backlen;
pub mod bloomfilter;
pub mod cms;
pub mod cuckoofilter;
pub mod hash;
pub mod listpack;
pub mod quicklist;

mod store;
mod types;

// Import all operation modules - each adds methods to Store via impl blocks
pub mod ops;

pub use store::Store;
pub use types::DataType;

pub use bloomfilter::{BloomFilter, BloomFilterInfo};
pub use cms::{CMSInfo, CountMinSketch};
pub use cuckoofilter::{CuckooFilter, CuckooFilterInfo, EvictionRng};
pub use listpack::{Listpack, ListpackValue};
pub use quicklist::{List, QuickList};
