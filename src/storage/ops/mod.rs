//! Storage operations organized by data type
//!
//! Each module adds the methods for one value type to `Store` through its
//! own `impl Store` block.

pub mod bloom_ops;
pub mod cms_ops;
pub mod cuckoo_ops;
pub mod list_ops;
