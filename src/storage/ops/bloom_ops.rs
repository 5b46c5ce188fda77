//! Bloom Filter storage operations
//!
//! Implements BF.* commands. BF.ADD and BF.MADD create a filter with the
//! configured defaults when the key is absent.

use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use log::{debug, info};

use crate::error::{Error, Result};
use crate::storage::bloomfilter::{BloomFilter, BloomFilterInfo};
use crate::storage::{DataType, Store};

impl Store {
    /// BF.RESERVE - Create an empty filter; fails if the key exists
    pub fn bf_reserve(&self, key: &Bytes, error_rate: f64, capacity: u64) -> Result<()> {
        match self.data_entry(key) {
            Entry::Occupied(_) => Err(Error::KeyExists),
            Entry::Vacant(e) => {
                let bf = BloomFilter::new(capacity, error_rate)?;
                info!(
                    "bloom filter reserved (capacity={}, error_rate={})",
                    capacity, error_rate
                );
                e.insert(DataType::BloomFilter(Box::new(bf)));
                Ok(())
            }
        }
    }

    fn default_bloomfilter(&self) -> Result<BloomFilter> {
        let config = self.config();
        debug!("creating bloom filter with default parameters");
        BloomFilter::new(config.bf_default_capacity, config.bf_default_error_rate)
    }

    /// BF.ADD - Returns true if the item was not already present
    pub fn bf_add(&self, key: &Bytes, item: &[u8]) -> Result<bool> {
        self.bf_madd(key, &[item]).map(|added| added[0])
    }

    /// BF.MADD - One flag per item, true where the item was new
    pub fn bf_madd<T: AsRef<[u8]>>(&self, key: &Bytes, items: &[T]) -> Result<Vec<bool>> {
        match self.data_entry(key) {
            Entry::Occupied(mut e) => match e.get_mut().as_bloomfilter_mut() {
                Some(bf) => Ok(items.iter().map(|item| bf.add(item.as_ref())).collect()),
                None => Err(Error::WrongType),
            },
            Entry::Vacant(e) => {
                let mut bf = self.default_bloomfilter()?;
                let results = items.iter().map(|item| bf.add(item.as_ref())).collect();
                e.insert(DataType::BloomFilter(Box::new(bf)));
                Ok(results)
            }
        }
    }

    /// BF.EXISTS - False for a missing key
    pub fn bf_exists(&self, key: &[u8], item: &[u8]) -> Result<bool> {
        match self.data_get(key) {
            Some(value) => match value.as_bloomfilter() {
                Some(bf) => Ok(bf.exists(item)),
                None => Err(Error::WrongType),
            },
            None => Ok(false),
        }
    }

    /// BF.MEXISTS
    pub fn bf_mexists<T: AsRef<[u8]>>(&self, key: &[u8], items: &[T]) -> Result<Vec<bool>> {
        match self.data_get(key) {
            Some(value) => match value.as_bloomfilter() {
                Some(bf) => Ok(bf.mexists(items)),
                None => Err(Error::WrongType),
            },
            None => Ok(vec![false; items.len()]),
        }
    }

    /// BF.INFO
    pub fn bf_info(&self, key: &[u8]) -> Result<BloomFilterInfo> {
        let value = self.data_get(key).ok_or(Error::NoSuchKey)?;
        value
            .as_bloomfilter()
            .map(BloomFilter::info)
            .ok_or(Error::WrongType)
    }

    /// BF.CARD - 0 for a missing key
    pub fn bf_card(&self, key: &[u8]) -> Result<u64> {
        match self.data_get(key) {
            Some(value) => value
                .as_bloomfilter()
                .map(BloomFilter::card)
                .ok_or(Error::WrongType),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_lazy_create_uses_config() {
        let store = Store::with_config(EngineConfig {
            bf_default_capacity: 1000,
            ..EngineConfig::default()
        });
        let key = Bytes::from_static(b"bf");

        assert!(store.bf_add(&key, b"foo").unwrap());
        assert!(!store.bf_add(&key, b"foo").unwrap());
        assert!(store.bf_exists(&key, b"foo").unwrap());
        assert_eq!(store.bf_card(&key).unwrap(), 1);
        assert_eq!(store.bf_info(&key).unwrap().capacity, 1000);
    }

    #[test]
    fn test_reserve() {
        let store = Store::new();
        let key = Bytes::from_static(b"bf");
        store.bf_reserve(&key, 0.001, 500).unwrap();
        assert!(matches!(store.bf_reserve(&key, 0.01, 10), Err(Error::KeyExists)));
        assert!(matches!(
            store.bf_reserve(&Bytes::from_static(b"bad"), 2.0, 10),
            Err(Error::Config(_))
        ));
        assert!(!store.exists(b"bad"));

        let info = store.bf_info(&key).unwrap();
        assert_eq!(info.capacity, 500);
        assert_eq!(info.error_rate, 0.001);
        assert_eq!(info.items, 0);
    }

    #[test]
    fn test_madd_mexists_and_missing_key() {
        let store = Store::new();
        let key = Bytes::from_static(b"bf");
        assert_eq!(store.bf_mexists(&key, &["a"]).unwrap(), vec![false]);
        assert_eq!(store.bf_card(&key).unwrap(), 0);
        assert!(matches!(store.bf_info(&key), Err(Error::NoSuchKey)));

        assert_eq!(store.bf_madd(&key, &["a", "b", "a"]).unwrap(), vec![true, true, false]);
        assert_eq!(store.bf_mexists(&key, &["a", "b"]).unwrap(), vec![true, true]);
    }

    #[test]
    fn test_wrong_type() {
        let store = Store::new();
        let key = Bytes::from_static(b"list");
        store.rpush(&key, &[Bytes::from_static(b"x")]).unwrap();
        assert!(matches!(store.bf_add(&key, b"x"), Err(Error::WrongType)));
        assert!(matches!(store.bf_exists(&key, b"x"), Err(Error::WrongType)));
    }
}
