//! Cuckoo Filter storage operations
//!
//! Implements CF.* commands for probabilistic set membership with deletion support.

use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::storage::cuckoofilter::{CuckooFilter, CuckooFilterInfo};
use crate::storage::{DataType, Store};

impl Store {
    /// CF.RESERVE - Create an empty filter; fails if the key exists
    pub fn cf_reserve(&self, key: &Bytes, error_rate: f64, capacity: u64) -> Result<()> {
        match self.data_entry(key) {
            Entry::Occupied(_) => Err(Error::KeyExists),
            Entry::Vacant(e) => {
                let cf = CuckooFilter::new(error_rate, capacity)?;
                info!(
                    "cuckoo filter reserved (capacity={}, error_rate={})",
                    capacity, error_rate
                );
                e.insert(DataType::CuckooFilter(Box::new(cf)));
                Ok(())
            }
        }
    }

    /// Run `f` against the filter under `key`, creating one with the
    /// configured defaults if the key is absent
    fn with_cuckoofilter<T>(
        &self,
        key: &Bytes,
        f: impl FnOnce(&mut CuckooFilter) -> Result<T>,
    ) -> Result<T> {
        let result = match self.data_entry(key) {
            Entry::Occupied(mut e) => match e.get_mut().as_cuckoofilter_mut() {
                Some(cf) => f(cf),
                None => return Err(Error::WrongType),
            },
            Entry::Vacant(e) => {
                let config = self.config();
                debug!("creating cuckoo filter with default parameters");
                let mut cf =
                    CuckooFilter::new(config.cf_default_error_rate, config.cf_default_capacity)?;
                let result = f(&mut cf);
                e.insert(DataType::CuckooFilter(Box::new(cf)));
                result
            }
        };

        if let Err(Error::CapacityExceeded) = result {
            warn!("cuckoo filter is full, reserve a larger one");
        }
        result
    }

    /// CF.ADD
    pub fn cf_add(&self, key: &Bytes, item: &[u8]) -> Result<()> {
        self.with_cuckoofilter(key, |cf| cf.add(item))
    }

    /// CF.ADDNX - Returns false if the item was already present
    pub fn cf_addnx(&self, key: &Bytes, item: &[u8]) -> Result<bool> {
        self.with_cuckoofilter(key, |cf| cf.add_nx(item))
    }

    /// CF.EXISTS - False for a missing key
    pub fn cf_exists(&self, key: &[u8], item: &[u8]) -> Result<bool> {
        match self.data_get(key) {
            Some(value) => match value.as_cuckoofilter() {
                Some(cf) => Ok(cf.exists(item)),
                None => Err(Error::WrongType),
            },
            None => Ok(false),
        }
    }

    /// CF.MEXISTS
    pub fn cf_mexists<T: AsRef<[u8]>>(&self, key: &[u8], items: &[T]) -> Result<Vec<bool>> {
        match self.data_get(key) {
            Some(value) => match value.as_cuckoofilter() {
                Some(cf) => Ok(cf.mexists(items)),
                None => Err(Error::WrongType),
            },
            None => Ok(vec![false; items.len()]),
        }
    }

    /// CF.DEL - Remove one occurrence; false if not found or key missing
    pub fn cf_del(&self, key: &[u8], item: &[u8]) -> Result<bool> {
        match self.data.get_mut(key) {
            Some(mut value) => match value.as_cuckoofilter_mut() {
                Some(cf) => Ok(cf.remove(item)),
                None => Err(Error::WrongType),
            },
            None => Ok(false),
        }
    }

    /// CF.INFO
    pub fn cf_info(&self, key: &[u8]) -> Result<CuckooFilterInfo> {
        let value = self.data_get(key).ok_or(Error::NoSuchKey)?;
        value
            .as_cuckoofilter()
            .map(CuckooFilter::info)
            .ok_or(Error::WrongType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_exists_del() {
        let store = Store::new();
        let key = Bytes::from_static(b"cf");

        for i in 0..100 {
            store.cf_add(&key, format!("item{}", i).as_bytes()).unwrap();
        }
        for i in 0..100 {
            assert!(store.cf_exists(&key, format!("item{}", i).as_bytes()).unwrap());
        }

        assert!(store.cf_del(&key, b"item7").unwrap());
        assert!(!store.cf_exists(&key, b"item7").unwrap());
        assert_eq!(store.cf_info(&key).unwrap().items, 99);
        assert_eq!(store.cf_info(&key).unwrap().capacity, 128);
    }

    #[test]
    fn test_addnx_and_missing_key() {
        let store = Store::new();
        let key = Bytes::from_static(b"cf");
        assert!(!store.cf_del(&key, b"a").unwrap());
        assert_eq!(store.cf_mexists(&key, &["a", "b"]).unwrap(), vec![false, false]);
        assert!(matches!(store.cf_info(&key), Err(Error::NoSuchKey)));

        assert!(store.cf_addnx(&key, b"a").unwrap());
        assert!(!store.cf_addnx(&key, b"a").unwrap());
        assert_eq!(store.cf_info(&key).unwrap().items, 1);
    }

    #[test]
    fn test_reserve_and_full() {
        let store = Store::new();
        let key = Bytes::from_static(b"tiny");
        store.cf_reserve(&key, 0.01, 1).unwrap();
        assert!(matches!(store.cf_reserve(&key, 0.01, 1), Err(Error::KeyExists)));

        let mut full = false;
        for i in 0..64 {
            match store.cf_add(&key, format!("x{}", i).as_bytes()) {
                Ok(()) => {}
                Err(Error::CapacityExceeded) => {
                    full = true;
                    break;
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert!(full);
        assert_eq!(store.cf_info(&key).unwrap().items, 4);
    }
}
