//! Count-Min Sketch storage operations
//!
//! Implements CMS.* commands for frequency estimation. A sketch must be
//! created with CMS.INITBYDIM or CMS.INITBYPROB before it is updated.

use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use log::info;

use crate::error::{Error, Result};
use crate::storage::cms::{CMSInfo, CountMinSketch};
use crate::storage::{DataType, Store};

impl Store {
    fn cms_insert_new(
        &self,
        key: &Bytes,
        build: impl FnOnce() -> Result<CountMinSketch>,
    ) -> Result<()> {
        match self.data_entry(key) {
            Entry::Occupied(_) => Err(Error::KeyExists),
            Entry::Vacant(e) => {
                let cms = build()?;
                info!(
                    "count-min sketch created ({} rows x {} columns)",
                    cms.rows(),
                    cms.columns()
                );
                e.insert(DataType::CountMinSketch(Box::new(cms)));
                Ok(())
            }
        }
    }

    /// CMS.INITBYDIM - Create a sketch with explicit dimensions
    pub fn cms_init_by_dim(&self, key: &Bytes, rows: usize, columns: usize) -> Result<()> {
        self.cms_insert_new(key, || CountMinSketch::new(rows, columns))
    }

    /// CMS.INITBYPROB - Create a sketch from error bound and probability
    pub fn cms_init_by_prob(&self, key: &Bytes, error_rate: f64, probability: f64) -> Result<()> {
        self.cms_insert_new(key, || CountMinSketch::from_error_prob(error_rate, probability))
    }

    /// CMS.INCRBY - Apply (item, increment) pairs, returning each item's
    /// estimate after its update
    pub fn cms_incrby<T: AsRef<[u8]>>(
        &self,
        key: &[u8],
        pairs: &[(T, u64)],
    ) -> Result<Vec<u64>> {
        let mut value = self.data.get_mut(key).ok_or(Error::NoSuchKey)?;
        let cms = value.as_cms_mut().ok_or(Error::WrongType)?;
        Ok(pairs
            .iter()
            .map(|(item, delta)| cms.incr_by(item.as_ref(), *delta))
            .collect())
    }

    /// CMS.QUERY
    pub fn cms_query<T: AsRef<[u8]>>(&self, key: &[u8], items: &[T]) -> Result<Vec<u64>> {
        let value = self.data_get(key).ok_or(Error::NoSuchKey)?;
        let cms = value.as_cms().ok_or(Error::WrongType)?;
        Ok(items.iter().map(|item| cms.estimate(item.as_ref())).collect())
    }

    /// CMS.INFO
    pub fn cms_info(&self, key: &[u8]) -> Result<CMSInfo> {
        let value = self.data_get(key).ok_or(Error::NoSuchKey)?;
        value.as_cms().map(CountMinSketch::info).ok_or(Error::WrongType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incrby_requires_init() {
        let store = Store::new();
        let key = Bytes::from_static(b"cms");
        assert!(matches!(
            store.cms_incrby(&key, &[("x", 1)]),
            Err(Error::NoSuchKey)
        ));
        assert!(!store.exists(&key));
    }

    #[test]
    fn test_incrby_query() {
        let store = Store::new();
        let key = Bytes::from_static(b"cms");
        store.cms_init_by_dim(&key, 5, 100).unwrap();
        assert!(matches!(store.cms_init_by_dim(&key, 5, 100), Err(Error::KeyExists)));

        assert_eq!(store.cms_incrby(&key, &[("x", 5)]).unwrap(), vec![5]);
        let after = store.cms_incrby(&key, &[("x", 3), ("y", 1)]).unwrap();
        assert!(after[0] >= 8);

        let estimates = store.cms_query(&key, &["x", "y", "z"]).unwrap();
        assert!(estimates[0] >= 8);
        assert!(estimates[1] >= 1);

        assert_eq!(
            store.cms_info(&key).unwrap(),
            CMSInfo {
                rows: 5,
                columns: 100,
                count: 9
            }
        );
    }

    #[test]
    fn test_init_by_prob() {
        let store = Store::new();
        let key = Bytes::from_static(b"cms");
        assert!(matches!(
            store.cms_init_by_prob(&key, 0.01, 0.0),
            Err(Error::Config(_))
        ));
        store.cms_init_by_prob(&key, 0.01, 0.01).unwrap();
        let info = store.cms_info(&key).unwrap();
        assert_eq!((info.rows, info.columns), (272, 5));
    }
}
