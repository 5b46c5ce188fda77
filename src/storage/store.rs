use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::Ref;

use super::types::DataType;
use crate::config::EngineConfig;

/// Keyspace: every named value, in a sharded concurrent map.
/// Operations on one key serialize on that key's shard.
///
/// Type-specific operations are implemented in separate modules under `ops/`
pub struct Store {
    pub(crate) data: DashMap<Bytes, DataType>,
    config: EngineConfig,
}

impl Store {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a store whose lazily created values follow `config`
    pub fn with_config(config: EngineConfig) -> Self {
        let shard_count = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4)
            .clamp(4, 64)
            .next_power_of_two();

        Self {
            data: DashMap::with_shard_amount(shard_count),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==================== Core Generic Operations ====================

    #[inline]
    pub fn exists(&self, key: &[u8]) -> bool {
        self.data.contains_key(key)
    }

    /// Delete a key, returns true if it existed
    #[inline]
    pub fn del(&self, key: &[u8]) -> bool {
        self.data.remove(key).is_some()
    }

    /// TYPE name of the value under `key`
    pub fn key_type(&self, key: &[u8]) -> Option<&'static str> {
        self.data.get(key).map(|v| v.type_name())
    }

    /// Number of keys
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ==================== Internal helpers ====================

    #[inline]
    pub(crate) fn data_get(&self, key: &[u8]) -> Option<Ref<'_, Bytes, DataType>> {
        self.data.get(key)
    }

    #[inline]
    pub(crate) fn data_entry(&self, key: &Bytes) -> Entry<'_, Bytes, DataType> {
        self.data.entry(key.clone())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
