//! Cache collections.
//!
//! A store's payload is either an ordered sequence or a string-keyed mapping.
//! Both kinds share counting and clearing; clearing never changes the kind.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CacheableError, Result};

/// Container kind of a [`Cache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// Ordered sequence of payloads
    Sequence,
    /// String-keyed mapping of payloads
    Mapping,
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKind::Sequence => f.write_str("sequence"),
            CacheKind::Mapping => f.write_str("mapping"),
        }
    }
}

/// Cached payloads held by a store.
///
/// Serializes as a plain JSON array or object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cache<T = serde_json::Value> {
    /// Ordered sequence of payloads
    Sequence(Vec<T>),
    /// String-keyed mapping of payloads
    Mapping(BTreeMap<String, T>),
}

impl<T> Cache<T> {
    /// Creates an empty sequence cache.
    pub fn sequence() -> Self {
        Cache::Sequence(Vec::new())
    }

    /// Creates an empty mapping cache.
    pub fn mapping() -> Self {
        Cache::Mapping(BTreeMap::new())
    }

    /// Returns the container kind.
    pub fn kind(&self) -> CacheKind {
        match self {
            Cache::Sequence(_) => CacheKind::Sequence,
            Cache::Mapping(_) => CacheKind::Mapping,
        }
    }

    /// Number of elements (sequence length or mapping key count).
    pub fn len(&self) -> usize {
        match self {
            Cache::Sequence(items) => items.len(),
            Cache::Mapping(entries) => entries.len(),
        }
    }

    /// Returns true if the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every element, keeping the container kind.
    pub fn clear(&mut self) {
        match self {
            Cache::Sequence(items) => items.clear(),
            Cache::Mapping(entries) => entries.clear(),
        }
    }

    /// Returns a new empty cache of the same kind.
    pub fn empty_like(&self) -> Self {
        match self {
            Cache::Sequence(_) => Self::sequence(),
            Cache::Mapping(_) => Self::mapping(),
        }
    }

    /// Appends a payload to a sequence cache.
    ///
    /// # Errors
    /// Returns `KindMismatch` on a mapping cache.
    pub fn push(&mut self, value: T) -> Result<()> {
        match self {
            Cache::Sequence(items) => {
                items.push(value);
                Ok(())
            }
            Cache::Mapping(_) => Err(CacheableError::KindMismatch {
                expected: CacheKind::Sequence,
                actual: CacheKind::Mapping,
            }),
        }
    }

    /// Inserts a payload into a mapping cache, returning any previous value.
    ///
    /// # Errors
    /// Returns `KindMismatch` on a sequence cache.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Result<Option<T>> {
        match self {
            Cache::Mapping(entries) => Ok(entries.insert(key.into(), value)),
            Cache::Sequence(_) => Err(CacheableError::KindMismatch {
                expected: CacheKind::Mapping,
                actual: CacheKind::Sequence,
            }),
        }
    }

    /// Returns the payloads if this is a sequence cache.
    pub fn as_sequence(&self) -> Option<&[T]> {
        match self {
            Cache::Sequence(items) => Some(items),
            Cache::Mapping(_) => None,
        }
    }

    /// Returns the entries if this is a mapping cache.
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, T>> {
        match self {
            Cache::Mapping(entries) => Some(entries),
            Cache::Sequence(_) => None,
        }
    }
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::sequence()
    }
}

impl<T> From<Vec<T>> for Cache<T> {
    fn from(items: Vec<T>) -> Self {
        Cache::Sequence(items)
    }
}

impl<T> From<BTreeMap<String, T>> for Cache<T> {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Cache::Mapping(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_empty_sequence() {
        let cache: Cache = Cache::default();
        assert_eq!(cache.kind(), CacheKind::Sequence);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_len_counts_both_kinds() {
        let seq: Cache<u8> = vec![1, 2, 3].into();
        assert_eq!(seq.len(), 3);

        let map: Cache<u8> = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]).into();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_clear_keeps_kind() {
        let mut seq: Cache<u8> = vec![1, 2].into();
        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.kind(), CacheKind::Sequence);

        let mut map: Cache<u8> = BTreeMap::from([("a".to_string(), 1)]).into();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.kind(), CacheKind::Mapping);
    }

    #[test]
    fn test_empty_like() {
        let map: Cache<u8> = BTreeMap::from([("a".to_string(), 1)]).into();
        let empty = map.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.kind(), CacheKind::Mapping);
    }

    #[test]
    fn test_push_and_insert_respect_kind() {
        let mut seq: Cache<u8> = Cache::sequence();
        seq.push(7).unwrap();
        assert_eq!(seq.as_sequence(), Some(&[7u8][..]));
        assert!(matches!(
            seq.insert("a", 1),
            Err(CacheableError::KindMismatch {
                expected: CacheKind::Mapping,
                actual: CacheKind::Sequence,
            })
        ));

        let mut map: Cache<u8> = Cache::mapping();
        assert_eq!(map.insert("a", 1).unwrap(), None);
        assert_eq!(map.insert("a", 2).unwrap(), Some(1));
        assert!(map.push(3).is_err());
        assert_eq!(map.as_mapping().unwrap()["a"], 2);
    }

    #[test]
    fn test_serde_plain_json_shapes() {
        let seq: Cache = serde_json::from_value(json!([1, "two"])).unwrap();
        assert_eq!(seq.kind(), CacheKind::Sequence);
        assert_eq!(seq.len(), 2);

        let map: Cache = serde_json::from_value(json!({ "a": 1 })).unwrap();
        assert_eq!(map.kind(), CacheKind::Mapping);
        assert_eq!(serde_json::to_value(&map).unwrap(), json!({ "a": 1 }));

        let empty: Cache = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.kind(), CacheKind::Mapping);
    }
}
