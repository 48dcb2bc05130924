//! One-directional value → identifiers index.

use std::collections::HashMap;
use std::hash::Hash;

use super::sets::EMPTY_IDS;
use super::types::IdSet;

/// Maps each value to the set of ids holding it.
///
/// Values are matched by structural equality; there is no ordering and no
/// reverse map, so callers must pass the same values to [`delete`] that they
/// passed to [`set`].
///
/// [`set`]: InvertedIndex::set
/// [`delete`]: InvertedIndex::delete
#[derive(Debug, Clone)]
pub struct InvertedIndex<V> {
    buckets: HashMap<V, IdSet>,
}

impl<V> Default for InvertedIndex<V> {
    fn default() -> Self {
        Self { buckets: HashMap::new() }
    }
}

impl<V: Hash + Eq + Clone> InvertedIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` to the bucket of every value, creating buckets as needed.
    pub fn set<I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = V>,
    {
        for value in values {
            self.buckets.entry(value).or_default().insert(key.to_string());
        }
    }

    /// Ids holding `value`; empty when nothing does.
    pub fn get(&self, value: &V) -> &IdSet {
        self.buckets.get(value).unwrap_or(&EMPTY_IDS)
    }

    /// Remove `key` from each named bucket, dropping buckets left empty.
    pub fn delete<'v, I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = &'v V>,
        V: 'v,
    {
        for value in values {
            if let Some(bucket) = self.buckets.get_mut(value) {
                bucket.remove(key);
                if bucket.is_empty() {
                    self.buckets.remove(value);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Number of distinct values with at least one id.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.buckets.keys()
    }
}
