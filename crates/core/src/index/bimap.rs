//! Two-directional key ↔ values index kept as exact inverses.

use std::collections::{BTreeMap, BTreeSet};

use super::sets::SetView;

/// Maps each key to a sorted set of values and each value back to the
/// sorted set of keys holding it.
///
/// Invariant: `v ∈ get(k)` iff `k ∈ invert(v)`. Every mutation leaves both
/// directions consistent before returning.
#[derive(Debug, Clone)]
pub struct BimapIndex<K, V> {
    forward: BTreeMap<K, BTreeSet<V>>,
    inverse: BTreeMap<V, BTreeSet<K>>,
}

impl<K, V> Default for BimapIndex<K, V> {
    fn default() -> Self {
        Self { forward: BTreeMap::new(), inverse: BTreeMap::new() }
    }
}

impl<K: Ord + Clone, V: Ord + Clone> BimapIndex<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values associated with `key`.
    pub fn get(&self, key: &K) -> SetView<'_, V> {
        SetView::new(self.forward.get(key))
    }

    /// Keys associated with `value`.
    pub fn invert(&self, value: &V) -> SetView<'_, K> {
        SetView::new(self.inverse.get(value))
    }

    /// Replace the full value set of `key`.
    ///
    /// Values dropped since the previous call lose `key` from their inverse
    /// bucket; values kept across calls are left untouched. An empty value
    /// set removes the key.
    pub fn set<I>(&mut self, key: K, values: I)
    where
        I: IntoIterator<Item = V>,
    {
        let next: BTreeSet<V> = values.into_iter().collect();
        if next.is_empty() {
            self.delete(&key);
            return;
        }

        let Self { forward, inverse } = self;
        if let Some(previous) = forward.get(&key) {
            for stale in previous.difference(&next) {
                detach(inverse, stale, &key);
            }
        }

        for value in &next {
            inverse.entry(value.clone()).or_default().insert(key.clone());
        }
        forward.insert(key, next);
    }

    /// Remove `key` and scrub it from every inverse bucket.
    ///
    /// Returns whether the key had any values.
    pub fn delete(&mut self, key: &K) -> bool {
        let Some(values) = self.forward.remove(key) else {
            return false;
        };

        for value in &values {
            detach(&mut self.inverse, value, key);
        }
        true
    }

    /// Move every association of `old` to `new`, replacing whatever `new`
    /// held before.
    ///
    /// Returns false (and changes nothing) if `old` has no values.
    pub fn rename(&mut self, old: &K, new: K) -> bool {
        if !self.forward.contains_key(old) {
            return false;
        }
        if *old == new {
            return true;
        }

        self.delete(&new);
        let Some(values) = self.forward.remove(old) else {
            return false;
        };

        for value in &values {
            if let Some(keys) = self.inverse.get_mut(value) {
                keys.remove(old);
                keys.insert(new.clone());
            }
        }
        self.forward.insert(new, values);
        true
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.inverse.clear();
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    /// Keys with at least one value, in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.forward.keys()
    }

    /// Values held by at least one key, in order, with their keys.
    pub fn inverse_entries(&self) -> impl Iterator<Item = (&V, SetView<'_, K>)> {
        self.inverse.iter().map(|(value, keys)| (value, SetView::new(Some(keys))))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Number of distinct values.
    pub fn value_count(&self) -> usize {
        self.inverse.len()
    }
}

fn detach<K: Ord, V: Ord>(inverse: &mut BTreeMap<V, BTreeSet<K>>, value: &V, key: &K) {
    if let Some(keys) = inverse.get_mut(value) {
        keys.remove(key);
        if keys.is_empty() {
            inverse.remove(value);
        }
    }
}
