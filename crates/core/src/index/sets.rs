//! Set algebra over identifier sets, plus the shared empty sentinel.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use super::types::{DocId, IdSet};

/// Process-wide empty identifier set returned by lookups that miss.
pub static EMPTY_IDS: IdSet = BTreeSet::new();

/// Intersect any number of sets.
///
/// Zero inputs yield the empty set and a single input is returned borrowed.
/// Otherwise only the smallest set is iterated, each element probed against
/// the others until the first miss, so the cost is bounded by the smallest
/// input rather than the sum of all of them.
pub fn intersect<'a, T: Ord + Clone>(sets: &[&'a BTreeSet<T>]) -> Cow<'a, BTreeSet<T>> {
    match sets {
        [] => Cow::Owned(BTreeSet::new()),
        [only] => Cow::Borrowed(*only),
        _ => {
            let mut ordered = sets.to_vec();
            ordered.sort_by_key(|set| set.len());
            let (smallest, rest) = ordered.split_at(1);
            Cow::Owned(
                smallest[0]
                    .iter()
                    .filter(|item| rest.iter().all(|set| set.contains(*item)))
                    .cloned()
                    .collect(),
            )
        }
    }
}

/// Every element of both inputs, as a new set.
pub fn union<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    let (large, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = large.clone();
    out.extend(small.iter().cloned());
    out
}

/// Elements of `universe` that are not in `excluded`.
pub fn difference<T: Ord + Clone>(universe: &BTreeSet<T>, excluded: &BTreeSet<T>) -> BTreeSet<T> {
    universe.iter().filter(|item| !excluded.contains(*item)).cloned().collect()
}

/// A borrowed, read-only view of a set owned by an index.
///
/// Lookups that miss return an empty view without allocating; the only way
/// to get a mutable set out of a view is to copy it with [`SetView::to_set`].
pub struct SetView<'a, T> {
    inner: Option<&'a BTreeSet<T>>,
}

impl<'a, T: Ord> SetView<'a, T> {
    pub(crate) fn new(inner: Option<&'a BTreeSet<T>>) -> Self {
        Self { inner: inner.filter(|set| !set.is_empty()) }
    }

    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn len(&self) -> usize {
        self.inner.map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.inner.is_some_and(|set| set.contains(item))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + 'a {
        self.inner.into_iter().flatten()
    }

    pub fn to_set(&self) -> BTreeSet<T>
    where
        T: Clone,
    {
        self.inner.cloned().unwrap_or_default()
    }
}

impl<'a> SetView<'a, DocId> {
    /// The viewed identifiers, or the shared empty sentinel.
    pub fn ids(&self) -> &'a IdSet {
        self.inner.unwrap_or(&EMPTY_IDS)
    }
}

impl<T> Clone for SetView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SetView<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for SetView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(set) => f.debug_set().entries(set.iter()).finish(),
            None => f.debug_set().finish(),
        }
    }
}

impl<T: Ord> PartialEq<BTreeSet<T>> for SetView<'_, T> {
    fn eq(&self, other: &BTreeSet<T>) -> bool {
        match self.inner {
            Some(set) => set == other,
            None => other.is_empty(),
        }
    }
}
