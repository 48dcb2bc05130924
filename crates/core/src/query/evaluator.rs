//! Evaluates query trees against an [`IndexStore`].
//!
//! Each COMPARE node is answered from the most specific index available and
//! falls back to scanning materialised documents otherwise, so indexing only
//! ever changes how fast a query runs, never what it returns.

use std::borrow::Cow;
use std::ops::Bound;
use std::time::Instant;

use super::tree::{CompareOp, QueryTree};
use crate::index::sets::{difference, intersect, union};
use crate::index::{DocumentKind, IdSet, IndexStore, Namespace};
use crate::literal::Literal;

/// Outcome of evaluating one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub results: IdSet,
    pub duration_ms: f64,
}

/// Keys answered by dedicated indexes rather than a [`FieldIndex`].
///
/// [`FieldIndex`]: crate::index::FieldIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImplicitKey {
    Tags,
    Links,
    Kind,
    Folder,
}

impl ImplicitKey {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "$tags" | "tag" | "tags" => Some(Self::Tags),
            "$links" | "link" | "links" => Some(Self::Links),
            "$kind" | "kind" => Some(Self::Kind),
            "$folder" | "folder" => Some(Self::Folder),
            _ => None,
        }
    }

    /// Field consulted when this key falls back to a scan.
    fn scan_field(&self) -> &'static str {
        match self {
            Self::Tags => "$tags",
            Self::Links => "$links",
            Self::Kind => "$kind",
            Self::Folder => "$path",
        }
    }
}

/// Borrowing evaluator over one store.
pub struct Evaluator<'s, N> {
    store: &'s IndexStore<N>,
}

impl<'s, N: Namespace> Evaluator<'s, N> {
    pub fn new(store: &'s IndexStore<N>) -> Self {
        Self { store }
    }

    /// Evaluate `query`, timing the run.
    pub fn run(&self, query: &QueryTree) -> QueryResult {
        let start = Instant::now();
        let results = self.evaluate(query).into_owned();
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::debug!("query {} matched {} ids in {:.3}ms", query, results.len(), duration_ms);
        QueryResult { results, duration_ms }
    }

    /// Evaluate a subtree, borrowing index sets where no copy is needed.
    pub fn evaluate(&self, query: &QueryTree) -> Cow<'s, IdSet> {
        match query {
            QueryTree::And(children) => self.evaluate_and(children),
            QueryTree::Or(children) => self.evaluate_or(children),
            QueryTree::Not(child) => {
                let excluded = self.evaluate(child);
                Cow::Owned(difference(self.store.universe(), &excluded))
            }
            QueryTree::Compare { key, op, value } => self.evaluate_compare(key, *op, value),
        }
    }

    fn evaluate_and(&self, children: &[QueryTree]) -> Cow<'s, IdSet> {
        let mut results: Vec<Cow<'s, IdSet>> = Vec::with_capacity(children.len());
        for child in children {
            let result = self.evaluate(child);
            // Nothing can survive an empty conjunct.
            if result.is_empty() {
                return Cow::Owned(IdSet::new());
            }
            results.push(result);
        }

        if results.len() == 1 {
            return results.remove(0);
        }
        let sets: Vec<&IdSet> = results.iter().map(|r| r.as_ref()).collect();
        Cow::Owned(intersect(&sets).into_owned())
    }

    fn evaluate_or(&self, children: &[QueryTree]) -> Cow<'s, IdSet> {
        let mut results = children.iter().map(|child| self.evaluate(child));
        let Some(first) = results.next() else {
            return Cow::Owned(IdSet::new());
        };
        results.fold(first, |acc, next| Cow::Owned(union(&acc, &next)))
    }

    fn evaluate_compare(&self, key: &str, op: CompareOp, value: &Literal) -> Cow<'s, IdSet> {
        match ImplicitKey::from_key(key) {
            Some(implicit) => self.compare_implicit(implicit, op, value),
            None => self.compare_field(key, op, value),
        }
    }

    fn compare_implicit(&self, key: ImplicitKey, op: CompareOp, value: &Literal) -> Cow<'s, IdSet> {
        if op == CompareOp::Eq {
            match (key, value) {
                (ImplicitKey::Tags, Literal::String(tag)) => {
                    return Cow::Borrowed(self.store.tagged(tag).ids());
                }
                (ImplicitKey::Links, Literal::String(target)) => {
                    return Cow::Owned(self.store.backlinks(target));
                }
                (ImplicitKey::Links, Literal::Link(link)) => {
                    return Cow::Owned(self.store.backlinks(&link.path));
                }
                (ImplicitKey::Kind, Literal::String(kind)) => {
                    return match DocumentKind::parse(kind) {
                        Some(kind) => Cow::Borrowed(self.store.kinds().get(&kind)),
                        None => Cow::Owned(IdSet::new()),
                    };
                }
                (ImplicitKey::Folder, Literal::String(folder)) => {
                    return Cow::Owned(self.folder_members(folder));
                }
                _ => {}
            }
        }

        match key {
            ImplicitKey::Tags => Cow::Owned(self.scan_tags(op, value)),
            _ => Cow::Owned(self.scan(self.store.universe(), key.scan_field(), op, value)),
        }
    }

    fn compare_field(&self, key: &str, op: CompareOp, value: &Literal) -> Cow<'s, IdSet> {
        let Some(index) = self.store.field(key) else {
            // Implicit `$` fields and fields nobody has carried yet.
            return Cow::Owned(self.scan(self.store.universe(), key, op, value));
        };

        let indexed = match op {
            CompareOp::Eq => index.equals(value).map(Cow::Borrowed),
            CompareOp::Gt => index.range(Bound::Excluded(value), Bound::Unbounded).map(Cow::Owned),
            CompareOp::Ge => index.range(Bound::Included(value), Bound::Unbounded).map(Cow::Owned),
            CompareOp::Lt => index.range(Bound::Unbounded, Bound::Excluded(value)).map(Cow::Owned),
            CompareOp::Le => index.range(Bound::Unbounded, Bound::Included(value)).map(Cow::Owned),
            CompareOp::Contains => None,
        };

        indexed.unwrap_or_else(|| Cow::Owned(self.scan(index.all(), key, op, value)))
    }

    /// Ids of documents whose file lies under `folder`.
    fn folder_members(&self, folder: &str) -> IdSet {
        let files = self.store.folder().get(folder, None);
        self.store
            .universe()
            .iter()
            .filter(|id| self.store.get(id).is_some_and(|doc| files.contains(&doc.path)))
            .cloned()
            .collect()
    }

    /// Test each candidate's materialised value against the predicate.
    fn scan(&self, candidates: &IdSet, key: &str, op: CompareOp, value: &Literal) -> IdSet {
        candidates
            .iter()
            .filter(|id| {
                self.store
                    .get(id)
                    .and_then(|doc| doc.field(key))
                    .is_some_and(|actual| op.test(&actual, value))
            })
            .cloned()
            .collect()
    }
}

impl<'s, N: Namespace> Evaluator<'s, N> {
    /// Test each document's indexed tags, parents included, so scans agree
    /// with tag `=` lookups.
    fn scan_tags(&self, op: CompareOp, value: &Literal) -> IdSet {
        self.store
            .universe()
            .iter()
            .filter(|id| {
                let tags = self.store.tags().get(*id);
                let tags = Literal::Array(tags.iter().cloned().map(Literal::String).collect());
                op.test(&tags, value)
            })
            .cloned()
            .collect()
    }
}

impl<N: Namespace> IndexStore<N> {
    /// Evaluate a query tree against the current contents of the store.
    pub fn evaluate(&self, query: &QueryTree) -> QueryResult {
        Evaluator::new(self).run(query)
    }
}
