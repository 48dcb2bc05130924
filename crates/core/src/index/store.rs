//! The owning store: applies documents to every index through one writer path.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::bimap::BimapIndex;
use super::field::FieldIndex;
use super::folder::{FolderIndex, MemoryNamespace, Namespace};
use super::inverted::InvertedIndex;
use super::sets::SetView;
use super::types::{DocId, Document, DocumentKind, IdSet, field_key};
use crate::config::types::IndexConfig;

/// Decides, per field name, whether a [`FieldIndex`] keeps a value map.
///
/// Value maps make `=` and range comparisons cheap at the cost of memory, so
/// they are reserved for fields that are compared often (dates, mostly).
#[derive(Debug, Clone)]
pub struct FieldPolicy {
    value_indexed: HashSet<String>,
    index_all: bool,
}

impl FieldPolicy {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            value_indexed: fields.into_iter().map(|f| f.as_ref().to_lowercase()).collect(),
            index_all: false,
        }
    }

    /// Keep value maps for every field.
    pub fn all() -> Self {
        Self { value_indexed: HashSet::new(), index_all: true }
    }

    /// Keep value maps for no field.
    pub fn none() -> Self {
        Self { value_indexed: HashSet::new(), index_all: false }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        let mut policy = Self::new(&config.value_indexed_fields);
        policy.index_all = config.index_all_values;
        policy
    }

    pub fn indexes_values(&self, field: &str) -> bool {
        self.index_all || self.value_indexed.contains(&field.to_lowercase())
    }
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self::from_config(&IndexConfig::default())
    }
}

/// Lowercase a tag and make sure it starts with `#`.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim().trim_start_matches('#').to_lowercase();
    format!("#{tag}")
}

/// A nested tag and all of its parents: `#a/b` → `#a/b`, `#a`.
pub fn tag_hierarchy(tag: &str) -> impl Iterator<Item = String> + '_ {
    tag.char_indices()
        .filter(|(_, c)| *c == '/')
        .map(|(i, _)| tag[..i].to_string())
        .chain(std::iter::once(tag.to_string()))
}

/// Key under which a link target is indexed: lowercase, no `.md` suffix.
pub fn normalize_link_target(target: &str) -> String {
    let target = target.trim().trim_start_matches('/');
    let target = target.strip_suffix(".md").unwrap_or(target);
    target.to_lowercase()
}

/// In-memory multi-index over every known document.
///
/// Mutations take `&mut self` and reads take `&self`, so a mutation can never
/// interleave with another mutation or with a query on the same store.
#[derive(Debug)]
pub struct IndexStore<N = MemoryNamespace> {
    policy: FieldPolicy,
    documents: HashMap<DocId, Document>,
    universe: IdSet,
    tags: BimapIndex<DocId, String>,
    links: BimapIndex<DocId, String>,
    kinds: InvertedIndex<DocumentKind>,
    fields: HashMap<String, FieldIndex>,
    folder: FolderIndex<N>,
    revision: u64,
}

impl Default for IndexStore<MemoryNamespace> {
    fn default() -> Self {
        Self::new(FieldPolicy::default(), MemoryNamespace::new())
    }
}

impl<N: Namespace> IndexStore<N> {
    pub fn new(policy: FieldPolicy, namespace: N) -> Self {
        Self {
            policy,
            documents: HashMap::new(),
            universe: IdSet::new(),
            tags: BimapIndex::new(),
            links: BimapIndex::new(),
            kinds: InvertedIndex::new(),
            fields: HashMap::new(),
            folder: FolderIndex::new(namespace),
            revision: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Index a document, replacing any previous version with the same id.
    pub fn add_or_update(&mut self, document: Document) {
        let id = document.id.clone();
        let replaced = match self.documents.remove(&id) {
            Some(previous) => {
                self.unindex_values(&previous);
                true
            }
            None => false,
        };

        self.tags.set(
            id.clone(),
            document.tags.iter().flat_map(|t| {
                let tag = normalize_tag(t);
                tag_hierarchy(&tag).collect::<Vec<_>>()
            }),
        );
        self.links.set(id.clone(), document.links.iter().map(|l| normalize_link_target(&l.path)));
        self.index_values(&document);
        self.universe.insert(id.clone());
        tracing::trace!("indexed {} (replaced: {})", id, replaced);
        self.documents.insert(id, document);
        self.revision += 1;
    }

    /// Drop a document from every index. Returns whether it was known.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(previous) = self.documents.remove(id) else {
            return false;
        };

        self.unindex_values(&previous);
        self.tags.delete(&previous.id);
        self.links.delete(&previous.id);
        self.universe.remove(id);
        self.revision += 1;
        tracing::trace!("removed {}", id);
        true
    }

    /// Move a document and all its index entries to a new id.
    ///
    /// Returns false if `old` is unknown or `new` is already taken.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return self.documents.contains_key(old);
        }
        if self.documents.contains_key(new) {
            return false;
        }
        let Some(mut document) = self.documents.remove(old) else {
            return false;
        };

        self.unindex_values(&document);
        let old_id = std::mem::replace(&mut document.id, new.to_string());
        // A record identified by its own path moves with it.
        if document.path == old_id {
            document.path = new.to_string();
        }
        self.tags.rename(&old_id, new.to_string());
        self.links.rename(&old_id, new.to_string());
        self.index_values(&document);

        self.universe.remove(old);
        self.universe.insert(new.to_string());
        self.documents.insert(new.to_string(), document);
        self.revision += 1;
        tracing::trace!("renamed {} -> {}", old, new);
        true
    }

    /// Empty every index, e.g. after a cache invalidation.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.universe.clear();
        self.tags.clear();
        self.links.clear();
        self.kinds.clear();
        self.fields.clear();
        self.revision += 1;
        tracing::debug!("cleared index store");
    }

    fn index_values(&mut self, document: &Document) {
        self.kinds.set(&document.id, [document.kind]);
        for (key, value) in document.field_entries() {
            let index_values = self.policy.indexes_values(&key);
            self.fields
                .entry(key)
                .or_insert_with(|| FieldIndex::new(index_values))
                .add(&document.id, value);
        }
    }

    fn unindex_values(&mut self, document: &Document) {
        self.kinds.delete(&document.id, [&document.kind]);
        for (key, value) in document.field_entries() {
            if let Some(index) = self.fields.get_mut(&key) {
                index.delete(&document.id, value);
                if index.is_empty() {
                    self.fields.remove(&key);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Every known id.
    pub fn universe(&self) -> &IdSet {
        &self.universe
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Bumped on every mutation; lets callers detect stale derived data.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    pub fn tags(&self) -> &BimapIndex<DocId, String> {
        &self.tags
    }

    pub fn links(&self) -> &BimapIndex<DocId, String> {
        &self.links
    }

    pub fn kinds(&self) -> &InvertedIndex<DocumentKind> {
        &self.kinds
    }

    pub fn folder(&self) -> &FolderIndex<N> {
        &self.folder
    }

    pub fn folder_mut(&mut self) -> &mut FolderIndex<N> {
        &mut self.folder
    }

    /// Index for a field, if any document has ever carried it.
    pub fn field(&self, name: &str) -> Option<&FieldIndex> {
        self.fields.get(&field_key(name))
    }

    /// Names of every field currently held by at least one document.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Ids carrying `tag` or any tag nested beneath it.
    pub fn tagged(&self, tag: &str) -> SetView<'_, DocId> {
        self.tags.invert(&normalize_tag(tag))
    }

    /// Number of documents per tag (parents included), in tag order.
    pub fn tag_counts(&self) -> BTreeMap<&str, usize> {
        self.tags.inverse_entries().map(|(tag, ids)| (tag.as_str(), ids.len())).collect()
    }

    /// Ids of documents linking to `target`.
    ///
    /// Links may be written as a full path or as a bare note name. A path
    /// target also matches links to its file stem, and a bare name matches
    /// links to any path ending in that name.
    pub fn backlinks(&self, target: &str) -> IdSet {
        let key = normalize_link_target(target);
        let mut found = self.links.invert(&key).to_set();
        match key.rsplit_once('/') {
            Some((_, stem)) => found.extend(self.links.invert(&stem.to_string()).iter().cloned()),
            None => {
                for (linked, ids) in self.links.inverse_entries() {
                    if linked.rsplit_once('/').is_some_and(|(_, stem)| stem == key) {
                        found.extend(ids.iter().cloned());
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{Link, Literal};

    fn store() -> IndexStore {
        IndexStore::new(FieldPolicy::new(["due"]), MemoryNamespace::new())
    }

    fn ids(items: &[&str]) -> IdSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tag_normalization_and_hierarchy() {
        assert_eq!(normalize_tag("Work/Urgent"), "#work/urgent");
        assert_eq!(normalize_tag("##a"), "#a");
        assert_eq!(
            tag_hierarchy("#a/b/c").collect::<Vec<_>>(),
            vec!["#a".to_string(), "#a/b".to_string(), "#a/b/c".to_string()]
        );
    }

    #[test]
    fn test_link_target_normalization() {
        assert_eq!(normalize_link_target("/Notes/Alpha.md"), "notes/alpha");
        assert_eq!(normalize_link_target("beta"), "beta");
    }

    #[test]
    fn test_add_indexes_everything() {
        let mut store = store();
        store.add_or_update(
            Document::page("p1.md")
                .with_tags(["#project/alpha"])
                .with_link(Link::file("p2"))
                .with_field("due", Literal::from(3.0))
                .with_field("status", "open"),
        );

        assert!(store.contains("p1.md"));
        assert_eq!(store.tagged("#project").ids(), &ids(&["p1.md"]));
        assert_eq!(store.tagged("#project/alpha").ids(), &ids(&["p1.md"]));
        assert_eq!(store.backlinks("p2.md"), ids(&["p1.md"]));
        assert_eq!(store.kinds().get(&DocumentKind::Page), &ids(&["p1.md"]));
        assert!(store.field("due").unwrap().indexes_values());
        assert!(!store.field("STATUS").unwrap().indexes_values());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_update_replaces_previous_values() {
        let mut store = store();
        store.add_or_update(
            Document::page("p1.md").with_tags(["#a"]).with_field("due", 1.0).with_field("old", true),
        );
        store.add_or_update(Document::page("p1.md").with_tags(["#b"]).with_field("due", 2.0));

        assert!(store.tagged("#a").is_empty());
        assert_eq!(store.tagged("#b").ids(), &ids(&["p1.md"]));
        let due = store.field("due").unwrap();
        assert_eq!(due.equals(&Literal::from(1.0)), Some(&IdSet::new()));
        assert_eq!(due.equals(&Literal::from(2.0)), Some(&ids(&["p1.md"])));
        assert!(store.field("old").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = store();
        store.add_or_update(Document::page("p1.md").with_tags(["#a"]).with_field("due", 1.0));
        store.add_or_update(Document::page("p2.md").with_tags(["#a"]));

        assert!(store.remove("p1.md"));
        assert!(!store.remove("p1.md"));
        assert_eq!(store.tagged("#a").ids(), &ids(&["p2.md"]));
        assert!(store.field("due").is_none());
        assert_eq!(store.universe(), &ids(&["p2.md"]));
    }

    #[test]
    fn test_rename_moves_all_entries() {
        let mut store = store();
        store.add_or_update(
            Document::page("old.md").with_tags(["#a"]).with_link(Link::file("x")).with_field("due", 1.0),
        );

        assert!(store.rename("old.md", "new.md"));

        assert!(!store.contains("old.md"));
        assert_eq!(store.get("new.md").unwrap().id, "new.md");
        assert_eq!(store.tagged("#a").ids(), &ids(&["new.md"]));
        assert_eq!(store.backlinks("x"), ids(&["new.md"]));
        assert_eq!(store.field("due").unwrap().all(), &ids(&["new.md"]));
        assert_eq!(store.kinds().get(&DocumentKind::Page), &ids(&["new.md"]));
        assert_eq!(store.universe(), &ids(&["new.md"]));
    }

    #[test]
    fn test_rename_refuses_unknown_or_taken() {
        let mut store = store();
        store.add_or_update(Document::page("a.md"));
        store.add_or_update(Document::page("b.md"));
        assert!(!store.rename("ghost.md", "c.md"));
        assert!(!store.rename("a.md", "b.md"));
        assert!(store.contains("a.md"));
    }

    #[test]
    fn test_clear() {
        let mut store = store();
        store.add_or_update(Document::page("a.md").with_tags(["#a"]).with_field("due", 1.0));
        store.clear();
        assert!(store.is_empty());
        assert!(store.universe().is_empty());
        assert!(store.tags().is_empty());
        assert!(store.field("due").is_none());
    }

    #[test]
    fn test_tag_counts_include_parents() {
        let mut store = store();
        store.add_or_update(Document::page("a.md").with_tags(["#work/x"]));
        store.add_or_update(Document::page("b.md").with_tags(["#work"]));

        let counts = store.tag_counts();
        assert_eq!(counts.get("#work"), Some(&2));
        assert_eq!(counts.get("#work/x"), Some(&1));
    }

    #[test]
    fn test_backlinks_by_stem() {
        let mut store = store();
        store.add_or_update(Document::page("a.md").with_link(Link::file("alpha")));
        store.add_or_update(Document::page("b.md").with_link(Link::file("notes/alpha.md")));
        store.add_or_update(Document::page("c.md").with_link(Link::file("other/alpha")));
        assert_eq!(store.backlinks("notes/alpha.md"), ids(&["a.md", "b.md"]));
        assert_eq!(store.backlinks("alpha"), ids(&["a.md", "b.md", "c.md"]));
        assert_eq!(store.backlinks("Notes/Alpha"), ids(&["a.md", "b.md"]));
    }

    #[test]
    fn test_rename_moves_page_path() {
        let mut store = store();
        store.add_or_update(Document::page("notes/a.md"));
        store.add_or_update(Document::new("notes/a.md#Intro", DocumentKind::Section, "notes/a.md"));

        assert!(store.rename("notes/a.md", "other/a.md"));
        assert_eq!(store.get("other/a.md").unwrap().path, "other/a.md");
        assert_eq!(store.get("notes/a.md#Intro").unwrap().path, "notes/a.md");
    }

    #[test]
    fn test_fields_index_the_value_lookup_returns() {
        let mut store = IndexStore::new(FieldPolicy::all(), MemoryNamespace::new());
        let mut doc = Document::page("p1.md").with_field("Ära", 1.0);
        doc.fields.push(("ÄRA".to_string(), Literal::from(2.0)));
        store.add_or_update(doc);

        let index = store.field("ära").unwrap();
        assert_eq!(index.equals(&Literal::from(1.0)), Some(&ids(&["p1.md"])));
        assert_eq!(index.equals(&Literal::from(2.0)), Some(&IdSet::new()));

        assert!(store.remove("p1.md"));
        assert!(store.field("ära").is_none());
    }

    #[test]
    fn test_default_policy_indexes_dates() {
        let policy = FieldPolicy::default();
        assert!(policy.indexes_values("due"));
        assert!(policy.indexes_values("Completion"));
        assert!(!policy.indexes_values("summary"));
        assert!(FieldPolicy::all().indexes_values("summary"));
        assert!(!FieldPolicy::none().indexes_values("due"));
    }
}
