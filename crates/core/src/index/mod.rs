//! In-memory indexes over documents and the store that keeps them in sync.
//!
//! This module provides:
//! - [`InvertedIndex`]: value → ids, for single-valued attributes like kind
//! - [`BimapIndex`]: id ↔ values in both directions, for tags and links
//! - [`FieldIndex`]: per-field presence with optional ordered value lookups
//! - [`FolderIndex`]: prefix queries over a live [`Namespace`]
//!
//! # Example
//!
//! ```
//! use mdquery_core::index::{Document, IndexStore};
//! use mdquery_core::query::QueryTree;
//!
//! let mut store = IndexStore::default();
//! store.add_or_update(Document::page("p1.md").with_tags(["#a", "#b"]));
//! store.add_or_update(Document::page("p2.md").with_tags(["#b"]));
//!
//! let result = store.evaluate(&QueryTree::eq("tag", "#a"));
//! assert_eq!(result.results.len(), 1);
//! ```

pub mod bimap;
pub mod field;
pub mod folder;
pub mod inverted;
pub mod sets;
pub mod store;
pub mod types;

pub use bimap::BimapIndex;
pub use field::FieldIndex;
pub use folder::{FolderIndex, MemoryNamespace, Namespace, NamespaceEntry, PathFilter};
pub use inverted::InvertedIndex;
pub use sets::{EMPTY_IDS, SetView, difference, intersect, union};
pub use store::{FieldPolicy, IndexStore, normalize_link_target, normalize_tag, tag_hierarchy};
pub use types::{DocId, Document, DocumentKind, IdSet, field_key};
