//! Identifiers and the document record applied to the index store.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::store::normalize_tag;
use crate::literal::{Link, Literal};

/// Opaque identifier naming one indexed record.
pub type DocId = String;

/// Sorted set of identifiers; the result type of every index lookup.
pub type IdSet = BTreeSet<DocId>;

/// Keys answered by [`Document::field`] itself rather than by `fields`.
const IMPLICIT_FIELDS: [&str; 6] = ["$id", "$path", "$file", "$kind", "$tags", "$links"];

/// Canonical form of a field key. Keys compare equal when their Unicode
/// lowercase forms do.
pub fn field_key(key: &str) -> String {
    key.to_lowercase()
}

/// What kind of record a document is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// A whole markdown file.
    #[default]
    Page,
    /// A heading and the content under it.
    Section,
    /// A paragraph-level block.
    Block,
    /// A single list item or task.
    ListItem,
}

impl DocumentKind {
    /// Parse a kind name (case-insensitive, `-`/`_` tolerant).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "page" => Some(Self::Page),
            "section" => Some(Self::Section),
            "block" => Some(Self::Block),
            "listitem" | "task" => Some(Self::ListItem),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
            Self::Block => "block",
            Self::ListItem => "list-item",
        }
    }
}

/// A parsed record as handed to the store by an importer.
///
/// Field keys are matched through [`field_key`]. Setting the same key twice
/// through [`Document::with_field`] keeps the last value; if `fields` is
/// filled directly with duplicate keys, the first one wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    #[serde(default)]
    pub kind: DocumentKind,
    /// Vault-relative path of the file this record lives in.
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub fields: Vec<(String, Literal)>,
}

impl Document {
    pub fn new(id: impl Into<DocId>, kind: DocumentKind, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            path: path.into(),
            tags: Vec::new(),
            links: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// A page record whose id is its path.
    pub fn page(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(path.clone(), DocumentKind::Page, path)
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.set_field(key, value);
        self
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Literal>) {
        let key = key.into();
        let value = value.into();
        let canonical = field_key(&key);
        match self.fields.iter_mut().find(|(k, _)| field_key(k) == canonical) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Look up a value by key, including the implicit `$`-prefixed fields.
    ///
    /// `$tags` are reported normalised (lowercase, `#`-prefixed).
    pub fn field(&self, key: &str) -> Option<Cow<'_, Literal>> {
        let key = field_key(key);
        match key.as_str() {
            "$id" => Some(Cow::Owned(Literal::String(self.id.clone()))),
            "$path" | "$file" => Some(Cow::Owned(Literal::String(self.path.clone()))),
            "$kind" => Some(Cow::Owned(Literal::from(self.kind.as_str()))),
            "$tags" => Some(Cow::Owned(Literal::Array(
                self.tags.iter().map(|t| Literal::String(normalize_tag(t))).collect(),
            ))),
            "$links" => Some(Cow::Owned(Literal::Array(
                self.links.iter().cloned().map(Literal::Link).collect(),
            ))),
            _ => self
                .fields
                .iter()
                .find(|(k, _)| field_key(k) == key)
                .map(|(_, v)| Cow::Borrowed(v)),
        }
    }

    /// Explicit fields as the store indexes them: one entry per canonical
    /// key, holding the value [`Document::field`] returns for it.
    pub fn field_entries(&self) -> impl Iterator<Item = (String, &Literal)> {
        let mut seen = std::collections::HashSet::new();
        self.fields.iter().filter_map(move |(k, v)| {
            let key = field_key(k);
            if IMPLICIT_FIELDS.contains(&key.as_str()) || !seen.insert(key.clone()) {
                return None;
            }
            Some((key, v))
        })
    }
}
