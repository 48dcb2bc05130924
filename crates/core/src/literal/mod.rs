//! The heterogeneous value domain stored in and queried from the indexes.
//!
//! Every index keys identifiers (directly or indirectly) by [`Literal`]
//! values. Ordering, equality and hashing are all derived from the total
//! order in [`compare`], so a `Literal` can be used as a `BTreeMap` key as
//! well as a `HashMap` key.

pub mod compare;
pub mod convert;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

pub use compare::{compare, compare_text};

/// A value attached to a document field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Literal {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Date(DateTime<FixedOffset>),
    Duration(#[serde(with = "duration_millis")] TimeDelta),
    Link(Link),
    Array(Vec<Literal>),
    Object(BTreeMap<String, Literal>),
}

impl Literal {
    /// Fixed precedence rank; values of different variants compare by rank alone.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Number(_) => 2,
            Self::String(_) => 3,
            Self::Date(_) => 4,
            Self::Duration(_) => 5,
            Self::Link(_) => 6,
            Self::Array(_) => 7,
            Self::Object(_) => 8,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Duration(_) => "duration",
            Self::Link(_) => "link",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Self::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Loose containment used by the `~` operator.
    ///
    /// Strings match case-insensitive substrings, arrays match if any element
    /// equals (or, for strings, contains) the needle, links match on their
    /// path. Everything else falls back to equality.
    pub fn contains(&self, needle: &Literal) -> bool {
        match (self, needle) {
            (Self::String(haystack), Self::String(needle)) => {
                haystack.to_lowercase().contains(&needle.to_lowercase())
            }
            (Self::Array(items), _) => items.iter().any(|item| match item {
                Self::String(_) | Self::Link(_) => item.contains(needle),
                _ => item == needle,
            }),
            (Self::Link(link), Self::String(needle)) => {
                link.path.to_lowercase().contains(&needle.to_lowercase())
            }
            (Self::Link(link), Self::Link(other)) => link.path == other.path,
            _ => self == needle,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Self::Duration(d) => write!(f, "{}ms", d.num_milliseconds()),
            Self::Link(link) => write!(f, "{link}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<FixedOffset>> for Literal {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Date(value)
    }
}

impl From<TimeDelta> for Literal {
    fn from(value: TimeDelta) -> Self {
        Self::Duration(value)
    }
}

impl From<Link> for Literal {
    fn from(value: Link) -> Self {
        Self::Link(value)
    }
}

impl From<Vec<Literal>> for Literal {
    fn from(value: Vec<Literal>) -> Self {
        Self::Array(value)
    }
}

/// What part of the target file a link points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// The whole file: `[[note]]`
    #[default]
    File,
    /// A heading inside the file: `[[note#Heading]]`
    Header,
    /// A block reference: `[[note#^block-id]]`
    Block,
}

/// A structured reference to another note, section or block.
///
/// Identity (ordering, equality, hashing) covers `path`, `kind` and
/// `subpath` only; `embed` and `display` are presentation details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub path: String,
    #[serde(default)]
    pub subpath: Option<String>,
    #[serde(default)]
    pub kind: LinkKind,
    #[serde(default)]
    pub embed: bool,
    #[serde(default)]
    pub display: Option<String>,
}

impl Link {
    /// Link to a whole file.
    pub fn file(path: impl Into<String>) -> Self {
        Self { path: path.into(), subpath: None, kind: LinkKind::File, embed: false, display: None }
    }

    /// Link to a heading inside a file.
    pub fn header(path: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subpath: Some(heading.into()),
            kind: LinkKind::Header,
            embed: false,
            display: None,
        }
    }

    /// Link to a block inside a file.
    pub fn block(path: impl Into<String>, block_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subpath: Some(block_id.into()),
            kind: LinkKind::Block,
            embed: false,
            display: None,
        }
    }

    /// Parse the inside of a wikilink: `target`, `target#Heading`,
    /// `target#^block` or any of those followed by `|alias`.
    pub fn parse(inner: &str) -> Self {
        let (target, display) = match inner.split_once('|') {
            Some((target, alias)) => (target, Some(alias.trim().to_string())),
            None => (inner, None),
        };

        let mut link = match target.split_once('#') {
            Some((path, sub)) if sub.starts_with('^') => Self::block(path.trim(), &sub[1..]),
            Some((path, sub)) if !sub.trim().is_empty() => Self::header(path.trim(), sub.trim()),
            Some((path, _)) => Self::file(path.trim()),
            None => Self::file(target.trim()),
        };
        link.display = display.filter(|d| !d.is_empty());
        link
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embed = true;
        self
    }

    /// Link pointing at the file this link lives in.
    pub fn to_file(&self) -> Self {
        Self::file(self.path.clone())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.embed {
            write!(f, "!")?;
        }
        write!(f, "[[{}", self.path)?;
        match (&self.kind, &self.subpath) {
            (LinkKind::Header, Some(sub)) => write!(f, "#{sub}")?,
            (LinkKind::Block, Some(sub)) => write!(f, "#^{sub}")?,
            _ => {}
        }
        if let Some(display) = &self.display {
            write!(f, "|{display}")?;
        }
        write!(f, "]]")
    }
}

mod duration_millis {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        TimeDelta::try_milliseconds(millis)
            .ok_or_else(|| serde::de::Error::custom("duration out of range"))
    }
}
