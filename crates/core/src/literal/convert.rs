//! Conversions from frontmatter YAML into [`Literal`] values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_yaml::Value;

use super::{Link, Literal};

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // A whole value of the form [[target]], [[target#sub]] or [[target|alias]],
    // optionally embedded with a leading !
    Regex::new(r"^(!)?\[\[([^\]]+)\]\]$").unwrap()
});

impl Literal {
    /// Convert a YAML frontmatter value.
    ///
    /// Strings are further interpreted via [`Literal::from_text`]; mapping
    /// keys that are not scalars are dropped.
    pub fn from_yaml(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(*b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::from_text(s),
            Value::Sequence(items) => Self::Array(items.iter().map(Self::from_yaml).collect()),
            Value::Mapping(map) => Self::Object(
                map.iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, Self::from_yaml(v))))
                    .collect::<BTreeMap<_, _>>(),
            ),
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
        }
    }

    /// Interpret a raw string: dates and wikilinks are promoted to their
    /// structured variants, anything else stays a string.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();

        if let Some(date) = parse_date(trimmed) {
            return Self::Date(date);
        }

        if let Some(caps) = WIKILINK_RE.captures(trimmed) {
            let mut link = Link::parse(&caps[2]);
            link.embed = caps.get(1).is_some();
            return Self::Link(link);
        }

        Self::String(text.to_string())
    }
}

fn yaml_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse ISO-8601 dates and datetimes; naive values are taken as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<chrono::FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
