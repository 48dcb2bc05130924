//! Parsed query trees as produced by a query front end.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::literal::Literal;

/// Comparison operator of a [`QueryTree::Compare`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    /// Fuzzy containment; see [`Literal::contains`].
    #[serde(rename = "~")]
    Contains,
}

impl CompareOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(Self::Eq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "~" => Some(Self::Contains),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Contains => "~",
        }
    }

    /// Apply the operator to a document's value and the query's value.
    pub fn test(&self, actual: &Literal, expected: &Literal) -> bool {
        match self {
            Self::Eq => actual == expected,
            Self::Lt => actual < expected,
            Self::Le => actual <= expected,
            Self::Gt => actual > expected,
            Self::Ge => actual >= expected,
            Self::Contains => actual.contains(expected),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A boolean/comparison query.
///
/// JSON form: `{"and": [..]}`, `{"or": [..]}`, `{"not": {..}}` and
/// `{"compare": {"key": "due", "op": ">", "value": {"type": "number", "value": 3}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryTree {
    And(Vec<QueryTree>),
    Or(Vec<QueryTree>),
    Not(Box<QueryTree>),
    Compare { key: String, op: CompareOp, value: Literal },
}

impl QueryTree {
    pub fn and(children: impl IntoIterator<Item = QueryTree>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = QueryTree>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    pub fn not(child: QueryTree) -> Self {
        Self::Not(Box::new(child))
    }

    pub fn compare(key: impl Into<String>, op: CompareOp, value: impl Into<Literal>) -> Self {
        Self::Compare { key: key.into(), op, value: value.into() }
    }

    pub fn eq(key: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(key, CompareOp::Eq, value)
    }
}

impl fmt::Display for QueryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(children) | Self::Or(children) => {
                let joiner = if matches!(self, Self::And(_)) { " AND " } else { " OR " };
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Self::Not(child) => write!(f, "NOT {child}"),
            Self::Compare { key, op, value } => write!(f, "{key} {op} {value}"),
        }
    }
}
