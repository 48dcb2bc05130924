//! Total ordering over [`Literal`] values.
//!
//! Ordering rules:
//! 1. Variant rank (`null < boolean < number < string < date < duration <
//!    link < array < object`)
//! 2. Variant-specific comparison for same-ranked values
//!
//! Mixed-variant comparisons are rank-only and must remain deterministic:
//! this comparator backs every sorted container in the index.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use super::{Link, Literal};

/// Compare two literals under the total order.
#[must_use]
pub fn compare(left: &Literal, right: &Literal) -> Ordering {
    let rank = left.rank().cmp(&right.rank());
    if rank != Ordering::Equal {
        return rank;
    }

    compare_same_rank(left, right)
}

/// Case-folded lexicographic comparison with a raw tie-break.
///
/// `"apple" < "Banana" < "banana"`. Two strings only compare equal when they
/// are identical, which keeps the order consistent with `Eq`.
#[must_use]
pub fn compare_text(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    left.cmp(right)
}

fn compare_same_rank(left: &Literal, right: &Literal) -> Ordering {
    match (left, right) {
        (Literal::Null, Literal::Null) => Ordering::Equal,
        (Literal::Boolean(a), Literal::Boolean(b)) => a.cmp(b),
        (Literal::Number(a), Literal::Number(b)) => compare_numbers(*a, *b),
        (Literal::String(a), Literal::String(b)) => compare_text(a, b),
        (Literal::Date(a), Literal::Date(b)) => a.cmp(b),
        (Literal::Duration(a), Literal::Duration(b)) => a.cmp(b),
        (Literal::Link(a), Literal::Link(b)) => a.cmp(b),
        (Literal::Array(a), Literal::Array(b)) => compare_arrays(a, b),
        (Literal::Object(a), Literal::Object(b)) => compare_objects(a, b),
        // Unreachable once ranks match; kept total for the comparator contract.
        _ => Ordering::Equal,
    }
}

// NaN sorts above every number and equal to itself.
fn compare_numbers(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
    }
}

fn compare_arrays(left: &[Literal], right: &[Literal]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = compare(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn compare_objects(left: &BTreeMap<String, Literal>, right: &BTreeMap<String, Literal>) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in left.iter().zip(right.iter()) {
        let key_cmp = left_key.cmp(right_key);
        if key_cmp != Ordering::Equal {
            return key_cmp;
        }

        let value_cmp = compare(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left.len().cmp(&right.len())
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl Eq for Literal {}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Literal::Null => {}
            Literal::Boolean(b) => b.hash(state),
            Literal::Number(n) => number_bits(*n).hash(state),
            Literal::String(s) => s.hash(state),
            Literal::Date(d) => d.hash(state),
            Literal::Duration(d) => d.hash(state),
            Literal::Link(link) => link.hash(state),
            Literal::Array(items) => items.hash(state),
            Literal::Object(map) => map.hash(state),
        }
    }
}

// Bit pattern that agrees with `compare_numbers`: -0.0 == 0.0, all NaNs equal.
fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Link {}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.subpath.cmp(&other.subpath))
    }
}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.kind.hash(state);
        self.subpath.hash(state);
    }
}
