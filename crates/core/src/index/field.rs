//! Per-field presence and value index.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use super::sets::EMPTY_IDS;
use super::types::IdSet;
use crate::literal::Literal;

/// Tracks which ids carry a field and, optionally, which ids carry each
/// value of it.
///
/// Value indexing is decided once at construction. Without it, [`equals`]
/// and [`range`] return `None` and callers must scan [`all`] instead.
///
/// [`equals`]: FieldIndex::equals
/// [`range`]: FieldIndex::range
/// [`all`]: FieldIndex::all
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    present: IdSet,
    values: Option<BTreeMap<Literal, IdSet>>,
}

impl FieldIndex {
    pub fn new(index_values: bool) -> Self {
        Self { present: IdSet::new(), values: index_values.then(BTreeMap::new) }
    }

    pub fn indexes_values(&self) -> bool {
        self.values.is_some()
    }

    pub fn add(&mut self, id: &str, value: &Literal) {
        self.present.insert(id.to_string());
        if let Some(values) = &mut self.values {
            values.entry(value.clone()).or_default().insert(id.to_string());
        }
    }

    pub fn delete(&mut self, id: &str, value: &Literal) {
        self.present.remove(id);
        if let Some(values) = &mut self.values
            && let Some(bucket) = values.get_mut(value)
        {
            bucket.remove(id);
            if bucket.is_empty() {
                values.remove(value);
            }
        }
    }

    /// Every id that has this field, whatever its value.
    pub fn all(&self) -> &IdSet {
        &self.present
    }

    /// Ids whose value equals `value` exactly, or `None` when values are not
    /// indexed for this field.
    pub fn equals(&self, value: &Literal) -> Option<&IdSet> {
        self.values.as_ref().map(|values| values.get(value).unwrap_or(&EMPTY_IDS))
    }

    /// Ids whose value falls within the bounds under the literal ordering,
    /// or `None` when values are not indexed for this field.
    pub fn range(&self, min: Bound<&Literal>, max: Bound<&Literal>) -> Option<IdSet> {
        let values = self.values.as_ref()?;
        if is_empty_range(min, max) {
            return Some(IdSet::new());
        }

        Some(
            values
                .range::<Literal, _>((min, max))
                .flat_map(|(_, ids)| ids.iter().cloned())
                .collect(),
        )
    }

    /// Number of distinct indexed values (zero when values are not indexed).
    pub fn value_count(&self) -> usize {
        self.values.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub fn clear(&mut self) {
        self.present.clear();
        if let Some(values) = &mut self.values {
            values.clear();
        }
    }
}

// `BTreeMap::range` panics on inverted bounds; those ranges are simply empty.
fn is_empty_range(min: Bound<&Literal>, max: Bound<&Literal>) -> bool {
    let (lo, hi, both_inclusive) = match (min, max) {
        (Bound::Included(lo), Bound::Included(hi)) => (lo, hi, true),
        (Bound::Included(lo) | Bound::Excluded(lo), Bound::Included(hi) | Bound::Excluded(hi)) => {
            (lo, hi, false)
        }
        _ => return false,
    };

    match lo.cmp(hi) {
        Ordering::Greater => true,
        Ordering::Equal => !both_inclusive,
        Ordering::Less => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn date(s: &str) -> Literal {
        Literal::Date(DateTime::parse_from_rfc3339(&format!("{s}T00:00:00Z")).unwrap())
    }

    fn ids(items: &[&str]) -> IdSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_presence_only_index_declines_value_lookups() {
        let mut index = FieldIndex::new(false);
        index.add("p1", &Literal::from("x"));
        index.add("p2", &Literal::from("y"));
        index.delete("p1", &Literal::from("x"));
        index.add("p3", &Literal::from("x"));

        assert!(index.equals(&Literal::from("x")).is_none());
        assert!(index.range(Bound::Unbounded, Bound::Unbounded).is_none());
        assert_eq!(index.all(), &ids(&["p2", "p3"]));
        assert_eq!(index.value_count(), 0);
    }

    #[test]
    fn test_equals_tracks_add_and_delete() {
        let mut index = FieldIndex::new(true);
        index.add("p1", &Literal::from(1.0));
        index.add("p2", &Literal::from(1.0));
        index.add("p3", &Literal::from(2.0));
        index.delete("p2", &Literal::from(1.0));

        assert_eq!(index.equals(&Literal::from(1.0)), Some(&ids(&["p1"])));
        assert_eq!(index.equals(&Literal::from(2.0)), Some(&ids(&["p3"])));
        assert_eq!(index.equals(&Literal::from(3.0)), Some(&IdSet::new()));
        assert_eq!(index.all(), &ids(&["p1", "p3"]));
    }

    #[test]
    fn test_delete_prunes_empty_value_bucket() {
        let mut index = FieldIndex::new(true);
        index.add("p1", &Literal::from("only"));
        index.delete("p1", &Literal::from("only"));
        assert_eq!(index.value_count(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_range_bounds() {
        let mut index = FieldIndex::new(true);
        index.add("jan", &date("2024-01-15"));
        index.add("feb", &date("2024-02-15"));
        index.add("mar", &date("2024-03-15"));

        let feb = date("2024-02-15");
        let mar = date("2024-03-15");

        let after_feb = index.range(Bound::Excluded(&feb), Bound::Unbounded).unwrap();
        assert_eq!(after_feb, ids(&["mar"]));

        let from_feb = index.range(Bound::Included(&feb), Bound::Unbounded).unwrap();
        assert_eq!(from_feb, ids(&["feb", "mar"]));

        let before_mar = index.range(Bound::Unbounded, Bound::Excluded(&mar)).unwrap();
        assert_eq!(before_mar, ids(&["feb", "jan"]));

        let between = index.range(Bound::Included(&feb), Bound::Included(&mar)).unwrap();
        assert_eq!(between, ids(&["feb", "mar"]));
    }

    #[test]
    fn test_inverted_and_degenerate_ranges_are_empty() {
        let mut index = FieldIndex::new(true);
        index.add("a", &Literal::from(5.0));

        let five = Literal::from(5.0);
        let nine = Literal::from(9.0);
        assert!(index.range(Bound::Included(&nine), Bound::Included(&five)).unwrap().is_empty());
        assert!(index.range(Bound::Excluded(&five), Bound::Excluded(&five)).unwrap().is_empty());
        assert_eq!(
            index.range(Bound::Included(&five), Bound::Included(&five)).unwrap(),
            ids(&["a"])
        );
    }

    #[test]
    fn test_range_respects_cross_type_rank() {
        let mut index = FieldIndex::new(true);
        index.add("num", &Literal::from(10.0));
        index.add("text", &Literal::from("ten"));

        let five = Literal::from(5.0);
        // every string ranks above every number
        let above = index.range(Bound::Excluded(&five), Bound::Unbounded).unwrap();
        assert_eq!(above, ids(&["num", "text"]));
    }
}
