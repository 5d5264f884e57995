use indexmap::IndexMap;
use serde::Serialize;

/// Occurrence counts keyed by an extracted field value.
///
/// Keys keep the order in which they were first seen, so ranking ties can be
/// broken by first appearance. Equality compares contents only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: IndexMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    /// Count `n` occurrences of `key`.
    pub fn add(&mut self, key: &str, n: u64) {
        // Avoid allocating a key String on the hot path when the key exists.
        if let Some(count) = self.counts.get_mut(key) {
            *count += n;
        } else {
            self.counts.insert(key.to_string(), n);
        }
    }

    /// Key-wise summation of `other` into `self`.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (key, &n) in &other.counts {
            self.add(key, n);
        }
    }

    /// Same as [`merge`](Self::merge) but reuses the other table's key allocations.
    pub fn merge_owned(&mut self, other: FrequencyTable) {
        if self.counts.is_empty() {
            self.counts = other.counts;
            return;
        }
        for (key, n) in other.counts {
            *self.counts.entry(key).or_insert(0) += n;
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// The `n` most frequent keys, highest count first. Ties keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self.iter().collect();
        // sort_by is stable, which is what preserves first-seen order on ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// All entries by count descending, then key ascending.
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<'a> FromIterator<(&'a str, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (key, n) in iter {
            table.add(key, n);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let mut table = FrequencyTable::new();
        table.increment("200");
        table.increment("404");
        table.increment("200");

        assert_eq!(table.get("200"), 2);
        assert_eq!(table.get("404"), 1);
        assert_eq!(table.get("500"), 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_merge_sums_keywise() {
        let mut left: FrequencyTable = [("a", 1), ("b", 2)].into_iter().collect();
        let right: FrequencyTable = [("b", 3), ("c", 4)].into_iter().collect();

        left.merge(&right);
        assert_eq!(left, [("a", 1), ("b", 5), ("c", 4)].into_iter().collect());

        let mut owned = FrequencyTable::new();
        owned.merge_owned(right.clone());
        assert_eq!(owned, right);
    }

    #[test]
    fn test_equality_ignores_key_order() {
        let forward: FrequencyTable = [("x", 1), ("y", 2)].into_iter().collect();
        let reverse: FrequencyTable = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_most_common_breaks_ties_by_first_seen() {
        let table: FrequencyTable = [("10.0.0.9", 3), ("10.0.0.1", 5), ("10.0.0.5", 3)]
            .into_iter()
            .collect();

        assert_eq!(
            table.most_common(2),
            vec![("10.0.0.1", 5), ("10.0.0.9", 3)]
        );
        assert_eq!(table.most_common(10).len(), 3);
        assert!(table.most_common(0).is_empty());
    }

    #[test]
    fn test_sorted_by_count_orders_ties_by_key() {
        let table: FrequencyTable = [("500", 1), ("404", 1), ("200", 7)].into_iter().collect();
        assert_eq!(
            table.sorted_by_count(),
            vec![("200", 7), ("404", 1), ("500", 1)]
        );
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let table: FrequencyTable = [("200", 2), ("404", 1)].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"200":2,"404":1}"#);
    }
}
