//! Ordered list-table column definitions

/// Column key to header mapping that preserves insertion order.
///
/// Inserting an existing key replaces its header in place, so a column keeps
/// its position when a later filter relabels it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnSet(Vec<(String, String)>);

impl ColumnSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, header: impl Into<String>) {
        let key = key.into();
        let header = header.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = header,
            None => self.0.push((key, header)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut cols: ColumnSet = [("cb", ""), ("name", "Name"), ("posts", "Count")]
            .into_iter()
            .collect();
        cols.insert("rank", "Rank");
        assert_eq!(cols.keys().collect::<Vec<_>>(), vec!["cb", "name", "posts", "rank"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut cols: ColumnSet = [("name", "Name"), ("rank", "Old")].into_iter().collect();
        cols.insert("name", "Title");
        assert_eq!(cols.len(), 2);
        assert_eq!(cols.get("name"), Some("Title"));
        assert_eq!(cols.keys().next(), Some("name"));
    }
}
