//! Insertion-ordered mapping from file path to file content.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping from relative file path to file content.
///
/// Keys are unique. Re-inserting an existing path replaces its content but
/// keeps the position of the first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the content for `path`.
    ///
    /// Returns the previous content if the path was already present.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Option<String> {
        let path = path.into();
        let content = content.into();
        match self.index.get(&path) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, content)),
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path, content));
                None
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.index.get(path).map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    /// `(path, content)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    pub(crate) fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl FromIterator<(String, String)> for FileMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = FileMap::new();
        for (path, content) in iter {
            map.insert(path, content);
        }
        map
    }
}

impl IntoIterator for FileMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FileMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, content) in &self.entries {
            map.serialize_entry(path, content)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut map = FileMap::new();
        map.insert("b.ts", "b");
        map.insert("a.md", "a");
        map.insert("c.yml", "c");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b.ts", "a.md", "c.yml"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_reinsert_keeps_first_position() {
        let mut map = FileMap::new();
        map.insert("a.txt", "first");
        map.insert("b.txt", "other");
        let previous = map.insert("a.txt", "second");

        assert_eq!(previous.as_deref(), Some("first"));
        assert_eq!(map.get("a.txt"), Some("second"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_serialize_as_ordered_object() {
        let map: FileMap = vec![
            ("z.json".to_string(), "{}".to_string()),
            ("a.md".to_string(), "# A".to_string()),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"z.json":"{}","a.md":"# A"}"##);
    }
}
