use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::access::{GetError, Kind, Value};

/// A parsed `KEY=VALUE` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// Trailing `#typename` declared after the value, if any.
    pub annotation: Option<String>,
    /// File the entry was read from.
    pub source: Option<PathBuf>,
    /// 1-based line number within `source`.
    pub line: usize,
}

impl Entry {
    /// Resolves the annotation against the casting matrix.
    ///
    /// Entries without an annotation are strings.
    pub fn kind(&self) -> Result<Kind, GetError> {
        match &self.annotation {
            Some(name) => name.parse(),
            None => Ok(Kind::String),
        }
    }

    /// Casts the value to the kind its annotation declares.
    pub fn typed_value(&self) -> Result<Value, GetError> {
        let kind = self.kind()?;
        kind.cast(&self.value).ok_or_else(|| GetError::CannotCast {
            key: self.key.clone(),
            kind,
        })
    }
}

/// Entries merged from every loaded file, keyed by name.
///
/// Inserting a key that is already present replaces the previous entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedSet {
    entries: BTreeMap<String, Entry>,
}

impl LoadedSet {
    /// Inserts an entry, returning the one it replaced.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        let replaced = self.entries.insert(entry.key.clone(), entry);
        if let Some(old) = &replaced {
            tracing::trace!(key = %old.key, "overriding earlier definition");
        }
        replaced
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Returns the value bound to `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut BTreeMap<String, Entry> {
        &mut self.entries
    }
}

impl IntoIterator for LoadedSet {
    type Item = Entry;
    type IntoIter = btree_map::IntoValues<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: &str, annotation: Option<&str>) -> Entry {
        Entry {
            key: key.to_string(),
            value: value.to_string(),
            annotation: annotation.map(str::to_string),
            source: None,
            line: 1,
        }
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut set = LoadedSet::default();
        assert!(set.insert(entry("K", "a", None)).is_none());
        let replaced = set.insert(entry("K", "b", None)).unwrap();

        assert_eq!(replaced.value, "a");
        assert_eq!(set.value("K"), Some("b"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_unannotated_entry_is_string() {
        let e = entry("K", "v", None);
        assert_eq!(e.kind().unwrap(), Kind::String);
        assert_eq!(e.typed_value().unwrap(), Value::String("v".into()));
    }

    #[test]
    fn test_annotated_entry_casts() {
        let e = entry("INT_KEY", "16", Some("int"));
        assert_eq!(e.typed_value().unwrap(), Value::Isize(16));
    }

    #[test]
    fn test_annotation_cast_failure() {
        let e = entry("INT_KEY", "sixteen", Some("u8"));
        assert!(matches!(
            e.typed_value(),
            Err(GetError::CannotCast { kind: Kind::U8, .. })
        ));
    }

    #[test]
    fn test_unknown_annotation() {
        let e = entry("C", "1+2i", Some("complex64"));
        assert!(matches!(e.kind(), Err(GetError::UnsupportedType(name)) if name == "complex64"));
    }
}
