//! Key/value stores that loaded entries are installed into and read back from.

use std::collections::HashMap;

/// A string key/value store.
///
/// [`ProcessEnv`] is the environment of the running process; [`MemoryStore`]
/// keeps everything in memory and leaves the process untouched.
pub trait Store {
    /// Returns the value of `key`, or `None` if it is not set.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Sets `key` to `value`.
    fn set(&mut self, key: &str, value: &str);

    /// Returns the value of `key`, or an empty string if it is not set.
    fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }
}

/// The environment of the current process.
///
/// Values that are not valid Unicode are reported as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Store for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    /// # Panics
    ///
    /// Panics if `key` is empty or contains `=` or NUL, or if `value` contains
    /// NUL. Entries produced by the loader never do.
    fn set(&mut self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

/// An in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    vars: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Store for MemoryStore {
    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_memory_store_set_and_lookup() {
        let mut store = MemoryStore::new();
        assert_eq!(store.lookup("A"), None);
        assert_eq!(store.get("A"), "");

        store.set("A", "1");
        assert_eq!(store.lookup("A").as_deref(), Some("1"));
        assert_eq!(store.get("A"), "1");

        assert_eq!(store.remove("A").as_deref(), Some("1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_distinguishes_empty_from_unset() {
        let store = MemoryStore::from_iter([("EMPTY", "")]);
        assert_eq!(store.lookup("EMPTY").as_deref(), Some(""));
        assert_eq!(store.lookup("UNSET"), None);
    }

    #[test]
    #[serial]
    fn test_process_env_round_trip() {
        let key = "ENVBIND_STORE_TEST_KEY";
        let mut env = ProcessEnv;

        env.set(key, "value");
        assert_eq!(env.lookup(key).as_deref(), Some("value"));
        assert_eq!(std::env::var(key).as_deref(), Ok("value"));

        std::env::remove_var(key);
        assert_eq!(env.lookup(key), None);
    }
}
