//! Immutable API key store.

use std::collections::HashSet;
use std::sync::Arc;

/// Process-wide set of accepted API keys, built once from configuration.
///
/// Cheap to clone (Arc). Never mutated after construction, so concurrent
/// reads need no locking.
#[derive(Debug, Clone)]
pub struct KeyStore {
    keys: Arc<HashSet<String>>,
}

impl KeyStore {
    /// Build a key store from a comma-separated list.
    ///
    /// Each candidate is trimmed; empty entries after trimming are
    /// discarded.
    pub fn from_csv(raw: &str) -> Self {
        let keys: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_and_trims_entries() {
        let store = KeyStore::from_csv(" abc , def,ghi ");
        assert_eq!(store.len(), 3);
        assert!(store.contains("abc"));
        assert!(store.contains("def"));
        assert!(store.contains("ghi"));
        assert!(!store.contains(" abc "));
    }

    #[test]
    fn test_discards_empty_entries() {
        let store = KeyStore::from_csv("abc,, ,def,");
        assert_eq!(store.len(), 2);
        assert!(store.contains("abc"));
        assert!(store.contains("def"));
    }

    #[test]
    fn test_empty_input_yields_empty_store() {
        assert!(KeyStore::from_csv("").is_empty());
        assert!(KeyStore::from_csv(" , ,").is_empty());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let store = KeyStore::from_csv("abc");
        assert!(!store.contains("wrong"));
        assert!(!store.contains(""));
    }
}
