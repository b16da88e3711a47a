//! Dictionary module — the shared, mutable word set.
//!
//! A single [`WordStore`] is created at startup and shared (behind an `Arc`)
//! by every session. All words are normalized through the store's
//! [`FoldRule`] on the way in and on every lookup, so two words that fold to
//! the same text are the same entry.
//!
//! ## Locking
//!
//! ```text
//! add / remove        -> write lock, check + mutate in one critical section
//! contains / length   -> read lock
//! words_of_length     -> read lock, copied out as a snapshot
//! ```

pub mod loader;

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{AnagramError, Result};

pub use loader::{load_words, LoadStats};

/// Case-normalization policy, fixed when the store is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldRule {
    /// Words are stored and compared exactly as given.
    Sensitive,
    /// Words are lowercased before storage and comparison.
    Insensitive,
}

impl FoldRule {
    pub fn from_ignore_case(ignore_case: bool) -> Self {
        if ignore_case {
            FoldRule::Insensitive
        } else {
            FoldRule::Sensitive
        }
    }

    pub fn ignores_case(self) -> bool {
        self == FoldRule::Insensitive
    }

    /// Apply the rule to a word. Borrows when nothing changes.
    pub fn normalize(self, word: &str) -> Cow<'_, str> {
        match self {
            FoldRule::Sensitive => Cow::Borrowed(word),
            FoldRule::Insensitive => {
                let lower = word.to_lowercase();
                if lower == word {
                    Cow::Borrowed(word)
                } else {
                    Cow::Owned(lower)
                }
            }
        }
    }
}

/// Concurrency-safe set of normalized words.
#[derive(Debug)]
pub struct WordStore {
    words: RwLock<HashSet<String>>,
    fold: FoldRule,
}

impl WordStore {
    /// Create an empty store.
    pub fn new(fold: FoldRule) -> Self {
        Self {
            words: RwLock::new(HashSet::new()),
            fold,
        }
    }

    /// Create a store seeded with `words`. Entries that fold to the same
    /// text collapse into one.
    pub fn with_words<I, S>(words: I, fold: FoldRule) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = words
            .into_iter()
            .map(|w| fold.normalize(w.as_ref()).into_owned())
            .collect();

        Self {
            words: RwLock::new(set),
            fold,
        }
    }

    pub fn fold_rule(&self) -> FoldRule {
        self.fold
    }

    /// Insert a word. Returns `false` if an equal word is already present.
    pub fn add(&self, word: &str) -> Result<bool> {
        let normalized = self.fold.normalize(word);
        let mut words = self.write()?;

        if words.contains(normalized.as_ref()) {
            info!(word = %normalized, "word already in dictionary, skipping add");
            return Ok(false);
        }

        words.insert(normalized.into_owned());
        Ok(true)
    }

    /// Remove a word. Returns `false` if it was not present.
    pub fn remove(&self, word: &str) -> Result<bool> {
        let normalized = self.fold.normalize(word);
        let removed = self.write()?.remove(normalized.as_ref());

        if !removed {
            info!(word = %normalized, "word not in dictionary, skipping remove");
        }
        Ok(removed)
    }

    pub fn contains(&self, word: &str) -> Result<bool> {
        let normalized = self.fold.normalize(word);
        let found = self.read()?.contains(normalized.as_ref());
        debug!(word = %normalized, found, "dictionary lookup");
        Ok(found)
    }

    /// Snapshot of every stored word with exactly `length` characters.
    ///
    /// The copy is taken under a single read lock, so it reflects one
    /// point in time even while other sessions mutate the store.
    pub fn words_of_length(&self, length: usize) -> Result<Vec<String>> {
        let start = Instant::now();
        let words: Vec<String> = self
            .read()?
            .iter()
            .filter(|w| w.chars().count() == length)
            .cloned()
            .collect();

        debug!(
            count = words.len(),
            length,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "collected words of length"
        );
        Ok(words)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashSet<String>>> {
        self.words.read().map_err(|_| AnagramError::StorePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashSet<String>>> {
        self.words.write().map_err(|_| AnagramError::StorePoisoned)
    }

    /// Poison the lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = self.words.write();
                    panic!("poisoning word store");
                })
                .join();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn insensitive(words: &[&str]) -> WordStore {
        WordStore::with_words(words.iter().copied(), FoldRule::Insensitive)
    }

    #[test]
    fn test_add_same_word_twice() {
        let store = insensitive(&[]);
        assert!(store.add("listen").unwrap());
        assert_eq!(store.len().unwrap(), 1);

        assert!(!store.add("listen").unwrap());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_remove_present_and_absent() {
        let store = insensitive(&["silent", "tinsel"]);

        assert!(!store.remove("enlist").unwrap());
        assert_eq!(store.len().unwrap(), 2);

        assert!(store.remove("silent").unwrap());
        assert_eq!(store.len().unwrap(), 1);
        assert!(!store.contains("silent").unwrap());
    }

    #[test]
    fn test_case_insensitive_store() {
        let store = insensitive(&[]);
        assert!(store.add("Hello").unwrap());
        assert!(!store.add("hello").unwrap());

        assert!(store.contains("hello").unwrap());
        assert!(store.contains("HELLO").unwrap());
        assert_eq!(store.len().unwrap(), 1);

        assert!(store.remove("HeLLo").unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_case_sensitive_store() {
        let store = WordStore::new(FoldRule::Sensitive);
        assert!(store.add("Hello").unwrap());
        assert!(store.add("hello").unwrap());
        assert_eq!(store.len().unwrap(), 2);

        assert!(!store.contains("HELLO").unwrap());
        assert!(store.remove("Hello").unwrap());
        assert!(store.contains("hello").unwrap());
        assert!(!store.contains("Hello").unwrap());
    }

    #[test]
    fn test_seed_collapses_folded_duplicates() {
        let store = insensitive(&["Stop", "stop", "POTS", "tops"]);
        assert_eq!(store.len().unwrap(), 3);
        assert!(store.contains("pots").unwrap());
    }

    #[test]
    fn test_words_of_length() {
        let store = insensitive(&["a", "ab", "ba", "abc", "café"]);

        let mut two = store.words_of_length(2).unwrap();
        two.sort();
        assert_eq!(two, vec!["ab", "ba"]);

        // Length counts characters, not bytes.
        assert_eq!(store.words_of_length(4).unwrap(), vec!["café"]);

        assert!(store.words_of_length(9).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let store = insensitive(&["cat"]);
        let snapshot = store.words_of_length(3).unwrap();
        store.add("act").unwrap();
        assert_eq!(snapshot, vec!["cat"]);
    }

    #[test]
    fn test_concurrent_adds_only_one_succeeds() {
        let store = Arc::new(insensitive(&[]));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let word = if i % 2 == 0 { "Race" } else { "race" };
                    store.add(word).unwrap()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = insensitive(&["word"]);
        store.poison();

        assert!(matches!(store.add("other"), Err(AnagramError::StorePoisoned)));
        assert!(matches!(store.contains("word"), Err(AnagramError::StorePoisoned)));
        assert!(matches!(store.words_of_length(4), Err(AnagramError::StorePoisoned)));
    }
}
