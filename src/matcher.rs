//! Anagram matching against the shared [`WordStore`].
//!
//! Two words are anagrams when their canonical forms (characters sorted by
//! code point) are equal. Every character counts, punctuation and digits
//! included; case is handled only by the store's fold rule.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::dictionary::WordStore;
use crate::error::Result;

/// Sorted-character form of `word`.
pub fn canonical(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

/// Finds anagrams of query words. Cheap to clone; all clones share one store.
#[derive(Debug, Clone)]
pub struct AnagramMatcher {
    store: Arc<WordStore>,
}

impl AnagramMatcher {
    pub fn new(store: Arc<WordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<WordStore> {
        &self.store
    }

    /// All stored anagrams of `word`, excluding the (normalized) word itself.
    ///
    /// Results come back in the order of the store snapshot.
    pub fn find_anagrams(&self, word: &str) -> Result<Vec<String>> {
        let start = Instant::now();
        let normalized = self.store.fold_rule().normalize(word);
        let target = canonical(&normalized);

        let candidates = self.store.words_of_length(normalized.chars().count())?;
        let anagrams: Vec<String> = candidates
            .into_par_iter()
            .filter(|candidate| candidate.as_str() != normalized.as_ref())
            .filter(|candidate| canonical(candidate) == target)
            .collect();

        info!(
            word,
            count = anagrams.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "found anagrams"
        );
        Ok(anagrams)
    }
}
