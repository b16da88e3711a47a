//! Dictionary loading — seed a [`WordStore`] from a bulk word list.
//!
//! The format is one word per line. Surrounding whitespace is trimmed and
//! blank lines are skipped; duplicates (after folding) collapse into one entry.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{FoldRule, WordStore};
use crate::error::{AnagramError, Result};

/// Summary of a dictionary load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Non-blank lines read from the source.
    pub lines: usize,
    /// Distinct entries in the resulting store.
    pub entries: usize,
    /// Lines that folded onto an existing entry.
    pub duplicates: usize,
    pub elapsed: Duration,
}

/// Read every non-blank line of `reader` as a word.
pub fn load_words<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}

impl WordStore {
    /// Build a store from a word list reader.
    pub fn from_reader<R: BufRead>(reader: R, fold: FoldRule) -> Result<(Self, LoadStats)> {
        let start = Instant::now();
        info!(ignore_case = fold.ignores_case(), "loading dictionary");

        let words = load_words(reader)?;
        let lines = words.len();
        let store = Self::with_words(words, fold);
        let entries = store.len()?;

        let stats = LoadStats {
            lines,
            entries,
            duplicates: lines - entries,
            elapsed: start.elapsed(),
        };

        debug!(lines = stats.lines, "lines loaded from word list");
        info!(
            entries = stats.entries,
            duplicates = stats.duplicates,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "dictionary loaded"
        );
        Ok((store, stats))
    }

    /// Build a store from an optional word list file.
    ///
    /// `None` yields an empty store; a path that cannot be opened is an error.
    pub fn from_path(path: Option<&Path>, fold: FoldRule) -> Result<(Self, LoadStats)> {
        let Some(path) = path else {
            warn!("no dictionary file supplied, starting with an empty dictionary");
            return Ok((Self::new(fold), LoadStats::default()));
        };

        let file = File::open(path).map_err(|source| AnagramError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "reading word list");
        Self::from_reader(BufReader::new(file), fold)
    }
}
