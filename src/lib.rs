//! # Anagram Service
//!
//! Anagram lookup against a shared, mutable word list — in-process or over a
//! line-oriented TCP protocol shared by many simultaneous clients.
//!
//! ## Key Pieces
//!
//! - **WordStore**: concurrency-safe word set with a fixed case-fold rule
//! - **AnagramMatcher**: canonical-form matching over store snapshots
//! - **Session**: per-connection menu state machine (add / delete / find)
//! - **ConnectionDispatcher**: one task per client, isolated lifetimes
//!
//! ## Quick Start
//!
//! ```rust
//! use anagram::{AnagramMatcher, FoldRule, WordStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(WordStore::with_words(["bat", "tab", "cat"], FoldRule::Insensitive));
//! let matcher = AnagramMatcher::new(Arc::clone(&store));
//!
//! assert_eq!(matcher.find_anagrams("BAT").unwrap(), vec!["tab"]);
//! ```

pub mod client;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod local;
pub mod matcher;
pub mod protocol;
pub mod server;

// Re-exports for convenience
pub use error::{AnagramError, Result};

pub use config::{RunMode, Settings};
pub use dictionary::{FoldRule, LoadStats, WordStore};
pub use matcher::{canonical, AnagramMatcher};
pub use protocol::{ResponseBlock, Session, SessionState, EXIT_PHRASE, RETURN_TO_MENU, SENTINEL};
pub use server::ConnectionDispatcher;
