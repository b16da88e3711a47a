//! Error types for the anagram service.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the store, the loader, config handling and the network layer.
#[derive(Debug, Error)]
pub enum AnagramError {
    /// Underlying I/O failure (connection reset, read/write failure, ...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The listening socket could not be bound.
    #[error("could not bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Dictionary file could not be opened or read.
    #[error("could not read dictionary {path}: {source}")]
    Dictionary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A thread panicked while holding the word store lock.
    #[error("word store lock poisoned")]
    StorePoisoned,

    /// The blocking task handling a line panicked or was cancelled.
    #[error("session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Peer closed the connection in the middle of a response block.
    #[error("connection closed before end of response")]
    UnexpectedEof,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AnagramError>;

impl From<toml::de::Error> for AnagramError {
    fn from(e: toml::de::Error) -> Self {
        AnagramError::Config(e.to_string())
    }
}
