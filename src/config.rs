//! Startup configuration — run mode and settings.
//!
//! Settings come from built-in defaults, optionally overlaid by a TOML file,
//! then by command-line flags (applied by the binary).
//!
//! ```toml
//! host = "localhost"
//! port = 5555
//! dictionary = "words.txt"
//! ignore_case = true
//! log_level = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::dictionary::FoldRule;
use crate::error::{AnagramError, Result};

/// Well-known port shared by server and client.
pub const DEFAULT_PORT: u16 = 5555;

/// Host the client connects to by default.
pub const DEFAULT_HOST: &str = "localhost";

/// Which front end the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Read words from the console and print their anagrams.
    #[default]
    Local,
    /// Serve the session protocol to network clients.
    Server,
    /// Bridge the console to a running server.
    Client,
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Host the client connects to.
    pub host: String,

    /// Port the server listens on and the client connects to.
    pub port: u16,

    /// Word list to seed the dictionary with (one word per line).
    pub dictionary: Option<PathBuf>,

    /// Fold words to lowercase in the dictionary.
    pub ignore_case: bool,

    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dictionary: None,
            ignore_case: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| AnagramError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn fold_rule(&self) -> FoldRule {
        FoldRule::from_ignore_case(self.ignore_case)
    }

    /// Address the server binds (all interfaces).
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Address the client connects to.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
