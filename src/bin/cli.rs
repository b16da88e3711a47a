//! Anagram CLI - anagram lookup, locally or over the network.
//!
//! Usage:
//!   anagram                      # Local console lookup (default)
//!   anagram local                # Same as above
//!   anagram server               # Serve clients on the configured port
//!   anagram client               # Connect to a server and bridge the console
//!   anagram server --dictionary words.txt --port 6000

use anagram::client::start_client;
use anagram::local::start_local;
use anagram::server::start_server;
use anagram::{RunMode, Settings};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "anagram")]
#[command(about = "Anagram lookup against a shared word list", long_about = None)]
#[command(version)]
struct Cli {
    /// Run mode: local, server or client
    #[arg(value_enum, ignore_case = true, default_value = "local")]
    mode: RunMode,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Word list, one word per line (local/server)
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Server host (client)
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Treat words differing only in case as distinct
    #[arg(long)]
    case_sensitive: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Defaults, then config file, then flags.
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(dictionary) = &self.dictionary {
            settings.dictionary = Some(dictionary.clone());
        }
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if self.case_sensitive {
            settings.ignore_case = false;
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
        Ok(settings)
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;
    init_tracing(&settings.log_level);
    info!(mode = ?cli.mode, "starting");

    match cli.mode {
        RunMode::Local => start_local(&settings),
        RunMode::Server => runtime()?.block_on(start_server(&settings)),
        RunMode::Client => runtime()?.block_on(start_client(&settings)),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

// Logs go to stderr; stdout is the console dialogue.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
