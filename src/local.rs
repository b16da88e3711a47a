//! Local mode — console anagram lookup without a network.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::config::Settings;
use crate::dictionary::WordStore;
use crate::error::Result;
use crate::matcher::AnagramMatcher;

/// Print the anagrams of every line read from `input`.
pub fn run_local<R, W>(matcher: &AnagramMatcher, input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Ready to accept words, Enter a word:")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let anagrams = matcher.find_anagrams(&line)?;
        writeln!(output, "Anagrams: {}", anagrams.join(","))?;
        writeln!(output, "Try another? :")?;
        output.flush()?;
    }
    Ok(())
}

/// Load the dictionary and serve lookups on stdin/stdout.
pub fn start_local(settings: &Settings) -> anyhow::Result<()> {
    let (store, _stats) = WordStore::from_path(settings.dictionary.as_deref(), settings.fold_rule())
        .context("failed to load dictionary")?;
    let matcher = AnagramMatcher::new(Arc::new(store));

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_local(&matcher, stdin.lock(), stdout.lock())?;
    Ok(())
}
