//! Response blocks — the server's unit of reply.

use std::fmt;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::{EXIT_PHRASE, RETURN_TO_MENU, SENTINEL};
use crate::error::{AnagramError, Result};

/// Text lines of one server reply. The sentinel is added by [`ResponseBlock::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBlock {
    lines: Vec<String>,
}

impl ResponseBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `true` if any line contains `needle`.
    #[cfg(test)]
    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Wire form: each line newline-terminated, then the sentinel line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(SENTINEL);
        out.push('\n');
        out
    }

    // ─── Menu ──────────────────────────────────────────────────

    pub fn menu() -> Self {
        Self::new()
            .line("Welcome to the Anagram Service.")
            .line("Select an Option:")
            .line("[A] Add a word")
            .line("[D] Delete a word")
            .line("[P] Print Anagrams")
            .line(format!("Type {} to quit", EXIT_PHRASE))
    }

    pub fn add_prompt() -> Self {
        Self::new().line("Enter a word to ADD to the dictionary:")
    }

    pub fn remove_prompt() -> Self {
        Self::new().line("Enter a word to DELETE from the dictionary:")
    }

    pub fn find_prompt() -> Self {
        Self::new().line("Enter a word to find its anagrams:")
    }

    pub fn invalid_request(request: &str) -> Self {
        Self::new()
            .line(format!("Invalid request [{}]", request))
            .line("Expecting:")
            .line("Menu Option [A],[D] or [P]")
    }

    // ─── Word operations ───────────────────────────────────────

    pub fn word_added(word: &str, added: bool) -> Self {
        if added {
            Self::new()
                .line(format!("Word [{}] was added.", word))
                .line(format!("Add another? or type '{}' to go back.", RETURN_TO_MENU))
        } else {
            Self::new().line(format!("Failed to add Word [{}]. Try another word?", word))
        }
    }

    pub fn word_removed(word: &str, removed: bool) -> Self {
        if removed {
            Self::new()
                .line(format!("Word [{}] was removed.", word))
                .line(format!("Remove another? or type '{}' to go back.", RETURN_TO_MENU))
        } else {
            Self::new().line(format!("Failed to remove Word [{}]. Try another word?", word))
        }
    }

    pub fn anagrams(word: &str, anagrams: &[String]) -> Self {
        Self::new()
            .line(format!("Found {} anagrams for word {}", anagrams.len(), word))
            .line(anagrams.join(","))
            .line(format!("Find another? or type '{}' to go back.", RETURN_TO_MENU))
    }

    /// Reply used when a line could not be processed at all.
    pub fn failure(input: &str) -> Self {
        Self::new().line(format!("Failed to generate response for input: {}", input))
    }
}

impl fmt::Display for ResponseBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Read lines up to (not including) the next sentinel line.
///
/// Fails with [`AnagramError::UnexpectedEof`] if the stream ends first.
pub async fn read_block<R>(reader: &mut R) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut buf = String::new();

    loop {
        buf.clear();
        if reader.read_line(&mut buf).await? == 0 {
            return Err(AnagramError::UnexpectedEof);
        }

        let line = buf.trim_end_matches(['\n', '\r']);
        if line == SENTINEL {
            return Ok(lines);
        }
        lines.push(line.to_string());
    }
}
