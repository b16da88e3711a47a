//! Per-connection session state machine.

use std::fmt;

use tracing::{debug, warn};

use super::response::ResponseBlock;
use super::RETURN_TO_MENU;
use crate::dictionary::WordStore;
use crate::error::Result;
use crate::matcher::AnagramMatcher;

/// Where a session is in the menu dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Menu,
    AwaitingAddWord,
    AwaitingRemoveWord,
    AwaitingAnagramQuery,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Menu => "menu",
            SessionState::AwaitingAddWord => "add_word",
            SessionState::AwaitingRemoveWord => "remove_word",
            SessionState::AwaitingAnagramQuery => "find_anagram",
        };
        f.write_str(s)
    }
}

/// State machine for one client. Owned by the task serving that client.
#[derive(Debug)]
pub struct Session {
    client_id: String,
    state: SessionState,
    matcher: AnagramMatcher,
}

impl Session {
    pub fn new(client_id: impl Into<String>, matcher: AnagramMatcher) -> Self {
        Self {
            client_id: client_id.into(),
            state: SessionState::Menu,
            matcher,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Unsolicited menu sent when the connection opens.
    pub fn greeting(&self) -> ResponseBlock {
        debug!(client = %self.client_id, "printing menu");
        ResponseBlock::menu()
    }

    /// Feed one input line; always yields exactly one response block.
    pub fn handle_line(&mut self, input: &str) -> ResponseBlock {
        match self.process(input) {
            Ok(block) => block,
            Err(e) => {
                warn!(client = %self.client_id, state = %self.state, error = %e, "failed to process input");
                ResponseBlock::failure(input)
            }
        }
    }

    fn process(&mut self, input: &str) -> Result<ResponseBlock> {
        match self.state {
            SessionState::Menu => Ok(self.menu_choice(input)),
            _ if input.eq_ignore_ascii_case(RETURN_TO_MENU) => Ok(self.return_to_menu()),
            SessionState::AwaitingAddWord => {
                let added = self.store().add(input)?;
                debug!(client = %self.client_id, added, "add word");
                Ok(ResponseBlock::word_added(input, added))
            }
            SessionState::AwaitingRemoveWord => {
                let removed = self.store().remove(input)?;
                debug!(client = %self.client_id, removed, "remove word");
                Ok(ResponseBlock::word_removed(input, removed))
            }
            SessionState::AwaitingAnagramQuery => {
                let anagrams = self.matcher.find_anagrams(input)?;
                Ok(ResponseBlock::anagrams(input, &anagrams))
            }
        }
    }

    fn menu_choice(&mut self, request: &str) -> ResponseBlock {
        let (next, block) = match request.to_ascii_lowercase().as_str() {
            "a" => (SessionState::AwaitingAddWord, ResponseBlock::add_prompt()),
            "d" => (SessionState::AwaitingRemoveWord, ResponseBlock::remove_prompt()),
            "p" => (SessionState::AwaitingAnagramQuery, ResponseBlock::find_prompt()),
            _ => {
                debug!(client = %self.client_id, request, "invalid menu request");
                return ResponseBlock::invalid_request(request);
            }
        };

        debug!(client = %self.client_id, from = %self.state, to = %next, "state transition");
        self.state = next;
        block
    }

    fn return_to_menu(&mut self) -> ResponseBlock {
        debug!(client = %self.client_id, from = %self.state, "returning to menu");
        self.state = SessionState::Menu;
        self.greeting()
    }

    fn store(&self) -> &WordStore {
        self.matcher.store()
    }
}
