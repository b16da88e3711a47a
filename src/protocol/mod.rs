//! Session protocol — line-oriented menu dialogue between client and server.
//!
//! Client lines are either control tokens (menu letters, the return token)
//! or word payloads; the two are told apart by value and by the session's
//! current state. Every server reply is a [`ResponseBlock`]: one or more
//! text lines followed by a line holding only [`SENTINEL`].
//!
//! ## State machine
//!
//! ```text
//!            a            d              p
//!   Menu ───────► Add   Menu ───► Remove   Menu ───► Find
//!    ▲             │ W: add(W)     │ W: remove(W)     │ W: find_anagrams(W)
//!    └──── "<<" ───┴───────────────┴──────────────────┘
//! ```

pub mod response;
pub mod session;

pub use response::{read_block, ResponseBlock};
pub use session::{Session, SessionState};

/// Terminates every response block.
pub const SENTINEL: &str = "^";

/// Sent from a non-menu state to go back to the menu.
pub const RETURN_TO_MENU: &str = "<<";

/// Typed at the client console to end the client. Never sent to the server.
pub const EXIT_PHRASE: &str = "quit program";

/// `true` if `input` is the client exit phrase (case-insensitive).
pub fn is_exit_phrase(input: &str) -> bool {
    input.eq_ignore_ascii_case(EXIT_PHRASE)
}
