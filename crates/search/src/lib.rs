//! ANSI-aware search-and-label engine for flashcopy.
//!
//! Strips captured pane lines to their visible text, finds a query inside
//! word tokens, assigns single-keystroke labels, and re-renders the styled
//! originals with dim/highlight/label styling. Pure and synchronous; all
//! I/O lives in the binary.

mod config;
mod engine;
mod matcher;
mod render;
mod state;
mod style;
mod tokenize;

pub use config::{
    DEFAULT_DIM_STYLE, DEFAULT_HIGHLIGHT_STYLE, DEFAULT_IDLE_TIMEOUT, DEFAULT_IDLE_WARNING,
    DEFAULT_LABEL_STYLE, DEFAULT_WORD_SEPARATORS, SessionConfig,
};
pub use engine::{SearchConfig, SearchEngine};
pub use matcher::{DEFAULT_LABEL_ALPHABET, MatchSet, SearchMatch};
pub use render::Renderer;
pub use state::{Frame, SearchSession, SessionStatus};
pub use style::{PlainLine, RESET, map_plain_to_styled, strip, wrap_styled_range};
pub use tokenize::{Token, Tokens, tokenize};
