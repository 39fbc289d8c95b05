//! shlexer: a shell-syntax lexer.
//!
//! Splits a character stream into words following POSIX (or looser,
//! non-POSIX) shell quoting, escaping, comment and punctuation rules, and
//! re-quotes words into a command line that splits back into the same words.
//! It is a tokenizer only: nothing is expanded, globbed or executed.
//!
//! ```
//! let words = shlexer::split(r#"cp "my file.txt" 'dest dir'/"#).unwrap();
//! assert_eq!(words, ["cp", "my file.txt", "dest dir/"]);
//! assert_eq!(shlexer::join(&words), "cp 'my file.txt' 'dest dir/'");
//! ```
//!
//! # Architecture
//!
//! - **[`parse`]** — The lexer automaton, its source stack, inclusion resolver, and the split/join/quote facade.
//! - **[`config`]** — Lexer configuration: embedded defaults + user overlay merge.
//! - **[`logging`]** — Diagnostics observer and `log`/`simplelog` setup.
//! - **[`error`]** — The crate error type.

/// Lexer configuration types, loading, and overlay merge logic.
pub mod config;
/// Error type and result alias.
pub mod error;
/// Trace observer and logger initialisation.
pub mod logging;
/// Shell lexing: automaton, sources, inclusion, quoting.
pub mod parse;

pub use config::{LexerConfig, Punctuation};
pub use error::{LexError, Result};
pub use parse::{Lexer, join, quote, split, split_with};
