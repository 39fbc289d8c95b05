//! Error type shared by the lexer, the source resolver, and config loading.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while producing tokens.
///
/// End of input is not an error: [`Lexer::next_token`](crate::Lexer::next_token)
/// reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum LexError {
    /// Input ended inside a quoted string or right after an escape character.
    #[error("No closing quotation")]
    UnterminatedQuotation {
        /// File the unterminated quote was read from, if any.
        origin: Option<PathBuf>,
        /// Line number at which input ran out.
        line: usize,
    },

    /// The underlying reader failed (including invalid UTF-8).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `pop_source` was called with no suspended parent source.
    #[error("source stack is empty")]
    EmptySourceStack,

    /// The source resolver could not open an included file.
    #[error("cannot open included source {name:?}: {source}")]
    Resolve {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration text failed to parse.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be written out as TOML.
    #[error("config serialize error: {0}")]
    ConfigDump(#[from] toml::ser::Error),
}

/// Result type alias using [`LexError`].
pub type Result<T> = std::result::Result<T, LexError>;
