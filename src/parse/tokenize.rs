use crate::config::LexerConfig;
use crate::error::Result;
use crate::parse::Lexer;

/// Split a command line into words using POSIX rules (no comments, whitespace
/// splitting).
pub fn split(command: &str) -> Result<Vec<String>> {
    split_with(command, &LexerConfig::default())
}

/// Split a command line with an explicit configuration.
pub fn split_with(command: &str, config: &LexerConfig) -> Result<Vec<String>> {
    Lexer::from_text(command, config.clone()).collect()
}

/// Characters that never need quoting.
fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c)
}

/// Return a shell-escaped version of `word`.
///
/// Blank input becomes `''`. Words made only of safe characters are returned
/// as-is; anything else is single-quoted, with embedded `'` written as
/// `'"'"'` so that `$'b` becomes `'$'"'"'b'`.
pub fn quote(word: &str) -> String {
    if word.trim().is_empty() {
        return "''".into();
    }
    if word.chars().all(is_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', "'\"'\"'"))
}

/// Join words into a command line that splits back into the same words.
pub fn join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
