//! Types shared by the lexer automaton: its states and character classes.

use crate::config::LexerConfig;

const ASCII_WORD_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Latin-1 letters that count as word characters in POSIX mode.
const POSIX_WORD_CHARS: &str =
    "ßàáâãäåæçèéêëìíîïðñòóôõöøùúûüýþÿÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏÐÑÒÓÔÕÖØÙÚÛÜÝÞ";

/// Characters allowed in file names, args and wildcards; word characters
/// whenever punctuation mode is active.
const PUNCTUATION_MODE_WORD_CHARS: &str = "~-./*?=";

/// Where the automaton goes back to after an escaped character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// Unquoted word.
    Word,
    /// Inside the given quote.
    Quote(char),
}

/// Lexer automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Between tokens, skipping whitespace.
    Start,
    /// Accumulating an ordinary word.
    InWord,
    /// Accumulating a run of punctuation characters.
    InPunctuation,
    /// Inside a quoted string opened by the given quote character.
    InQuote(char),
    /// Just after an escape character.
    InEscape(Resume),
    /// The current source is exhausted.
    Done,
}

impl State {
    /// Short name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            State::Start => "start",
            State::InWord => "word",
            State::InPunctuation => "punctuation",
            State::InQuote(_) => "quote",
            State::InEscape(_) => "escape",
            State::Done => "done",
        }
    }
}

/// Character sets derived once from a [`LexerConfig`].
///
/// `word_chars` and `punctuation` are always disjoint.
#[derive(Debug, Clone)]
pub struct CharClasses {
    pub whitespace: &'static str,
    pub quotes: &'static str,
    pub escape: char,
    /// Quotes inside which the escape character is active.
    pub escaped_quotes: &'static str,
    pub commenters: &'static str,
    pub word_chars: String,
    pub punctuation: String,
}

impl CharClasses {
    pub fn new(config: &LexerConfig) -> Self {
        let punctuation = config.punctuation_chars.chars().to_string();

        let mut word_chars = String::from(ASCII_WORD_CHARS);
        if config.posix {
            word_chars.push_str(POSIX_WORD_CHARS);
        }
        if config.punctuation_chars.is_active() {
            word_chars.push_str(PUNCTUATION_MODE_WORD_CHARS);
        }
        word_chars.retain(|c| !punctuation.contains(c));

        Self {
            whitespace: " \t\r\n",
            quotes: "'\"",
            escape: '\\',
            escaped_quotes: "\"",
            commenters: if config.comments { "#" } else { "" },
            word_chars,
            punctuation,
        }
    }

    pub fn is_whitespace(&self, c: char) -> bool {
        self.whitespace.contains(c)
    }

    pub fn is_quote(&self, c: char) -> bool {
        self.quotes.contains(c)
    }

    pub fn is_escape(&self, c: char) -> bool {
        c == self.escape
    }

    pub fn is_escaped_quote(&self, c: char) -> bool {
        self.escaped_quotes.contains(c)
    }

    pub fn is_comment(&self, c: char) -> bool {
        self.commenters.contains(c)
    }

    pub fn is_word(&self, c: char) -> bool {
        self.word_chars.contains(c)
    }

    pub fn is_punctuation(&self, c: char) -> bool {
        self.punctuation.contains(c)
    }

    pub fn punctuation_active(&self) -> bool {
        !self.punctuation.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Punctuation;

    #[test]
    fn posix_includes_accented_letters() {
        let classes = CharClasses::new(&LexerConfig::default());
        assert!(classes.is_word('é'));
        assert!(classes.is_word('ß'));
        assert!(!classes.is_word('~'));
    }

    #[test]
    fn non_posix_excludes_accented_letters() {
        let config = LexerConfig {
            posix: false,
            ..LexerConfig::default()
        };
        let classes = CharClasses::new(&config);
        assert!(!classes.is_word('é'));
        assert!(classes.is_word('z'));
    }

    #[test]
    fn comment_leader_only_when_enabled() {
        let off = CharClasses::new(&LexerConfig::default());
        assert!(!off.is_comment('#'));
        let on = CharClasses::new(&LexerConfig {
            comments: true,
            ..LexerConfig::default()
        });
        assert!(on.is_comment('#'));
    }

    #[test]
    fn punctuation_mode_adds_path_chars() {
        let classes = CharClasses::new(&LexerConfig {
            punctuation_chars: Punctuation::Default,
            ..LexerConfig::default()
        });
        for c in "~-./*?=".chars() {
            assert!(classes.is_word(c), "{c} should be a word char");
        }
        assert!(classes.is_punctuation('&'));
        assert!(!classes.is_word('&'));
    }

    #[test]
    fn punctuation_removed_from_word_chars() {
        let classes = CharClasses::new(&LexerConfig {
            punctuation_chars: Punctuation::Custom("_-".into()),
            ..LexerConfig::default()
        });
        assert!(!classes.is_word('_'));
        assert!(!classes.is_word('-'));
        assert!(classes.is_punctuation('_'));
        assert!(classes.word_chars.chars().all(|c| !classes.is_punctuation(c)));
    }

    #[test]
    fn only_double_quote_allows_escapes() {
        let classes = CharClasses::new(&LexerConfig::default());
        assert!(classes.is_escaped_quote('"'));
        assert!(!classes.is_escaped_quote('\''));
    }
}
