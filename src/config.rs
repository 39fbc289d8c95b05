use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Location of the optional user overlay.
const USER_CONFIG_PATH: &str = "~/.config/shlexer/config.toml";

/// Shell operator characters used when punctuation mode is switched on.
pub const DEFAULT_PUNCTUATION: &str = "();<>|&";

// ── Final (merged) config types ──

/// Behavioural switches for a [`Lexer`](crate::Lexer).
///
/// The lexer copies the config at construction; changing a value afterwards
/// has no effect on a running lexer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LexerConfig {
    /// POSIX quoting: quotes are stripped, `\` escapes, accented letters are
    /// word characters.
    pub posix: bool,
    /// Words end only at whitespace (or punctuation, when enabled).
    pub whitespace_split: bool,
    /// `#` starts a comment that runs to end of line.
    pub comments: bool,
    /// Operator characters that form their own tokens.
    pub punctuation_chars: Punctuation,
    /// Token that includes the file named by the following token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_keyword: Option<String>,
    /// Diagnostic verbosity. Never changes the tokens produced.
    pub debug_level: u8,
    /// Prefix for diagnostic lines.
    pub tag: String,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            posix: true,
            whitespace_split: true,
            comments: false,
            punctuation_chars: Punctuation::Disabled,
            source_keyword: None,
            debug_level: 0,
            tag: "shlex".into(),
        }
    }
}

/// Which characters (if any) are tokenized as operator runs.
///
/// In TOML this is written as `false`, `true` (the default shell set), or a
/// string naming a custom set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "PunctuationRepr", into = "PunctuationRepr")]
pub enum Punctuation {
    #[default]
    Disabled,
    /// `();<>|&`
    Default,
    Custom(String),
}

impl Punctuation {
    /// The active character set; empty when disabled.
    pub fn chars(&self) -> &str {
        match self {
            Punctuation::Disabled => "",
            Punctuation::Default => DEFAULT_PUNCTUATION,
            Punctuation::Custom(chars) => chars,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.chars().is_empty()
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum PunctuationRepr {
    Flag(bool),
    Chars(String),
}

impl From<PunctuationRepr> for Punctuation {
    fn from(repr: PunctuationRepr) -> Self {
        match repr {
            PunctuationRepr::Flag(false) => Punctuation::Disabled,
            PunctuationRepr::Flag(true) => Punctuation::Default,
            PunctuationRepr::Chars(chars) if chars.is_empty() => Punctuation::Disabled,
            PunctuationRepr::Chars(chars) => Punctuation::Custom(chars),
        }
    }
}

impl From<Punctuation> for PunctuationRepr {
    fn from(punct: Punctuation) -> Self {
        match punct {
            Punctuation::Disabled => PunctuationRepr::Flag(false),
            Punctuation::Default => PunctuationRepr::Flag(true),
            Punctuation::Custom(chars) => PunctuationRepr::Chars(chars),
        }
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    posix: Option<bool>,
    whitespace_split: Option<bool>,
    comments: Option<bool>,
    punctuation_chars: Option<Punctuation>,
    source_keyword: Option<String>,
    debug_level: Option<u8>,
    tag: Option<String>,
}

impl LexerConfig {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Parse a complete configuration. Keys that are left out take their
    /// default values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/shlexer/config.toml (if exists)
    ///
    /// Scalars in the overlay override; omitted keys keep their defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load the user overlay.
    fn load_overlay() -> Option<ConfigOverlay> {
        let path = shellexpand::tilde(USER_CONFIG_PATH);
        let content = std::fs::read_to_string(path.as_ref()).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("shlexer: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.posix {
            self.posix = v;
        }
        if let Some(v) = overlay.whitespace_split {
            self.whitespace_split = v;
        }
        if let Some(v) = overlay.comments {
            self.comments = v;
        }
        if let Some(v) = overlay.punctuation_chars {
            self.punctuation_chars = v;
        }
        if let Some(v) = overlay.source_keyword {
            self.source_keyword = Some(v);
        }
        if let Some(v) = overlay.debug_level {
            self.debug_level = v;
        }
        if let Some(v) = overlay.tag {
            self.tag = v;
        }
    }

    /// Serialize the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
