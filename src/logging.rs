//! Lexer diagnostics: an observer hook and `log`/`simplelog` wiring.
//!
//! The lexer never logs on its own. It calls an [`Observer`] at fixed trace
//! points; [`LogObserver`] forwards those calls to the `log` facade, and
//! [`init`] installs a stderr logger for the binary.

use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, SimpleLogger, TermLogger, TerminalMode};

use crate::parse::State;

/// Receives lexer trace events. Every method defaults to a no-op.
pub trait Observer {
    /// The automaton is about to handle `ch` (`None` at end of stream) in `state`.
    fn char_read(&mut self, _state: State, _ch: Option<char>) {}
    /// The automaton moved from one state to another.
    fn state_changed(&mut self, _from: State, _to: State) {}
    /// A raw read finished; `None` means end of the current source.
    fn raw_token(&mut self, _token: Option<&str>) {}
    /// `next_token` returned a token, or `None` at end of input.
    fn token_emitted(&mut self, _token: Option<&str>) {}
    /// A token was pushed back.
    fn token_pushed(&mut self, _token: &str) {}
    /// A nested source became current.
    fn source_pushed(&mut self, _origin: Option<&Path>, _depth: usize) {}
    /// A nested source was exhausted and closed.
    fn source_popped(&mut self, _origin: Option<&Path>, _depth: usize) {}
}

/// Forwards trace events to the `log` crate.
///
/// Level 1 reports sources and tokens, level 2 adds raw reads and state
/// changes, level 3 adds every character.
#[derive(Debug, Clone)]
pub struct LogObserver {
    tag: String,
    level: u8,
}

impl LogObserver {
    pub fn new(tag: impl Into<String>, level: u8) -> Self {
        Self {
            tag: tag.into(),
            level,
        }
    }
}

fn describe(origin: Option<&Path>) -> String {
    origin
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stream>".into())
}

impl Observer for LogObserver {
    fn char_read(&mut self, state: State, ch: Option<char>) {
        if self.level >= 3 {
            log::trace!("{}: in state {:?} I see character: {:?}", self.tag, state, ch);
        }
    }

    fn state_changed(&mut self, from: State, to: State) {
        if self.level >= 2 {
            log::trace!("{}: {} -> {}", self.tag, from.as_str(), to.as_str());
        }
    }

    fn raw_token(&mut self, token: Option<&str>) {
        if self.level >= 2 {
            match token {
                Some(t) => log::debug!("{}: raw token={:?}", self.tag, t),
                None => log::debug!("{}: raw token=EOF", self.tag),
            }
        }
    }

    fn token_emitted(&mut self, token: Option<&str>) {
        if self.level >= 1 {
            match token {
                Some(t) => log::debug!("{}: token={:?}", self.tag, t),
                None => log::debug!("{}: token=EOF", self.tag),
            }
        }
    }

    fn token_pushed(&mut self, token: &str) {
        if self.level >= 1 {
            log::debug!("{}: pushing token {:?}", self.tag, token);
        }
    }

    fn source_pushed(&mut self, origin: Option<&Path>, depth: usize) {
        if self.level >= 1 {
            log::debug!(
                "{}: pushing source {} (depth {depth})",
                self.tag,
                describe(origin)
            );
        }
    }

    fn source_popped(&mut self, origin: Option<&Path>, depth: usize) {
        if self.level >= 1 {
            log::debug!(
                "{}: popping source {} (depth {depth})",
                self.tag,
                describe(origin)
            );
        }
    }
}

/// Level filter for a lexer debug level.
pub fn level_filter(debug_level: u8) -> LevelFilter {
    match debug_level {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a stderr logger for the given debug level.
/// Best-effort: a logger that is already installed is left in place.
pub fn init(debug_level: u8) {
    let filter = level_filter(debug_level);
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if TermLogger::init(filter, config.clone(), TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        let _ = SimpleLogger::init(filter, config);
    }
}
