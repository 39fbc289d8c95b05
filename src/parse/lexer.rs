//! The lexer automaton, its source stack, and both pushback buffers.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};

use super::resolve::{FsResolver, SourceResolver};
use super::source::Source;
use super::types::{CharClasses, Resume, State};
use crate::config::LexerConfig;
use crate::error::{LexError, Result};
use crate::logging::{LogObserver, Observer};

/// Shell-syntax lexer over a stack of character sources.
///
/// Each call to [`next_token`](Lexer::next_token) yields one token. Tokens
/// pushed back with [`push_token`](Lexer::push_token) are returned first;
/// when the current source runs dry the lexer falls back to the source that
/// included it, and reports end of input only once the outermost source is
/// exhausted.
pub struct Lexer<'a> {
    config: LexerConfig,
    classes: CharClasses,
    source: Source<'a>,
    /// Suspended parents of `source`, innermost last.
    stack: Vec<Source<'a>>,
    state: State,
    token: String,
    pushback_chars: Vec<char>,
    pushback_tokens: Vec<String>,
    resolver: Box<dyn SourceResolver<'a> + 'a>,
    observer: Option<Box<dyn Observer + 'a>>,
    /// Set once the iterator has yielded an error.
    halted: bool,
}

impl<'a> Lexer<'a> {
    /// Lex a buffered character stream.
    pub fn new(input: impl BufRead + 'a, config: LexerConfig) -> Self {
        Self::with_source(Source::new(Box::new(input), None), config)
    }

    /// Lex an in-memory string.
    pub fn from_text(text: &'a str, config: LexerConfig) -> Self {
        Self::new(text.as_bytes(), config)
    }

    /// Lex an unbuffered byte stream, decoded as UTF-8.
    pub fn from_reader(reader: impl Read + 'a, config: LexerConfig) -> Self {
        Self::new(BufReader::new(reader), config)
    }

    /// Lex a file. Its path becomes the origin used for relative inclusions
    /// and error leaders.
    pub fn open(path: impl AsRef<Path>, config: LexerConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let source = Source::new(Box::new(BufReader::new(file)), Some(path.to_path_buf()));
        Ok(Self::with_source(source, config))
    }

    fn with_source(source: Source<'a>, config: LexerConfig) -> Self {
        let observer: Option<Box<dyn Observer + 'a>> = if config.debug_level > 0 {
            Some(Box::new(LogObserver::new(
                config.tag.clone(),
                config.debug_level,
            )))
        } else {
            None
        };
        Self {
            classes: CharClasses::new(&config),
            config,
            source,
            stack: Vec::new(),
            state: State::Start,
            token: String::new(),
            pushback_chars: Vec::new(),
            pushback_tokens: Vec::new(),
            resolver: Box::new(FsResolver),
            observer,
            halted: false,
        }
    }

    /// Replace the resolver used for source-keyword inclusions.
    pub fn with_resolver(mut self, resolver: impl SourceResolver<'a> + 'a) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Attach a diagnostics observer, replacing any default one.
    pub fn with_observer(mut self, observer: impl Observer + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Characters that may extend an unquoted word.
    pub fn word_chars(&self) -> &str {
        &self.classes.word_chars
    }

    /// Active punctuation characters; empty when punctuation mode is off.
    pub fn punctuation_chars(&self) -> &str {
        &self.classes.punctuation
    }

    /// Line number within the current source.
    pub fn line_number(&self) -> usize {
        self.source.line()
    }

    /// File of the current source, if it came from one.
    pub fn origin(&self) -> Option<&Path> {
        self.source.origin()
    }

    /// Number of suspended parent sources.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// C-compiler style message prefix: `"file", line N: `.
    ///
    /// Missing arguments default to the current source. Relative origins are
    /// made absolute against the working directory.
    pub fn error_leader(&self, origin: Option<&Path>, line: Option<usize>) -> String {
        let file = origin
            .or(self.source.origin())
            .map(|p| {
                std::path::absolute(p)
                    .unwrap_or_else(|_| p.to_path_buf())
                    .display()
                    .to_string()
            })
            .unwrap_or_default();
        let line = line.unwrap_or(self.source.line());
        format!("\"{file}\", line {line}: ")
    }

    /// Suspend the current source and continue reading from `input`.
    pub fn push_source(&mut self, input: Box<dyn BufRead + 'a>, origin: Option<PathBuf>) {
        let parent = mem::replace(&mut self.source, Source::new(input, origin));
        self.stack.push(parent);
        if let Some(obs) = self.observer.as_mut() {
            obs.source_pushed(self.source.origin(), self.stack.len());
        }
        self.set_state(State::Start);
    }

    /// Close the current source and resume its parent.
    pub fn pop_source(&mut self) -> Result<()> {
        let parent = self.stack.pop().ok_or(LexError::EmptySourceStack)?;
        let finished = mem::replace(&mut self.source, parent);
        if let Some(obs) = self.observer.as_mut() {
            obs.source_popped(finished.origin(), self.stack.len());
        }
        drop(finished);
        self.set_state(State::Start);
        Ok(())
    }

    /// Release every remaining source, innermost first. Afterwards the lexer
    /// only reports end of input.
    pub fn close(&mut self) {
        while let Some(parent) = self.stack.pop() {
            drop(mem::replace(&mut self.source, parent));
        }
        self.source = Source::empty();
        self.pushback_chars.clear();
        self.pushback_tokens.clear();
        self.state = State::Done;
    }

    /// Push a token to be returned by the next `next_token` call.
    pub fn push_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        if let Some(obs) = self.observer.as_mut() {
            obs.token_pushed(&token);
        }
        self.pushback_tokens.push(token);
    }

    /// Whether another token is available. The token is read ahead and
    /// pushed back.
    pub fn has_next(&mut self) -> Result<bool> {
        match self.next_token()? {
            Some(token) => {
                self.push_token(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Next token, handling pushback, inclusions, and exhausted sources.
    /// `Ok(None)` means end of input.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        if let Some(token) = self.pushback_tokens.pop() {
            self.emitted(Some(&token));
            return Ok(Some(token));
        }

        loop {
            let raw = self.read_token()?;

            let is_keyword =
                raw.is_some() && raw.as_deref() == self.config.source_keyword.as_deref();
            if is_keyword {
                if let Some(name) = self.read_token()? {
                    let resolved = self.resolver.resolve(&name, self.source.origin())?;
                    self.push_source(resolved.input, resolved.origin);
                }
                continue;
            }

            match raw {
                Some(token) => {
                    self.emitted(Some(&token));
                    return Ok(Some(token));
                }
                None if !self.stack.is_empty() => self.pop_source()?,
                None => {
                    self.set_state(State::Done);
                    self.emitted(None);
                    return Ok(None);
                }
            }
        }
    }

    /// Run the automaton until one raw token is complete. `Ok(None)` means
    /// the current source is exhausted; parents are not consulted.
    pub fn read_token(&mut self) -> Result<Option<String>> {
        let posix = self.config.posix;
        let mut quoted = false;

        loop {
            if self.state == State::Done {
                self.token.clear();
                break;
            }

            let next = match self.pushback_chars.pop() {
                Some(c) => Some(c),
                None => self.source.read_char()?,
            };
            let state = self.state;
            if let Some(obs) = self.observer.as_mut() {
                obs.char_read(state, next);
            }

            let Some(c) = next else {
                match state {
                    State::InQuote(_) | State::InEscape(_) => return Err(self.unterminated()),
                    _ => {
                        self.set_state(State::Done);
                        break;
                    }
                }
            };

            match state {
                State::Start => {
                    if self.classes.is_whitespace(c) {
                        if self.should_emit(quoted) {
                            break;
                        }
                    } else if self.classes.is_comment(c) {
                        self.source.skip_line()?;
                    } else if posix && self.classes.is_escape(c) {
                        self.set_state(State::InEscape(Resume::Word));
                    } else if self.classes.is_word(c) {
                        self.begin_token(c);
                        self.set_state(State::InWord);
                    } else if self.classes.is_punctuation(c) {
                        self.begin_token(c);
                        self.set_state(State::InPunctuation);
                    } else if self.classes.is_quote(c) {
                        if !posix {
                            self.begin_token(c);
                        }
                        self.set_state(State::InQuote(c));
                    } else if self.config.whitespace_split {
                        self.begin_token(c);
                        self.set_state(State::InWord);
                    } else {
                        self.begin_token(c);
                        break;
                    }
                }

                State::InQuote(q) => {
                    quoted = true;
                    if c == q {
                        if posix {
                            self.set_state(State::InWord);
                        } else {
                            self.token.push(c);
                            self.set_state(State::Start);
                            break;
                        }
                    } else if posix && self.classes.is_escape(c) && self.classes.is_escaped_quote(q) {
                        self.set_state(State::InEscape(Resume::Quote(q)));
                    } else {
                        self.token.push(c);
                    }
                }

                State::InEscape(resume) => {
                    // Inside quotes only the quote itself and the escape
                    // character can be escaped; anything else keeps its backslash.
                    if let Resume::Quote(q) = resume
                        && c != q
                        && !self.classes.is_escape(c)
                    {
                        self.token.push(self.classes.escape);
                    }
                    self.token.push(c);
                    self.set_state(match resume {
                        Resume::Word => State::InWord,
                        Resume::Quote(q) => State::InQuote(q),
                    });
                }

                State::InWord | State::InPunctuation => {
                    if self.classes.is_whitespace(c) {
                        self.set_state(State::Start);
                        if self.should_emit(quoted) {
                            break;
                        }
                    } else if self.classes.is_comment(c) {
                        self.source.skip_line()?;
                        if posix {
                            self.set_state(State::Start);
                            if self.should_emit(quoted) {
                                break;
                            }
                        }
                    } else if state == State::InPunctuation {
                        if self.classes.is_punctuation(c) {
                            self.token.push(c);
                        } else {
                            self.pushback_chars.push(c);
                            self.set_state(State::Start);
                            break;
                        }
                    } else if posix && self.classes.is_quote(c) {
                        self.set_state(State::InQuote(c));
                    } else if posix && self.classes.is_escape(c) {
                        self.set_state(State::InEscape(Resume::Word));
                    } else if self.classes.is_word(c)
                        || self.classes.is_quote(c)
                        || (self.config.whitespace_split && !self.classes.is_punctuation(c))
                    {
                        self.token.push(c);
                    } else {
                        if self.classes.punctuation_active() {
                            self.pushback_chars.push(c);
                        } else {
                            self.pushback_tokens.push(c.to_string());
                        }
                        self.set_state(State::Start);
                        if self.should_emit(quoted) {
                            break;
                        }
                    }
                }

                State::Done => break,
            }
        }

        let token = mem::take(&mut self.token);
        let result = if token.is_empty() && !(posix && quoted) {
            None
        } else {
            Some(token)
        };
        if let Some(obs) = self.observer.as_mut() {
            obs.raw_token(result.as_deref());
        }
        Ok(result)
    }

    /// A token ends here if it has content, or if it was an explicit `''`.
    fn should_emit(&self, quoted: bool) -> bool {
        !self.token.is_empty() || (self.config.posix && quoted)
    }

    fn begin_token(&mut self, c: char) {
        self.token.clear();
        self.token.push(c);
    }

    fn set_state(&mut self, to: State) {
        let from = self.state;
        if from != to
            && let Some(obs) = self.observer.as_mut()
        {
            obs.state_changed(from, to);
        }
        self.state = to;
    }

    fn emitted(&mut self, token: Option<&str>) {
        if let Some(obs) = self.observer.as_mut() {
            obs.token_emitted(token);
        }
    }

    fn unterminated(&self) -> LexError {
        LexError::UnterminatedQuotation {
            origin: self.source.origin().map(Path::to_path_buf),
            line: self.source.line(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(e) => {
                self.halted = true;
                Some(Err(e))
            }
        }
    }
}

impl Drop for Lexer<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("source", &self.source)
            .field("depth", &self.stack.len())
            .field("pushback_chars", &self.pushback_chars)
            .field("pushback_tokens", &self.pushback_tokens)
            .finish_non_exhaustive()
    }
}
