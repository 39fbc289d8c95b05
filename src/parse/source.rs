//! One character input stream with its file identity and line counter.

use std::fmt;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// A character stream being lexed.
///
/// Bytes are decoded as UTF-8 one character at a time, so the lexer never
/// reads further ahead than the underlying `BufRead` buffers.
pub struct Source<'a> {
    input: Box<dyn BufRead + 'a>,
    origin: Option<PathBuf>,
    line: usize,
}

impl<'a> Source<'a> {
    pub fn new(input: Box<dyn BufRead + 'a>, origin: Option<PathBuf>) -> Self {
        Self {
            input,
            origin,
            line: 1,
        }
    }

    /// A source that is already at end of input.
    pub fn empty() -> Self {
        Self::new(Box::new(io::empty()), None)
    }

    /// File this source was opened from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Current line number (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the next character, or `None` at end of this stream.
    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };
        let width = utf8_width(first)?;
        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(truncated_utf8)?;
        }
        let text = std::str::from_utf8(&buf[..width])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let c = text.chars().next().ok_or_else(truncated_utf8)?;
        if c == '\n' {
            self.line += 1;
        }
        Ok(Some(c))
    }

    /// Discard everything up to and including the next newline.
    pub fn skip_line(&mut self) -> io::Result<()> {
        while let Some(c) = self.read_char()? {
            if c == '\n' {
                break;
            }
        }
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.input.fill_buf() {
                Ok(buf) => break buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if byte.is_some() {
            self.input.consume(1);
        }
        Ok(byte)
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("origin", &self.origin)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

/// Encoded length of a UTF-8 sequence from its leading byte.
fn utf8_width(first: u8) -> io::Result<usize> {
    match first {
        0x00..=0x7F => Ok(1),
        0xC2..=0xDF => Ok(2),
        0xE0..=0xEF => Ok(3),
        0xF0..=0xF4 => Ok(4),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid UTF-8 leading byte 0x{first:02x}"),
        )),
    }
}

fn truncated_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "truncated UTF-8 sequence")
}
