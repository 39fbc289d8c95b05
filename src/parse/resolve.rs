//! Turning the token after a `source` keyword into a new input stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{LexError, Result};

/// A stream produced for an inclusion, plus the file it came from.
pub struct ResolvedSource<'a> {
    pub input: Box<dyn BufRead + 'a>,
    pub origin: Option<PathBuf>,
}

/// Resolves the name following the source keyword into a stream.
///
/// `current` is the file of the source that contained the keyword, so
/// relative names can be resolved against it.
pub trait SourceResolver<'a> {
    fn resolve(&mut self, name: &str, current: Option<&Path>) -> Result<ResolvedSource<'a>>;
}

/// Opens included files from the filesystem, cpp-style: relative paths are
/// resolved against the directory of the including file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsResolver;

impl FsResolver {
    /// The path an inclusion name refers to, without touching the filesystem.
    pub fn resolve_path(name: &str, current: Option<&Path>) -> PathBuf {
        let name = name
            .strip_prefix('"')
            .map(|rest| rest.strip_suffix('"').unwrap_or(rest))
            .unwrap_or(name);
        let expanded = PathBuf::from(shellexpand::tilde(name).as_ref());
        if expanded.is_absolute() {
            return expanded;
        }
        match current.and_then(Path::parent) {
            Some(dir) => dir.join(expanded),
            None => expanded,
        }
    }
}

impl<'a> SourceResolver<'a> for FsResolver {
    fn resolve(&mut self, name: &str, current: Option<&Path>) -> Result<ResolvedSource<'a>> {
        let path = Self::resolve_path(name, current);
        let file = File::open(&path).map_err(|source| LexError::Resolve {
            name: name.to_string(),
            source,
        })?;
        Ok(ResolvedSource {
            input: Box::new(BufReader::new(file)),
            origin: Some(path),
        })
    }
}
