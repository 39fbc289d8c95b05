pub mod lexer;
pub mod resolve;
pub mod source;
pub mod tokenize;
pub mod types;

pub use lexer::Lexer;
pub use resolve::{FsResolver, ResolvedSource, SourceResolver};
pub use source::Source;
pub use tokenize::{join, quote, split, split_with};
pub use types::{CharClasses, Resume, State};
