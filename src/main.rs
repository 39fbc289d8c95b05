//! shlexer: split, join, or quote shell command lines.
//!
//! Reads stdin and writes the result to stdout:
//!   - `shlexer [split]` prints the words as a JSON array
//!   - `shlexer join` reads a JSON array of words and prints a command line
//!   - `shlexer quote` prints the whole input as one quoted word
//!
//! Lexer flags override the loaded configuration.

use std::io::Read;

use clap::{Parser, Subcommand};
use shlexer::{LexerConfig, Punctuation};

/// Split, join, or quote shell command lines read from stdin.
#[derive(Parser, Debug)]
#[command(name = "shlexer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Split, join, or quote shell command lines", long_about = None)]
struct Cli {
    /// Use the looser non-POSIX rules (quotes stay in words, no escapes)
    #[arg(long, global = true)]
    non_posix: bool,

    /// Treat `#` as the start of a comment
    #[arg(long, global = true)]
    comments: bool,

    /// Split only on whitespace and punctuation, not on every non-word char
    #[arg(long, global = true)]
    no_whitespace_split: bool,

    /// Tokenize operator runs; CHARS replaces the default `();<>|&` set
    #[arg(long, global = true, value_name = "CHARS", num_args = 0..=1, require_equals = true)]
    punctuation: Option<Option<String>>,

    /// Word that includes the file named by the following token
    #[arg(long, global = true, value_name = "KEYWORD")]
    source: Option<String>,

    /// Trace level: 1 sources and tokens, 2 state changes, 3 every char
    #[arg(long, global = true, value_name = "N")]
    debug: Option<u8>,

    /// Print the effective configuration as TOML and exit
    #[arg(long, global = true)]
    dump_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// What to do with stdin. Defaults to `split`.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print the words of the input as a JSON array
    Split,
    /// Read a JSON array of words and print a command line
    Join,
    /// Print the whole input as one quoted word
    Quote,
}

impl Cli {
    fn mode(&self) -> Command {
        self.command.unwrap_or(Command::Split)
    }

    /// Apply the lexer flags on top of a base configuration.
    fn lexer_config(&self, mut config: LexerConfig) -> LexerConfig {
        if self.non_posix {
            config.posix = false;
        }
        if self.comments {
            config.comments = true;
        }
        if self.no_whitespace_split {
            config.whitespace_split = false;
        }
        match self.punctuation.as_ref() {
            None => {}
            Some(None) => config.punctuation_chars = Punctuation::Default,
            Some(Some(chars)) if chars.is_empty() => {
                config.punctuation_chars = Punctuation::Disabled;
            }
            Some(Some(chars)) => config.punctuation_chars = Punctuation::Custom(chars.clone()),
        }
        if let Some(keyword) = &self.source {
            config.source_keyword = (!keyword.is_empty()).then(|| keyword.clone());
        }
        if let Some(level) = self.debug {
            config.debug_level = level;
        }
        config
    }
}

/// Produce the output text for one run.
fn run(mode: Command, config: &LexerConfig, input: &str) -> Result<String, String> {
    match mode {
        Command::Split => {
            let words = shlexer::split_with(input, config).map_err(|e| e.to_string())?;
            serde_json::to_string(&words).map_err(|e| e.to_string())
        }
        Command::Join => {
            let words: Vec<String> =
                serde_json::from_str(input).map_err(|e| format!("JSON parse error: {e}"))?;
            Ok(shlexer::join(&words))
        }
        Command::Quote => {
            let word = input.strip_suffix('\n').unwrap_or(input);
            Ok(shlexer::quote(word))
        }
    }
}

// ─── Entry point ─────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let config = cli.lexer_config(LexerConfig::load());

    shlexer::logging::init(config.debug_level);

    if cli.dump_config {
        match config.to_toml_string() {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("shlexer: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {e}");
        std::process::exit(1);
    }

    match run(cli.mode(), &config, &input) {
        Ok(output) => println!("{output}"),
        Err(msg) => {
            eprintln!("shlexer: {msg}");
            std::process::exit(1);
        }
    }
}

// ─── Tests ───────────────────────────────────────────
