use std::fs;

use shlexer::{LexError, Lexer, LexerConfig, Punctuation, join, quote, split, split_with};

// Test data derived from shellwords by Hartmut Goebel.
// Format: `input|token|token|...|`; a literal `\n` in the input is a newline.
const COMPAT_DATA: &str = include_str!("data/shellwords_compat.txt");
const POSIX_DATA: &str = include_str!("data/shellwords_posix.txt");

fn parse_table(data: &str) -> Vec<(String, Vec<String>)> {
    data.lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields: Vec<&str> = line.split('|').collect();
            fields.pop();
            let input = fields[0].replace(r"\n", "\n");
            let expected = fields[1..].iter().map(|s| s.to_string()).collect();
            (input, expected)
        })
        .collect()
}

fn posix_comments() -> LexerConfig {
    LexerConfig {
        comments: true,
        ..LexerConfig::default()
    }
}

/// The classic non-POSIX lexer: quotes kept, no whitespace splitting.
fn compat() -> LexerConfig {
    LexerConfig {
        posix: false,
        whitespace_split: false,
        comments: true,
        ..LexerConfig::default()
    }
}

fn punctuation(whitespace_split: bool) -> LexerConfig {
    LexerConfig {
        posix: false,
        whitespace_split,
        punctuation_chars: Punctuation::Default,
        ..LexerConfig::default()
    }
}

fn words(command: &str) -> Vec<String> {
    split(command).unwrap()
}

macro_rules! split_test {
    ($name:ident, $cmd:expr, [$($tok:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            let expected: Vec<&str> = vec![$($tok),*];
            assert_eq!(words($cmd), expected, "command: {:?}", $cmd);
        }
    };
}

// ── Literal scenarios ──

split_test!(plain_words, "foo bar", ["foo", "bar"]);
split_test!(mixed_quotes, "\"foo\" bar 'bla'", ["foo", "bar", "bla"]);
split_test!(empty_single_quotes, "''", [""]);
split_test!(empty_double_quotes, "\"\"", [""]);
split_test!(escaped_space, r"foo\ bar", ["foo bar"]);
split_test!(adjacent_quotes_concatenate, r#""foo""bar"'baz'"#, ["foobarbaz"]);
split_test!(quote_inside_word, "--name='a b'", ["--name=a b"]);
split_test!(leading_and_trailing_space, "  x  ", ["x"]);
split_test!(tabs_and_newlines, "a\tb\nc\r\nd", ["a", "b", "c", "d"]);
split_test!(empty_input, "", []);
split_test!(accented_word, "café naïve", ["café", "naïve"]);
split_test!(unicode_word, "ℙƴ☂ ℌøἤ", ["ℙƴ☂", "ℌøἤ"]);
split_test!(escaped_quote_outside_quotes, r#"say \"hi\""#, ["say", "\"hi\""]);
split_test!(backslash_kept_in_double_quotes, r#""a\$b""#, [r"a\$b"]);
split_test!(backslash_kept_in_single_quotes, r"'a\\b'", [r"a\\b"]);

#[test]
fn non_posix_keeps_quotes() {
    let config = LexerConfig {
        posix: false,
        ..LexerConfig::default()
    };
    assert_eq!(split_with("\"foo\"", &config).unwrap(), vec!["\"foo\""]);
}

#[test]
fn unterminated_double_quote() {
    assert!(matches!(
        split("\"foo"),
        Err(LexError::UnterminatedQuotation { .. })
    ));
}

#[test]
fn unterminated_single_quote() {
    assert!(matches!(
        split("echo 'foo"),
        Err(LexError::UnterminatedQuotation { .. })
    ));
}

#[test]
fn unterminated_escape_in_quotes() {
    assert!(matches!(
        split(r#""foo\"#),
        Err(LexError::UnterminatedQuotation { .. })
    ));
}

// ── Compatibility tables ──

#[test]
fn split_posix_table() {
    for (input, expected) in parse_table(POSIX_DATA) {
        let got = split_with(&input, &posix_comments()).unwrap();
        assert_eq!(got, expected, "input: {input:?}");
    }
}

#[test]
fn split_compat_table() {
    for (input, expected) in parse_table(COMPAT_DATA) {
        let got: Vec<String> = Lexer::from_text(&input, compat())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(got, expected, "input: {input:?}");
    }
}

#[test]
fn compat_table_via_next_token() {
    for (input, expected) in parse_table(COMPAT_DATA) {
        let mut lex = Lexer::from_text(&input, compat());
        let mut got = Vec::new();
        while let Some(tok) = lex.next_token().unwrap() {
            got.push(tok);
        }
        assert_eq!(got, expected, "input: {input:?}");
    }
}

// ── Punctuation ──

#[test]
fn split_ampersand_and_pipe() {
    for delimiter in ["&&", "&", "|&", ";&", ";;&", "||", "|", "&|", ";|", ";;|"] {
        let sources = [
            format!("echo hi {delimiter} echo bye"),
            format!("echo hi{delimiter}echo bye"),
        ];
        for src in &sources {
            for ws in [false, true] {
                let got = split_with(src, &punctuation(ws)).unwrap();
                assert_eq!(
                    got,
                    vec!["echo", "hi", delimiter, "echo", "bye"],
                    "input: {src:?}, whitespace_split: {ws}"
                );
            }
        }
    }
}

#[test]
fn split_semicolon() {
    for delimiter in [";", ";;", ";&", ";;&"] {
        let sources = [
            format!("echo hi {delimiter} echo bye"),
            format!("echo hi{delimiter} echo bye"),
            format!("echo hi{delimiter}echo bye"),
        ];
        for src in &sources {
            for ws in [false, true] {
                let got = split_with(src, &punctuation(ws)).unwrap();
                assert_eq!(got, vec!["echo", "hi", delimiter, "echo", "bye"], "input: {src:?}");
            }
        }
    }
}

#[test]
fn split_redirect() {
    for delimiter in ["<", "|"] {
        let sources = [
            format!("echo hi {delimiter} out"),
            format!("echo hi{delimiter} out"),
            format!("echo hi{delimiter}out"),
        ];
        for src in &sources {
            let got = split_with(src, &punctuation(false)).unwrap();
            assert_eq!(got, vec!["echo", "hi", delimiter, "out"], "input: {src:?}");
        }
    }
}

#[test]
fn split_parens() {
    for src in ["( echo hi )", "(echo hi)"] {
        for ws in [false, true] {
            let got = split_with(src, &punctuation(ws)).unwrap();
            assert_eq!(got, vec!["(", "echo", "hi", ")"], "input: {src:?}");
        }
    }
}

#[test]
fn posix_and_punctuation_with_default_config() {
    let config = LexerConfig {
        punctuation_chars: Punctuation::Default,
        ..LexerConfig::default()
    };
    for src in ["echo hi && echo bye", "echo hi&&echo bye"] {
        assert_eq!(
            split_with(src, &config).unwrap(),
            vec!["echo", "hi", "&&", "echo", "bye"]
        );
    }
}

#[test]
fn split_custom_punctuation() {
    let ss = "~/a&&b-c --color=auto||d *.py?";
    let config = LexerConfig {
        posix: false,
        whitespace_split: false,
        punctuation_chars: Punctuation::Custom("|".into()),
        ..LexerConfig::default()
    };
    assert_eq!(
        split_with(ss, &config).unwrap(),
        vec!["~/a", "&", "&", "b-c", "--color=auto", "||", "d", "*.py?"]
    );

    let config = LexerConfig {
        whitespace_split: true,
        ..config
    };
    assert_eq!(
        split_with(ss, &config).unwrap(),
        vec!["~/a&&b-c", "--color=auto", "||", "d", "*.py?"]
    );
}

#[test]
fn token_types() {
    let lex = Lexer::from_text("a && b || c", punctuation(false));
    let punct = lex.punctuation_chars().to_string();
    let observed: Vec<(String, char)> = lex
        .map(|t| {
            let t = t.unwrap();
            let kind = if t.chars().all(|c| punct.contains(c)) { 'c' } else { 'a' };
            (t, kind)
        })
        .collect();
    let expected = vec![
        ("a".to_string(), 'a'),
        ("&&".to_string(), 'c'),
        ("b".to_string(), 'a'),
        ("||".to_string(), 'c'),
        ("c".to_string(), 'a'),
    ];
    assert_eq!(observed, expected);
}

#[test]
fn punctuation_removed_from_word_chars() {
    let config = LexerConfig {
        posix: false,
        whitespace_split: false,
        punctuation_chars: Punctuation::Custom("_".into()),
        ..LexerConfig::default()
    };
    let lex = Lexer::from_text("a_b__c", config);
    assert!(!lex.word_chars().contains('_'));
    let got: Vec<String> = lex.collect::<Result<_, _>>().unwrap();
    assert_eq!(got, vec!["a", "_", "b", "__", "c"]);
}

#[test]
fn punctuation_with_whitespace_split() {
    for ws in [false, true] {
        assert_eq!(
            split_with("a  && b  ||  c", &punctuation(ws)).unwrap(),
            vec!["a", "&&", "b", "||", "c"]
        );
    }
}

#[test]
fn punctuation_with_posix() {
    let config = LexerConfig {
        punctuation_chars: Punctuation::Default,
        ..LexerConfig::default()
    };
    assert_eq!(
        split_with("f >\"abc\"", &config).unwrap(),
        vec!["f", ">", "abc"]
    );
    assert_eq!(
        split_with(r#"f >\"abc\""#, &config).unwrap(),
        vec!["f", ">", "\"abc\""]
    );
}

#[test]
fn empty_string_handling() {
    for punct in [Punctuation::Disabled, Punctuation::Default] {
        let posix = LexerConfig {
            whitespace_split: false,
            punctuation_chars: punct.clone(),
            ..LexerConfig::default()
        };
        assert_eq!(
            split_with("'')abc", &posix).unwrap(),
            vec!["", ")", "abc"]
        );

        let non_posix = LexerConfig {
            posix: false,
            ..posix
        };
        assert_eq!(
            split_with("'')abc", &non_posix).unwrap(),
            vec!["''", ")", "abc"]
        );
    }
}

#[test]
fn unicode_handling() {
    let ss = "\u{2119}\u{01b4}\u{2602}\u{210c}\u{00f8}\u{1f24}";
    // One complete token with whitespace splitting.
    assert_eq!(split_with(ss, &punctuation(true)).unwrap(), vec![ss]);
    // Without it, word chars decide and every char stands alone.
    let each: Vec<String> = ss.chars().map(String::from).collect();
    assert_eq!(split_with(ss, &punctuation(false)).unwrap(), each);
}

// ── Quoting ──

#[test]
fn quote_empty() {
    assert_eq!(quote(""), "''");
}

#[test]
fn quote_safe_characters_unchanged() {
    let safe = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@%_-+=:,./";
    assert_eq!(quote(safe), safe);
}

#[test]
fn quote_spaces() {
    assert_eq!(quote("test file name"), "'test file name'");
    assert_eq!(quote("a "), "'a '");
}

#[test]
fn quote_unsafe_characters() {
    for u in ['"', '`', '$', '\\', '!', '\u{e9}', '\u{e0}', '\u{df}'] {
        assert_eq!(quote(&format!("test{u}name")), format!("'test{u}name'"));
        assert_eq!(
            quote(&format!("test{u}'name'")),
            format!("'test{u}'\"'\"'name'\"'\"''")
        );
    }
}

#[test]
fn join_examples() {
    assert_eq!(join(["a ", "b"]), "'a ' b");
    assert_eq!(join(["a", " b"]), "a ' b'");
    assert_eq!(join(["\"a", "b\""]), "'\"a' 'b\"'");
}

#[test]
fn join_blank_word_becomes_empty_quotes() {
    assert_eq!(join(["a", " ", "b"]), "a '' b");
}

#[test]
fn join_round_trip() {
    let tables = parse_table(COMPAT_DATA)
        .into_iter()
        .chain(parse_table(POSIX_DATA));
    for (input, expected) in tables {
        let joined = join(&expected);
        assert_eq!(words(&joined), expected, "input: {input:?}, joined: {joined:?}");
    }
}

#[test]
fn quote_splits_back_to_one_word() {
    for word in ["", "plain", "two words", "it's", "$HOME", "a\"b", "tab\there", "ünï"] {
        assert_eq!(words(&quote(word)), vec![word], "word: {word:?}");
    }
}

// ── Agreement with the shlex crate ──

#[test]
fn agrees_with_shlex_crate_on_common_inputs() {
    let inputs = [
        "foo bar",
        " foo   bar ",
        "'foo bar' baz",
        "\"foo bar\" baz",
        r"foo\ bar",
        "a'b'c\"d\"",
        "''",
        r#""a\"b""#,
        r#""a\\b""#,
        "--flag=value path/to/file",
    ];
    for input in inputs {
        let ours = split(input).unwrap();
        let theirs = shlex::split(input).unwrap();
        assert_eq!(ours, theirs, "input: {input:?}");
    }
}

// ── Source inclusion ──

#[test]
fn source_keyword_includes_files_relative_to_parent() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("main.conf"), "alpha source sub/inc.conf omega\n").unwrap();
    fs::write(
        dir.path().join("sub/inc.conf"),
        "beta 'gamma delta'\nsource more.conf\n",
    )
    .unwrap();
    fs::write(dir.path().join("sub/more.conf"), "epsilon").unwrap();

    let config = LexerConfig {
        source_keyword: Some("source".into()),
        ..LexerConfig::default()
    };
    let lex = Lexer::open(dir.path().join("main.conf"), config).unwrap();
    let got: Vec<String> = lex.collect::<Result<_, _>>().unwrap();
    assert_eq!(got, vec!["alpha", "beta", "gamma delta", "epsilon", "omega"]);
}

#[test]
fn included_file_tracks_origin_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.conf");
    let inc = dir.path().join("inc.conf");
    fs::write(&main, "source inc.conf\nafter\n").unwrap();
    fs::write(&inc, "one\ntwo\n'broken\n").unwrap();

    let config = LexerConfig {
        source_keyword: Some("source".into()),
        ..LexerConfig::default()
    };
    let mut lex = Lexer::open(&main, config).unwrap();
    assert_eq!(lex.next_token().unwrap().as_deref(), Some("one"));
    assert_eq!(lex.origin(), Some(inc.as_path()));
    assert_eq!(lex.depth(), 1);
    assert_eq!(lex.next_token().unwrap().as_deref(), Some("two"));
    match lex.next_token() {
        Err(LexError::UnterminatedQuotation { origin, line }) => {
            assert_eq!(origin.as_deref(), Some(inc.as_path()));
            assert_eq!(line, 4);
        }
        other => panic!("expected unterminated quotation, got {other:?}"),
    }
    assert_eq!(
        lex.error_leader(None, None),
        format!("\"{}\", line 4: ", inc.display())
    );
}

#[test]
fn missing_include_is_resolve_error() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.conf");
    fs::write(&main, "source nowhere.conf").unwrap();
    let config = LexerConfig {
        source_keyword: Some("source".into()),
        ..LexerConfig::default()
    };
    let mut lex = Lexer::open(&main, config).unwrap();
    assert!(matches!(lex.next_token(), Err(LexError::Resolve { .. })));
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Lexer::open(dir.path().join("absent"), LexerConfig::default()).unwrap_err();
    assert!(matches!(err, LexError::Io(_)));
}
