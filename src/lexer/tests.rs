//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer literals and overflow
//! - String literals and their error cases
//! - Operators and punctuation
//! - Comments
//! - Line and column tracking

use crate::errors::diagnostics::Diagnostics;
use crate::Position;

use super::{lexer::tokenize, tokens::{Token, TokenKind}};

fn lex(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(source, &mut diagnostics);
    (tokens, diagnostics)
}

#[test]
fn test_tokenize_keywords() {
    let (tokens, diagnostics) =
        lex("int bool void true false struct cin cout if else while return");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[1].kind, TokenKind::Bool);
    assert_eq!(tokens[2].kind, TokenKind::Void);
    assert_eq!(tokens[3].kind, TokenKind::True);
    assert_eq!(tokens[4].kind, TokenKind::False);
    assert_eq!(tokens[5].kind, TokenKind::Struct);
    assert_eq!(tokens[6].kind, TokenKind::Cin);
    assert_eq!(tokens[7].kind, TokenKind::Cout);
    assert_eq!(tokens[8].kind, TokenKind::If);
    assert_eq!(tokens[9].kind, TokenKind::Else);
    assert_eq!(tokens[10].kind, TokenKind::While);
    assert_eq!(tokens[11].kind, TokenKind::Return);
    assert_eq!(tokens[12].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let (tokens, _) = lex("foo bar baz_123 _underscore integer");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "integer");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let (tokens, diagnostics) = lex("42 0 007");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].value, "007");
}

#[test]
fn test_integer_too_large_is_clamped_with_warning() {
    let (tokens, diagnostics) = lex("x = 99999999999;");

    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].value, i32::MAX.to_string());
    assert_eq!(diagnostics.warning_count(), 1);
    assert!(!diagnostics.has_errors());
    assert_eq!(
        diagnostics.to_string(),
        "1:5 ***WARNING*** Integer literal too large; using max value\n"
    );
}

#[test]
fn test_tokenize_strings_keep_escapes() {
    let (tokens, diagnostics) = lex(r#""hello" "tab\there" "quote\"d" """#);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "tab\\there");
    assert_eq!(tokens[2].value, "quote\\\"d");
    assert_eq!(tokens[3].value, "");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_unterminated_string_is_ignored() {
    let (tokens, diagnostics) = lex("cout << \"oops\nx;");

    assert_eq!(tokens[0].kind, TokenKind::Cout);
    assert_eq!(tokens[1].kind, TokenKind::WriteOp);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].span.start, Position(2, 1));
    assert_eq!(
        diagnostics.to_string(),
        "1:9 ***ERROR*** Unterminated string literal ignored\n"
    );
}

#[test]
fn test_bad_escape_is_ignored() {
    let (tokens, diagnostics) = lex(r#""bad\q" x"#);

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(
        diagnostics.messages(),
        vec!["String literal with bad escaped character ignored"]
    );
}

#[test]
fn test_unterminated_bad_escape() {
    let (_, diagnostics) = lex("\"bad\\q");

    assert_eq!(
        diagnostics.messages(),
        vec!["Unterminated string literal with bad escaped character ignored"]
    );
}

#[test]
fn test_escaped_quote_does_not_terminate() {
    let (tokens, diagnostics) = lex(r#""abc\""#);

    assert_eq!(tokens[0].kind, TokenKind::EOF);
    assert_eq!(diagnostics.messages(), vec!["Unterminated string literal ignored"]);
}

#[test]
fn test_tokenize_operators() {
    let (tokens, _) = lex("+ - * / ! && || == != < > <= >= = ++ -- << >>");

    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Not,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::WriteOp,
            TokenKind::ReadOp,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let (tokens, _) = lex("( ) { } . , ;");

    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].kind, TokenKind::CloseParen);
    assert_eq!(tokens[2].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[3].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[4].kind, TokenKind::Dot);
    assert_eq!(tokens[5].kind, TokenKind::Comma);
    assert_eq!(tokens[6].kind, TokenKind::Semicolon);
    assert_eq!(tokens[7].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_comments() {
    let (tokens, _) = lex("int x; // trailing\n# whole line\nbool y;");

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[1].value, "x");
    assert_eq!(tokens[2].kind, TokenKind::Semicolon);
    assert_eq!(tokens[3].kind, TokenKind::Bool);
    assert_eq!(tokens[3].span.start, Position(3, 1));
    assert_eq!(tokens[4].value, "y");
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_tracks_lines_and_columns() {
    let (tokens, _) = lex("void main() {\n    x = 1;\n}");

    assert_eq!(tokens[0].span.start, Position(1, 1));
    assert_eq!(tokens[1].span.start, Position(1, 6));
    assert_eq!(tokens[1].span.end, Position(1, 10));
    assert_eq!(tokens[5].value, "x");
    assert_eq!(tokens[5].span.start, Position(2, 5));
    assert_eq!(tokens[6].span.start, Position(2, 7));
    assert_eq!(tokens[9].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[9].span.start, Position(3, 1));
}

#[test]
fn test_illegal_character_is_skipped() {
    let (tokens, diagnostics) = lex("int x @ ;");

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Semicolon);
    assert_eq!(
        diagnostics.to_string(),
        "1:7 ***ERROR*** Illegal character ignored: @\n"
    );
}

#[test]
fn test_tokenize_empty_source() {
    let (tokens, diagnostics) = lex("");

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_tokenize_simple_program() {
    let (tokens, _) = lex("cin >> p.x;");

    assert_eq!(tokens.len(), 7);
    assert_eq!(tokens[0].kind, TokenKind::Cin);
    assert_eq!(tokens[1].kind, TokenKind::ReadOp);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].kind, TokenKind::Dot);
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].kind, TokenKind::Semicolon);
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}
