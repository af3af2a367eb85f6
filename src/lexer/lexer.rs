use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Handles one match. Receives the matched text.
pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            regex: Regex::new(pattern).expect("token patterns are valid regular expressions"),
            handler,
        }
    }
}

lazy_static! {
    // Every pattern is anchored; the first one that matches wins, so longer
    // spellings come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new("^[0-9]+", number_handler),
        RegexPattern::new("^\n", newline_handler),
        RegexPattern::new("^[ \t\r\x0C]+", skip_handler),
        RegexPattern::new("^\"(?:[^\n\"\\\\]|\\\\[^\n])*\"?", string_handler),
        RegexPattern::new("^(?://|#)[^\n]*", skip_handler),
        RegexPattern::new("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        RegexPattern::new("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        RegexPattern::new("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        RegexPattern::new("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        RegexPattern::new("^<<", MK_DEFAULT_HANDLER!(TokenKind::WriteOp, "<<")),
        RegexPattern::new("^>>", MK_DEFAULT_HANDLER!(TokenKind::ReadOp, ">>")),
        RegexPattern::new("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        RegexPattern::new("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        RegexPattern::new("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        RegexPattern::new("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        RegexPattern::new("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        RegexPattern::new("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        RegexPattern::new("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        RegexPattern::new("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        RegexPattern::new("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        RegexPattern::new("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        RegexPattern::new("^\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        RegexPattern::new("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        RegexPattern::new("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        RegexPattern::new("^\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        RegexPattern::new("^--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        RegexPattern::new("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        RegexPattern::new("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        RegexPattern::new("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        RegexPattern::new("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<Error>,
    source: String,
    /// Byte offset into `source`.
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            tokens: vec![],
            errors: vec![],
            source: source.to_string(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advances `n` bytes along the current line.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        self.column += self.source[self.pos..end].chars().count() as u32;
        self.pos = end;
    }

    pub fn newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.column = 1;
    }

    pub fn position(&self) -> Position {
        Position(self.line, self.column)
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn error(&mut self, error: ErrorImpl, position: Position) {
        self.errors.push(Error::new(error, position));
    }

    pub fn warn(&mut self, error: ErrorImpl, position: Position) {
        self.errors.push(Error::warning(error, position));
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) {
    let start = lexer.position();

    let value = match matched.parse::<i32>() {
        Ok(_) => matched.to_string(),
        Err(_) => {
            lexer.warn(
                ErrorImpl::IntegerTooLarge {
                    literal: matched.to_string(),
                },
                start,
            );
            i32::MAX.to_string()
        }
    };

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, value, Span { start, end: lexer.position() }));
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.advance_n(matched.len());
}

fn newline_handler(lexer: &mut Lexer, _matched: &str) {
    lexer.newline();
}

// The match runs from the opening quote up to the closing quote, or to the
// end of the line when there is none.
fn string_handler(lexer: &mut Lexer, matched: &str) {
    let start = lexer.position();
    lexer.advance_n(matched.len());

    let mut terminated = false;
    let mut bad_escape = false;
    let mut chars = matched[1..].chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                terminated = true;
                break;
            }
            '\\' => {
                if !matches!(chars.next(), Some('n' | 't' | '\'' | '"' | '\\')) {
                    bad_escape = true;
                }
            }
            _ => {}
        }
    }

    match (terminated, bad_escape) {
        (true, false) => {
            let body = matched[1..matched.len() - 1].to_string();
            lexer.push(MK_TOKEN!(TokenKind::String, body, Span { start, end: lexer.position() }));
        }
        (true, true) => lexer.error(ErrorImpl::BadEscapedString, start),
        (false, false) => lexer.error(ErrorImpl::UnterminatedString, start),
        (false, true) => lexer.error(ErrorImpl::UnterminatedBadEscapedString, start),
    }
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let start = lexer.position();
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(kind, matched.to_string(), Span { start, end: lexer.position() }));
}

/// Splits source text into tokens.
///
/// Lexical problems are added to `diagnostics` and the offending text is
/// skipped, so the returned stream always ends in an `EOF` token.
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        let matched = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .map(|found| (pattern.handler, found.as_str().to_string()))
        });

        match matched {
            Some((handler, text)) => handler(&mut lex, &text),
            None => {
                let position = lex.position();
                if let Some(character) = lex.at() {
                    lex.error(ErrorImpl::IllegalCharacter { character }, position);
                    lex.advance_n(character.len_utf8());
                }
            }
        }
    }

    let end = lex.position();
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span { start: end, end }));

    diagnostics.extend(lex.errors);
    lex.tokens
}
