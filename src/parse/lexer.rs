use std::fmt;

use winnow::ascii::{digit1, till_line_ending};
use winnow::combinator::{alt, opt, repeat};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::CompareOp;

use super::error::{ParseError, ParseErrorKind, Position};

/// Reserved words. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Version,
    Condition,
    Rule,
    And,
    Or,
    Not,
    Layer,
}

impl Keyword {
    fn from_ident(text: &str) -> Option<Keyword> {
        Some(match text {
            "version" => Keyword::Version,
            "CONDITION" => Keyword::Condition,
            "RULE" => Keyword::Rule,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "NOT" => Keyword::Not,
            "LAYER" => Keyword::Layer,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Version => "version",
            Keyword::Condition => "CONDITION",
            Keyword::Rule => "RULE",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::Layer => "LAYER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
}

impl Punct {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Punct::LBrace => '{',
            Punct::RBrace => '}',
            Punct::LParen => '(',
            Punct::RParen => ')',
            Punct::Comma => ',',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Keyword(Keyword),
    Ident(&'a str),
    /// A numeric literal with any unit suffix glued to it. The suffix is not
    /// validated here.
    Number {
        digits: &'a str,
        unit: Option<&'a str>,
    },
    /// A string literal with escapes already decoded.
    Str(String),
    Op(CompareOp),
    Punct(Punct),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Raw source text of the token, empty for end of input.
    pub text: &'a str,
    pub pos: Position,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

// -- Primitive recognizers ---------------------------------------------------

fn trivia(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

fn number<'i>(input: &mut &'i str) -> ModalResult<(&'i str, Option<&'i str>)> {
    let digits = (opt(one_of(['+', '-'])), digit1, opt(('.', digit1)))
        .take()
        .parse_next(input)?;
    let unit = opt((
        one_of(|c: char| c.is_ascii_alphabetic() || c == '%'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take())
    .parse_next(input)?;
    Ok((digits, unit))
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
    ))
    .parse_next(input)
}

fn punct(input: &mut &str) -> ModalResult<Punct> {
    alt((
        '{'.value(Punct::LBrace),
        '}'.value(Punct::RBrace),
        '('.value(Punct::LParen),
        ')'.value(Punct::RParen),
        ','.value(Punct::Comma),
    ))
    .parse_next(input)
}

// -- Lexer ---------------------------------------------------------------------

/// Splits rule text into tokens, skipping whitespace and `#` comments.
///
/// Iteration yields [`TokenKind::Eof`] once and then stops. A lexical error
/// also ends the iteration.
pub struct Lexer<'a> {
    source: &'a str,
    rest: &'a str,
    pos: Position,
    done: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
            pos: Position::START,
            done: false,
        }
    }

    /// Start again from the beginning of the source.
    pub fn reset(&mut self) {
        *self = Self::new(self.source);
    }

    /// Produce the next token. At end of input this keeps returning `Eof`.
    ///
    /// # Errors
    ///
    /// Returns a lexical [`ParseError`] for an unterminated string or a
    /// character that starts no token.
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        self.skip_trivia();
        let start = self.rest;
        let pos = self.pos;

        let Some(first) = start.chars().next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: "",
                pos,
            });
        };

        let kind = match first {
            '"' => match string_literal.parse_next(&mut self.rest) {
                Ok(s) => TokenKind::Str(s),
                Err(_) => {
                    let line = start.lines().next().unwrap_or(start);
                    return Err(lexical(line, "unterminated string", pos));
                }
            },
            c if c.is_ascii_digit() || c == '+' || c == '-' => {
                match number.parse_next(&mut self.rest) {
                    Ok((digits, unit)) => TokenKind::Number { digits, unit },
                    Err(_) => return Err(lexical(&start[..1], "unrecognized character", pos)),
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = ident
                    .parse_next(&mut self.rest)
                    .map_err(|_| lexical(&start[..1], "unrecognized character", pos))?;
                Keyword::from_ident(word).map_or(TokenKind::Ident(word), TokenKind::Keyword)
            }
            '=' | '!' | '<' | '>' => match compare_op.parse_next(&mut self.rest) {
                Ok(op) => TokenKind::Op(op),
                Err(_) => return Err(lexical(&start[..1], "incomplete operator", pos)),
            },
            _ => match punct.parse_next(&mut self.rest) {
                Ok(p) => TokenKind::Punct(p),
                Err(_) => {
                    let end = first.len_utf8();
                    return Err(lexical(&start[..end], "unrecognized character", pos));
                }
            },
        };

        let text = &start[..start.len() - self.rest.len()];
        self.pos.advance(text);
        Ok(Token { kind, text, pos })
    }

    fn skip_trivia(&mut self) {
        let before = self.rest;
        if trivia.parse_next(&mut self.rest).is_err() {
            self.rest = before;
        }
        let skipped = &before[..before.len() - self.rest.len()];
        self.pos.advance(skipped);
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        self.done = !matches!(&result, Ok(t) if t.kind != TokenKind::Eof);
        Some(result)
    }
}

fn lexical(text: &str, reason: &'static str, pos: Position) -> ParseError {
    ParseError::new(
        ParseErrorKind::Lexical {
            text: text.to_owned(),
            reason,
        },
        pos,
    )
}

/// Tokenize a whole source, including the trailing `Eof`.
///
/// # Errors
///
/// Returns the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Lexer::new(source).collect()
}
