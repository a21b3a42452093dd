use std::fmt;

use thiserror::Error;

/// A location in the rule source. Lines and columns are 1-based, columns
/// count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    /// Byte offset from the start of the source.
    pub offset: usize,
}

impl Position {
    pub(crate) const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Move past `text`, which must be the source slice starting here.
    pub(crate) fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += text.len();
    }

    /// Position `text` further along the same line.
    pub(crate) fn after(mut self, text: &str) -> Position {
        self.advance(text);
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Which namespace a duplicate name collided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Condition,
    Rule,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Condition => write!(f, "condition"),
            NameKind::Rule => write!(f, "rule"),
        }
    }
}

/// What went wrong. Every kind is fatal for the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("{reason}: '{text}'")]
    Lexical { text: String, reason: &'static str },

    #[error("invalid version header: {message}")]
    Format { message: String },

    #[error("{message}")]
    Syntax { message: String },

    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: NameKind, name: String },

    #[error("condition '{name}' is not defined before this rule")]
    UnresolvedCondition { name: String },

    #[error("unknown layer '{name}'")]
    UnknownLayer { name: String },

    /// `suffix` is the offending unit text, `None` when it is missing.
    #[error("{message}")]
    Unit {
        suffix: Option<String>,
        message: String,
    },

    #[error(
        "constraint '{constraint}' expects {}, found {found}",
        expected_params(*.min, *.max)
    )]
    ConstraintArity {
        constraint: String,
        min: usize,
        max: usize,
        found: usize,
    },
}

fn expected_params(min: usize, max: usize) -> String {
    let noun = |n: usize| if n == 1 { "parameter" } else { "parameters" };
    if min == max {
        format!("{min} {}", noun(min))
    } else {
        format!("{min} to {max} {}", noun(max))
    }
}

/// A positioned parse failure. No partial result accompanies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    position: Position,
    source_name: Option<String>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: Position) -> Self {
        Self {
            kind,
            position,
            source_name: None,
        }
    }

    pub(crate) fn with_source_name(mut self, name: Option<&str>) -> Self {
        self.source_name = name.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.position.line
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// The file name given in the parse options, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_name {
            Some(name) => write!(
                f,
                "parse error in {name} at {}: {}",
                self.position, self.kind
            ),
            None => write!(f, "parse error at {}: {}", self.position, self.kind),
        }
    }
}

impl std::error::Error for ParseError {}
