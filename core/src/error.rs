use std::fmt;
use std::io;

use thiserror::Error;

/// What went wrong while reading a profile or query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended before the named terminator or field was read.
    UnexpectedEof(&'static str),
    /// A `key value` line did not split into exactly two tokens.
    TokenCount { expected: usize, found: usize },
    EmptyUsername,
    UnknownPredicate(String),
    UnknownPresentKey(String),
    DuplicatePresentKey(String),
    /// The line is not valid UTF-8.
    InvalidUtf8,
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedEof(what) => {
                write!(f, "unexpected end of input, expected {}", what)
            }
            ParseErrorKind::TokenCount { expected, found } => {
                write!(f, "expected {} tokens, found {}", expected, found)
            }
            ParseErrorKind::EmptyUsername => write!(f, "empty username"),
            ParseErrorKind::UnknownPredicate(name) => {
                write!(f, "unknown filter predicate '{}'", name)
            }
            ParseErrorKind::UnknownPresentKey(key) => {
                write!(f, "unknown presentation key '{}'", key)
            }
            ParseErrorKind::DuplicatePresentKey(key) => {
                write!(f, "presentation key '{}' given twice", key)
            }
            ParseErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8"),
            ParseErrorKind::InvalidValue { key, value } => {
                write!(f, "invalid value '{}' for {}", value, key)
            }
        }
    }
}

/// Malformed or truncated input. No partial result survives one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number where the problem was detected.
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("user '{0}' not found")]
    UnknownUser(String),

    #[error("unknown search operation '{0}'")]
    UnknownOperation(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
