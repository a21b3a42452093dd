use thiserror::Error;

use crate::parse::ParseError;

/// Unified error type covering parsing and I/O.
///
/// Returned by convenience constructors like
/// [`RuleModel::from_source()`](crate::RuleModel::from_source) and
/// [`RuleModel::from_file()`](crate::RuleModel::from_file).
#[derive(Debug, Error)]
pub enum DrlError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DrlError {
    /// The parse error, if this is one.
    #[must_use]
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            DrlError::Parse(err) => Some(err),
            DrlError::Io(_) => None,
        }
    }
}
