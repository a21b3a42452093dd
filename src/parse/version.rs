use tracing::warn;

use super::error::{ParseError, ParseErrorKind};
use super::grammar::Parser;
use super::lexer::{Keyword, TokenKind};

/// Validate the digits of a `version` header.
///
/// The version is a plain, non-negative integer that fits in `u32`.
pub(crate) fn declared_version(digits: &str) -> Result<u32, String> {
    if digits.starts_with('-') {
        return Err(format!("version '{digits}' is negative"));
    }
    if digits.contains('.') {
        return Err(format!("version '{digits}' is not an integer"));
    }
    if digits.starts_with('+') {
        return Err(format!("version '{digits}' must be written without a sign"));
    }
    digits
        .parse::<u32>()
        .map_err(|_| format!("version '{digits}' is out of range"))
}

/// `true` when a file declares a format newer than `supported`.
#[must_use]
pub fn is_too_recent(declared: u32, supported: u32) -> bool {
    declared > supported
}

impl Parser<'_, '_> {
    /// Read `version <INT>` and compare it to the supported version.
    ///
    /// Returns the declared version and whether it is too recent.
    pub(super) fn version_header(&mut self) -> Result<(u32, bool), ParseError> {
        let format = |message: String| ParseErrorKind::Format { message };

        let keyword = self.bump()?;
        if keyword.kind != TokenKind::Keyword(Keyword::Version) {
            return Err(self.error_at(
                keyword.pos,
                format(format!("expected 'version' at start of file, found {keyword}")),
            ));
        }

        let number = self.bump()?;
        let declared = match number.kind {
            TokenKind::Number {
                digits,
                unit: None,
            } => declared_version(digits),
            TokenKind::Number { .. } => Err(format!(
                "version '{}' must not carry a unit",
                number.text
            )),
            _ => Err(format!("expected a version number, found {number}")),
        }
        .map_err(|message| self.error_at(number.pos, format(message)))?;

        let supported = self.options().supported_version;
        let too_recent = is_too_recent(declared, supported);
        if too_recent {
            warn!(
                declared,
                supported, "rule file format is newer than supported, parsing best-effort"
            );
        }
        Ok((declared, too_recent))
    }
}
