use crate::{Dimension, Quantity, Unit};

use super::error::{ParseError, ParseErrorKind};
use super::grammar::Parser;
use super::lexer::TokenKind;

/// Convert a numeric literal (digits plus optional glued suffix) to a
/// [`Dimension`] of the `expected` quantity.
///
/// Counts take plain integers only. Every other quantity needs a unit
/// suffix of that quantity.
///
/// # Errors
///
/// [`ParseErrorKind::Unit`] for a missing, unknown or mismatched unit or a
/// value that overflows the internal unit; [`ParseErrorKind::Syntax`] for a
/// suffix or fraction on a count.
///
/// ```
/// use drl::Quantity;
/// use drl::parse::dimension_value;
///
/// let d = dimension_value("0.2", Some("mm"), Quantity::Length).unwrap();
/// assert_eq!(d.value, 200_000);
/// assert!(dimension_value("0.2", None, Quantity::Length).is_err());
/// ```
pub fn dimension_value(
    digits: &str,
    suffix: Option<&str>,
    expected: Quantity,
) -> Result<Dimension, ParseErrorKind> {
    if expected == Quantity::Count {
        return plain_integer(digits, suffix).map(Dimension::count);
    }

    let Some(suffix) = suffix else {
        return Err(ParseErrorKind::Unit {
            suffix: None,
            message: format!("missing unit on '{digits}', expected a {expected}"),
        });
    };
    let unit_error = |message: String| ParseErrorKind::Unit {
        suffix: Some(suffix.to_owned()),
        message,
    };

    let unit = Unit::from_suffix(suffix)
        .ok_or_else(|| unit_error(format!("unknown unit '{suffix}'")))?;
    if unit.quantity() != expected {
        return Err(unit_error(format!(
            "unit '{suffix}' measures {}, expected a {expected}",
            unit.quantity()
        )));
    }

    let value = unit
        .parse_internal(digits)
        .ok_or_else(|| unit_error(format!("'{digits}{suffix}' is out of range")))?;
    Ok(Dimension {
        quantity: expected,
        value,
    })
}

/// A base-10, optionally signed integer with no suffix and no fraction.
///
/// # Errors
///
/// [`ParseErrorKind::Syntax`] otherwise, or when the value overflows `i64`.
pub fn plain_integer(digits: &str, suffix: Option<&str>) -> Result<i64, ParseErrorKind> {
    let syntax = |message: String| ParseErrorKind::Syntax { message };
    if let Some(suffix) = suffix {
        return Err(syntax(format!(
            "expected a plain integer, found '{digits}{suffix}'"
        )));
    }
    if digits.contains('.') {
        return Err(syntax(format!("expected a plain integer, found '{digits}'")));
    }
    digits
        .parse::<i64>()
        .map_err(|_| syntax(format!("integer '{digits}' is out of range")))
}

impl Parser<'_, '_> {
    /// Consume a numeric literal as a value of the `expected` quantity.
    pub(super) fn dimension(&mut self, expected: Quantity) -> Result<Dimension, ParseError> {
        let (digits, suffix) = match self.current().kind {
            TokenKind::Number { digits, unit } => (digits, unit),
            _ => return Err(self.expected(&format!("a {expected} value"))),
        };
        let pos = self.current().pos;
        self.bump()?;
        dimension_value(digits, suffix, expected).map_err(|kind| {
            // Unit problems point at the suffix itself.
            let at = match &kind {
                ParseErrorKind::Unit {
                    suffix: Some(_), ..
                } => pos.after(digits),
                _ => pos,
            };
            self.error_at(at, kind)
        })
    }
}
