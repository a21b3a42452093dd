mod error;
mod grammar;
mod lexer;
mod options;
mod units;
mod version;

use tracing::debug;

use crate::{LayerResolver, RuleModel};

pub use error::{NameKind, ParseError, ParseErrorKind, Position};
pub use lexer::{Keyword, Lexer, Punct, Token, TokenKind, tokenize};
pub use options::{ParseOptions, SUPPORTED_VERSION};
pub use units::{dimension_value, plain_integer};
pub use version::is_too_recent;

/// Parse rule text into a [`RuleModel`] with the default options.
///
/// # Errors
///
/// Returns the first [`ParseError`]; no partial model is produced.
pub fn parse(input: &str, layers: &dyn LayerResolver) -> Result<RuleModel, ParseError> {
    parse_with(input, layers, &ParseOptions::default())
}

/// Parse rule text with explicit [`ParseOptions`].
///
/// # Errors
///
/// Returns the first [`ParseError`]; no partial model is produced.
pub fn parse_with(
    input: &str,
    layers: &dyn LayerResolver,
    options: &ParseOptions,
) -> Result<RuleModel, ParseError> {
    let source = options.source_name.as_deref().unwrap_or("<input>");
    debug!(source, bytes = input.len(), "parsing rule file");

    let model = grammar::Parser::new(input, layers, options)
        .and_then(grammar::Parser::file)
        .map_err(|err| {
            debug!(source, error = %err, "rule file rejected");
            err
        })?;

    debug!(
        source,
        version = model.version(),
        too_recent = model.is_too_recent(),
        conditions = model.conditions().len(),
        rules = model.rules().len(),
        "parsed rule file"
    );
    Ok(model)
}
