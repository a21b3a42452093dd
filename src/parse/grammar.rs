use tracing::trace;

use crate::{
    AttrValue, Condition, Constraint, Expr, ItemType, LayerId, LayerResolver, ModelError,
    Predicate, Quantity, Rule, RuleModel, ValueKind,
};

use super::error::{NameKind, ParseError, ParseErrorKind, Position};
use super::lexer::{Keyword, Lexer, Punct, Token, TokenKind};
use super::options::ParseOptions;

/// Deepest nesting of parentheses and `NOT` accepted in one expression.
const MAX_NESTING: usize = 100;

/// Recursive-descent parser with one token of lookahead.
pub(crate) struct Parser<'src, 'ctx> {
    lexer: Lexer<'src>,
    current: Token<'src>,
    /// Position of the most recently consumed token.
    previous: Position,
    layers: &'ctx dyn LayerResolver,
    options: &'ctx ParseOptions,
    depth: usize,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub(super) fn new(
        input: &'src str,
        layers: &'ctx dyn LayerResolver,
        options: &'ctx ParseOptions,
    ) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer
            .next_token()
            .map_err(|e| e.with_source_name(options.source_name.as_deref()))?;
        Ok(Self {
            lexer,
            current,
            previous: Position::START,
            layers,
            options,
            depth: 0,
        })
    }

    // -- Token plumbing ---------------------------------------------------------

    pub(super) fn current(&self) -> &Token<'src> {
        &self.current
    }

    pub(super) fn options(&self) -> &'ctx ParseOptions {
        self.options
    }

    /// Consume the current token and return it.
    pub(super) fn bump(&mut self) -> Result<Token<'src>, ParseError> {
        let next = self.lexer.next_token().map_err(|e| self.located(e))?;
        self.previous = self.current.pos;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn located(&self, err: ParseError) -> ParseError {
        err.with_source_name(self.options.source_name.as_deref())
    }

    pub(super) fn error_at(&self, pos: Position, kind: ParseErrorKind) -> ParseError {
        self.located(ParseError::new(kind, pos))
    }

    fn syntax(&self, pos: Position, message: impl Into<String>) -> ParseError {
        self.error_at(
            pos,
            ParseErrorKind::Syntax {
                message: message.into(),
            },
        )
    }

    /// Syntax error at the current token.
    pub(super) fn expected(&self, what: &str) -> ParseError {
        self.syntax(
            self.current.pos,
            format!("expected {what}, found {}", self.current),
        )
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    fn at_punct(&self, punct: Punct) -> bool {
        self.current.kind == TokenKind::Punct(punct)
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool, ParseError> {
        if self.at_keyword(keyword) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_punct(&mut self, punct: Punct) -> Result<bool, ParseError> {
        if self.at_punct(punct) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword)? {
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", keyword.as_str())))
        }
    }

    fn expect_punct(&mut self, punct: Punct) -> Result<(), ParseError> {
        if self.eat_punct(punct)? {
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", punct.as_char())))
        }
    }

    /// Consume a string literal. Its position is left in `previous`.
    fn expect_string(&mut self, what: &str) -> Result<String, ParseError> {
        let TokenKind::Str(text) = &mut self.current.kind else {
            return Err(self.expected(what));
        };
        let text = std::mem::take(text);
        self.bump()?;
        Ok(text)
    }

    /// Consume a string literal or a bare identifier.
    fn name_like(&mut self, what: &str) -> Result<String, ParseError> {
        let text = match &mut self.current.kind {
            TokenKind::Str(text) => std::mem::take(text),
            TokenKind::Ident(word) => (*word).to_owned(),
            _ => return Err(self.expected(what)),
        };
        self.bump()?;
        Ok(text)
    }

    // -- Items ------------------------------------------------------------------

    pub(super) fn file(mut self) -> Result<RuleModel, ParseError> {
        let (version, too_recent) = self.version_header()?;
        let mut model = RuleModel::new(version, too_recent);
        loop {
            match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Keyword(Keyword::Condition) => self.condition(&mut model)?,
                TokenKind::Keyword(Keyword::Rule) => self.rule(&mut model)?,
                _ => return Err(self.expected("'CONDITION' or 'RULE'")),
            }
        }
        Ok(model)
    }

    fn condition(&mut self, model: &mut RuleModel) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Condition)?;
        let name = self.expect_string("condition name")?;
        let name_pos = self.previous;
        self.expect_punct(Punct::LBrace)?;
        let expr = self.expr()?;
        self.expect_punct(Punct::RBrace)?;

        trace!(condition = %name, "parsed condition");
        model
            .add_condition(Condition { name, expr })
            .map_err(|e| self.model_error(e, name_pos))?;
        Ok(())
    }

    fn rule(&mut self, model: &mut RuleModel) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Rule)?;
        let name = self.expect_string("rule name")?;
        let name_pos = self.previous;

        let layer = if self.eat_keyword(Keyword::Layer)? {
            Some(self.layer()?)
        } else {
            None
        };

        let mut conditions = Vec::new();
        if self.eat_keyword(Keyword::Condition)? {
            loop {
                let condition = self.expect_string("condition name")?;
                let Some(id) = model.condition_id(&condition) else {
                    return Err(self.error_at(
                        self.previous,
                        ParseErrorKind::UnresolvedCondition { name: condition },
                    ));
                };
                if !conditions.contains(&id) {
                    conditions.push(id);
                }
                if !self.eat_punct(Punct::Comma)? {
                    break;
                }
            }
        }

        self.expect_punct(Punct::LBrace)?;
        let mut constraints = Vec::new();
        while !self.at_punct(Punct::RBrace) {
            constraints.push(self.constraint()?);
        }
        if constraints.is_empty() {
            return Err(self.expected("at least one constraint"));
        }
        self.expect_punct(Punct::RBrace)?;

        trace!(rule = %name, constraints = constraints.len(), "parsed rule");
        model
            .add_rule(Rule {
                name,
                layer,
                conditions,
                constraints,
            })
            .map_err(|e| self.model_error(e, name_pos))
    }

    fn model_error(&self, err: ModelError, pos: Position) -> ParseError {
        let kind = match err {
            ModelError::DuplicateCondition { name } => ParseErrorKind::DuplicateName {
                kind: NameKind::Condition,
                name,
            },
            ModelError::DuplicateRule { name } => ParseErrorKind::DuplicateName {
                kind: NameKind::Rule,
                name,
            },
            ModelError::UnknownCondition { condition, .. } => {
                ParseErrorKind::UnresolvedCondition {
                    name: format!("#{}", condition.0),
                }
            }
        };
        self.error_at(pos, kind)
    }

    fn layer(&mut self) -> Result<LayerId, ParseError> {
        let name = self.name_like("layer name")?;
        match self.layers.resolve(&name) {
            Some(id) => Ok(id),
            None => Err(self.error_at(self.previous, ParseErrorKind::UnknownLayer { name })),
        }
    }

    fn constraint(&mut self) -> Result<Constraint, ParseError> {
        let options = self.options;
        let TokenKind::Ident(word) = self.current.kind else {
            return Err(self.expected("constraint kind"));
        };
        let kind_pos = self.current.pos;
        let Some(spec) = options.vocabulary.constraint(word) else {
            return Err(self.syntax(kind_pos, format!("unknown constraint kind '{word}'")));
        };
        self.bump()?;

        let mut params = Vec::with_capacity(spec.max_params());
        let mut found = 0;
        if matches!(self.current.kind, TokenKind::Number { .. }) {
            loop {
                match spec.params.get(found) {
                    Some(&quantity) => params.push(self.dimension(quantity)?),
                    None => self.skip_number()?,
                }
                found += 1;
                if !self.eat_punct(Punct::Comma)? {
                    break;
                }
            }
        }

        if found < spec.min_params || found > spec.max_params() {
            return Err(self.error_at(
                kind_pos,
                ParseErrorKind::ConstraintArity {
                    constraint: word.to_owned(),
                    min: spec.min_params,
                    max: spec.max_params(),
                    found,
                },
            ));
        }
        Ok(Constraint::new(spec.kind, params))
    }

    /// Consume a surplus parameter so the arity error can count it.
    fn skip_number(&mut self) -> Result<(), ParseError> {
        if matches!(self.current.kind, TokenKind::Number { .. }) {
            self.bump()?;
            Ok(())
        } else {
            Err(self.expected("a parameter value"))
        }
    }

    // -- Expressions (precedence: OR < AND < NOT < primary) ---------------------

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.syntax(
                self.current.pos,
                format!("expression nested deeper than {MAX_NESTING} levels"),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and_expr()?;
        while self.eat_keyword(Keyword::Or)? {
            let rhs = self.and_expr()?;
            lhs = lhs.or(rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while self.eat_keyword(Keyword::And)? {
            let rhs = self.unary()?;
            lhs = lhs.and(rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat_keyword(Keyword::Not)? {
            let inner = self.nested(Self::unary)?;
            Ok(Expr::Not(Box::new(inner)))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.current.kind {
            TokenKind::Punct(Punct::LParen) => {
                self.bump()?;
                let inner = self.nested(Self::expr)?;
                self.expect_punct(Punct::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident("true") => {
                self.bump()?;
                Ok(Expr::Literal(true))
            }
            TokenKind::Ident("false") => {
                self.bump()?;
                Ok(Expr::Literal(false))
            }
            TokenKind::Ident(_) => self.predicate(),
            _ => Err(self.expected("expression")),
        }
    }

    fn predicate(&mut self) -> Result<Expr, ParseError> {
        let options = self.options;
        let TokenKind::Ident(name) = self.current.kind else {
            return Err(self.expected("attribute name"));
        };
        let Some(spec) = options.vocabulary.attribute(name) else {
            return Err(self.syntax(self.current.pos, format!("unknown attribute '{name}'")));
        };
        self.bump()?;

        let TokenKind::Op(op) = self.current.kind else {
            return Err(self.expected("comparison operator"));
        };
        if !spec.ops.contains(&op) {
            return Err(self.syntax(
                self.current.pos,
                format!("operator '{op}' is not supported for attribute '{name}'"),
            ));
        }
        self.bump()?;

        let value = self.attr_value(spec.value)?;
        Ok(Expr::Test(Predicate {
            attribute: spec.attribute,
            op,
            value,
        }))
    }

    fn attr_value(&mut self, kind: ValueKind) -> Result<AttrValue, ParseError> {
        match kind {
            ValueKind::Layer => self.layer().map(AttrValue::Layer),
            ValueKind::Text => self.name_like("a name or string").map(AttrValue::Text),
            ValueKind::ItemType => {
                let TokenKind::Ident(word) = self.current.kind else {
                    return Err(self.expected("an item type"));
                };
                let Some(item_type) = ItemType::from_name(word) else {
                    return Err(self.syntax(self.current.pos, format!("unknown item type '{word}'")));
                };
                self.bump()?;
                Ok(AttrValue::ItemType(item_type))
            }
            ValueKind::Length => Ok(AttrValue::Length(self.dimension(Quantity::Length)?.value)),
            ValueKind::Count => Ok(AttrValue::Count(self.dimension(Quantity::Count)?.value)),
        }
    }
}
