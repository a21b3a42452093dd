mod error;
mod evaluate;
pub mod parse;
mod types;

pub use error::DrlError;
pub use parse::{
    ParseError, ParseErrorKind, ParseOptions, Position, SUPPORTED_VERSION, parse, parse_with,
};
pub use types::{
    AttrExpr, AttrValue, Attribute, AttributeSpec, BoardItem, CompareOp, Condition, ConditionId,
    Constraint, ConstraintKind, ConstraintSpec, Decimal, Dimension, Expr, ItemContext, ItemType,
    LayerId, LayerResolver, LayerTable, ModelError, Predicate, Quantity, Rule, RuleModel, Unit,
    ValueKind, Vocabulary, attr,
};
