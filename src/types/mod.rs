mod dimension;
mod error;
mod expr;
mod item;
mod layer;
mod model;
mod rule;
mod value;
mod vocabulary;

pub use dimension::{Decimal, Dimension, Quantity, Unit};
pub use error::ModelError;
pub use expr::{AttrExpr, Attribute, CompareOp, Expr, Predicate, attr};
pub use item::{BoardItem, ItemContext};
pub use layer::{LayerId, LayerResolver, LayerTable};
pub use model::RuleModel;
pub use rule::{Condition, ConditionId, Constraint, ConstraintKind, Rule};
pub use value::{AttrValue, ItemType};
pub use vocabulary::{AttributeSpec, ConstraintSpec, ValueKind, Vocabulary};
