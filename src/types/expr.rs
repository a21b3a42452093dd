use std::fmt;
use std::ops::Not;

use super::value::AttrValue;

/// Comparison operators supported in predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Neq,
        CompareOp::Gt,
        CompareOp::Gte,
        CompareOp::Lt,
        CompareOp::Lte,
    ];

    pub const EQUALITY: [CompareOp; 2] = [CompareOp::Eq, CompareOp::Neq];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Board-item attributes a predicate can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Layer membership. Items spanning several layers match each of them.
    Layer,
    NetClass,
    Net,
    /// Reference designator of the owning component.
    Reference,
    ItemType,
    Width,
    PinCount,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Layer => "layer",
            Attribute::NetClass => "netclass",
            Attribute::Net => "net",
            Attribute::Reference => "reference",
            Attribute::ItemType => "type",
            Attribute::Width => "width",
            Attribute::PinCount => "pin_count",
        };
        f.write_str(name)
    }
}

/// A leaf test `<attribute> <op> <value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub attribute: Attribute,
    pub op: CompareOp,
    pub value: AttrValue,
}

/// Boolean expression over board-item attributes, the body of a condition.
///
/// `AND` and `OR` chains are stored flat: `a OR b OR c` is one `Or` with
/// three operands, so the tree only grows deeper through parentheses and
/// `NOT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Test(Predicate),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Literal(bool),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.op, self.value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Test(p) => write!(f, "({p})"),
            Expr::And(operands) => write_chain(f, operands, "AND"),
            Expr::Or(operands) => write_chain(f, operands, "OR"),
            Expr::Not(inner) => write!(f, "(NOT {inner})"),
            Expr::Literal(v) => write!(f, "{v}"),
        }
    }
}

fn write_chain(f: &mut fmt::Formatter<'_>, operands: &[Expr], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "{operand}")?;
    }
    f.write_str(")")
}

impl Expr {
    /// Conjunction. Operands that are already `And` chains are spliced in.
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        let mut operands = match self {
            Expr::And(operands) => operands,
            expr => vec![expr],
        };
        match other {
            Expr::And(rest) => operands.extend(rest),
            expr => operands.push(expr),
        }
        Expr::And(operands)
    }

    /// Disjunction. Operands that are already `Or` chains are spliced in.
    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        let mut operands = match self {
            Expr::Or(operands) => operands,
            expr => vec![expr],
        };
        match other {
            Expr::Or(rest) => operands.extend(rest),
            expr => operands.push(expr),
        }
        Expr::Or(operands)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

/// Intermediate builder for predicates.
/// Created by [`attr()`]; a comparison method produces the [`Expr`].
#[derive(Debug, Clone, Copy)]
pub struct AttrExpr {
    attribute: Attribute,
}

impl AttrExpr {
    fn test(self, op: CompareOp, value: impl Into<AttrValue>) -> Expr {
        Expr::Test(Predicate {
            attribute: self.attribute,
            op,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn eq(self, value: impl Into<AttrValue>) -> Expr {
        self.test(CompareOp::Eq, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<AttrValue>) -> Expr {
        self.test(CompareOp::Neq, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<AttrValue>) -> Expr {
        self.test(CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<AttrValue>) -> Expr {
        self.test(CompareOp::Gte, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<AttrValue>) -> Expr {
        self.test(CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<AttrValue>) -> Expr {
        self.test(CompareOp::Lte, value)
    }
}

#[must_use]
pub fn attr(attribute: Attribute) -> AttrExpr {
    AttrExpr { attribute }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemType, LayerId};

    #[test]
    fn attr_eq_layer() {
        let expr = attr(Attribute::Layer).eq(LayerId(0));
        assert_eq!(
            expr,
            Expr::Test(Predicate {
                attribute: Attribute::Layer,
                op: CompareOp::Eq,
                value: AttrValue::Layer(LayerId(0)),
            })
        );
    }

    #[test]
    fn attr_neq_str() {
        let expr = attr(Attribute::NetClass).neq("HV");
        assert_eq!(
            expr,
            Expr::Test(Predicate {
                attribute: Attribute::NetClass,
                op: CompareOp::Neq,
                value: AttrValue::Text("HV".to_owned()),
            })
        );
    }

    #[test]
    fn and_or_not_chaining() {
        let expr = !attr(Attribute::ItemType)
            .eq(ItemType::Via)
            .and(Expr::Literal(true))
            .or(Expr::Literal(false));
        match expr {
            Expr::Not(inner) => assert!(matches!(*inner, Expr::Or(_))),
            other => panic!("expected Not, got {other:?}"),
        }
    }

    #[test]
    fn all_compare_ops() {
        let w = || attr(Attribute::Width);
        let exprs = [
            (w().eq(AttrValue::Length(1)), CompareOp::Eq),
            (w().neq(AttrValue::Length(1)), CompareOp::Neq),
            (w().gt(AttrValue::Length(1)), CompareOp::Gt),
            (w().gte(AttrValue::Length(1)), CompareOp::Gte),
            (w().lt(AttrValue::Length(1)), CompareOp::Lt),
            (w().lte(AttrValue::Length(1)), CompareOp::Lte),
        ];
        for (expr, expected) in exprs {
            match expr {
                Expr::Test(p) => assert_eq!(p.op, expected),
                other => panic!("expected Test, got {other:?}"),
            }
        }
    }

    #[test]
    fn display_expression_tree() {
        let expr = attr(Attribute::Layer)
            .eq(LayerId(0))
            .and(!attr(Attribute::NetClass).eq("HV"));
        assert_eq!(
            expr.to_string(),
            "((layer == #0) AND (NOT (netclass == \"HV\")))"
        );
    }

    #[test]
    fn chains_stay_flat() {
        let t = || Expr::Literal(true);
        let expr = t().or(t()).or(t()).or(t().or(t()));
        match &expr {
            Expr::Or(operands) => assert_eq!(operands.len(), 5),
            other => panic!("expected Or, got {other:?}"),
        }
        assert_eq!(expr.to_string(), "(true OR true OR true OR true OR true)");

        let mixed = t().and(t()).or(t().and(t()));
        match mixed {
            Expr::Or(operands) => {
                assert_eq!(operands.len(), 2);
                assert!(operands.iter().all(|e| matches!(e, Expr::And(v) if v.len() == 2)));
            }
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn op_symbols() {
        let symbols: Vec<&str> = CompareOp::ALL.iter().map(|op| op.symbol()).collect();
        assert_eq!(symbols, ["==", "!=", ">", ">=", "<", "<="]);
    }
}
