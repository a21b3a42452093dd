use crate::{AttrValue, Attribute, BoardItem, CompareOp, Expr, Predicate, Rule, RuleModel};

pub(crate) fn rule_applies(model: &RuleModel, rule: &Rule, item: &dyn BoardItem) -> bool {
    if let Some(layer) = rule.layer {
        if !item.on_layer(layer) {
            return false;
        }
    }
    rule.conditions
        .iter()
        .all(|&id| model.condition_matches(id, item).unwrap_or(false))
}

pub(crate) fn eval_expr(expr: &Expr, item: &dyn BoardItem) -> bool {
    match expr {
        Expr::Test(predicate) => eval_predicate(predicate, item),
        Expr::And(operands) => operands.iter().all(|e| eval_expr(e, item)),
        Expr::Or(operands) => operands.iter().any(|e| eval_expr(e, item)),
        Expr::Not(inner) => !eval_expr(inner, item),
        Expr::Literal(v) => *v,
    }
}

fn eval_predicate(predicate: &Predicate, item: &dyn BoardItem) -> bool {
    match (predicate.attribute, &predicate.value) {
        (Attribute::Layer, AttrValue::Layer(layer)) => {
            let on = item.on_layer(*layer);
            match predicate.op {
                CompareOp::Eq => on,
                CompareOp::Neq => !on,
                _ => false,
            }
        }
        (attribute, value) => item
            .attribute(attribute)
            .and_then(|actual| actual.compare(predicate.op, value))
            .unwrap_or(false),
    }
}
