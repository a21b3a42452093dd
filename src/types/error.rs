use thiserror::Error;

use super::rule::ConditionId;

/// Invariant violations when populating a [`RuleModel`](super::RuleModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate condition name '{name}'")]
    DuplicateCondition { name: String },

    #[error("duplicate rule name '{name}'")]
    DuplicateRule { name: String },

    #[error("rule '{rule}' references condition #{} which is not defined before it", .condition.0)]
    UnknownCondition { rule: String, condition: ConditionId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_condition_message() {
        let err = ModelError::DuplicateCondition { name: "hv".into() };
        assert_eq!(err.to_string(), "duplicate condition name 'hv'");
    }

    #[test]
    fn duplicate_rule_message() {
        let err = ModelError::DuplicateRule { name: "r1".into() };
        assert_eq!(err.to_string(), "duplicate rule name 'r1'");
    }

    #[test]
    fn unknown_condition_message() {
        let err = ModelError::UnknownCondition {
            rule: "r1".into(),
            condition: ConditionId(3),
        };
        assert_eq!(
            err.to_string(),
            "rule 'r1' references condition #3 which is not defined before it"
        );
    }
}
