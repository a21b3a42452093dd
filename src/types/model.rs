use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use super::error::ModelError;
use super::item::BoardItem;
use super::layer::LayerResolver;
use super::rule::{Condition, ConditionId, Rule};
use crate::parse::ParseOptions;

/// The parsed contents of a rule file: conditions and rules in declaration
/// order, plus the declared format version.
///
/// Immutable once returned from the parser and safe to share between
/// threads behind `Arc`.
///
/// # Example
///
/// ```
/// use drl::{LayerTable, RuleModel};
///
/// let layers = LayerTable::standard(2);
/// let model = RuleModel::from_source(
///     "version 20200610\nRULE \"r1\" { clearance 0.2mm }",
///     &layers,
/// )
/// .unwrap();
/// assert_eq!(model.rules().len(), 1);
/// assert!(!model.is_too_recent());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleModel {
    version: u32,
    too_recent: bool,
    conditions: Vec<Condition>,
    rules: Vec<Rule>,
    condition_ids: HashMap<String, ConditionId>,
    rule_indices: HashMap<String, usize>,
}

impl RuleModel {
    /// Create an empty model for a file declaring `version`.
    #[must_use]
    pub fn new(version: u32, too_recent: bool) -> Self {
        Self {
            version,
            too_recent,
            ..Self::default()
        }
    }

    /// Append a condition, returning the id rules use to reference it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateCondition`] if a condition or rule
    /// already uses the name.
    pub fn add_condition(&mut self, condition: Condition) -> Result<ConditionId, ModelError> {
        if self.is_name_taken(&condition.name) {
            return Err(ModelError::DuplicateCondition {
                name: condition.name,
            });
        }
        let id = ConditionId(self.conditions.len());
        self.condition_ids.insert(condition.name.clone(), id);
        self.conditions.push(condition);
        Ok(id)
    }

    /// Append a rule. Every condition it references must already be present.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateRule`] if a condition or rule already
    /// uses the name, or [`ModelError::UnknownCondition`] for a dangling
    /// condition id.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), ModelError> {
        if self.is_name_taken(&rule.name) {
            return Err(ModelError::DuplicateRule { name: rule.name });
        }
        if let Some(&missing) = rule
            .conditions
            .iter()
            .find(|id| id.0 >= self.conditions.len())
        {
            return Err(ModelError::UnknownCondition {
                rule: rule.name,
                condition: missing,
            });
        }
        self.rule_indices.insert(rule.name.clone(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Conditions and rules share one namespace.
    fn is_name_taken(&self, name: &str) -> bool {
        self.condition_ids.contains_key(name) || self.rule_indices.contains_key(name)
    }

    /// Parse rule text with the default [`ParseOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`DrlError`](crate::DrlError) on any parse failure.
    pub fn from_source(input: &str, layers: &dyn LayerResolver) -> Result<Self, crate::DrlError> {
        Ok(crate::parse::parse(input, layers)?)
    }

    /// Read and parse a rule file. The path is used as the source name in
    /// error positions.
    ///
    /// # Errors
    ///
    /// Returns [`DrlError`](crate::DrlError) on I/O or parse failure.
    pub fn from_file(
        path: impl AsRef<Path>,
        layers: &dyn LayerResolver,
    ) -> Result<Self, crate::DrlError> {
        Self::from_file_with(path, layers, &ParseOptions::default())
    }

    /// Like [`from_file`](Self::from_file) with explicit options. The
    /// options' source name is replaced by the path.
    ///
    /// # Errors
    ///
    /// Returns [`DrlError`](crate::DrlError) on I/O or parse failure.
    pub fn from_file_with(
        path: impl AsRef<Path>,
        layers: &dyn LayerResolver,
        options: &ParseOptions,
    ) -> Result<Self, crate::DrlError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        let options = options
            .clone()
            .source_name(path.display().to_string());
        Ok(crate::parse::parse_with(&input, layers, &options)?)
    }

    /// Declared format version of the source file.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether the file declared a version newer than the parser supports.
    #[must_use]
    pub fn is_too_recent(&self) -> bool {
        self.too_recent
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn condition(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.get(id.0)
    }

    #[must_use]
    pub fn condition_id(&self, name: &str) -> Option<ConditionId> {
        self.condition_ids.get(name).copied()
    }

    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rule_indices.get(name).map(|&i| &self.rules[i])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.rules.is_empty()
    }

    /// Evaluate one condition against a board item.
    ///
    /// Returns `None` if the id does not belong to this model.
    #[must_use]
    pub fn condition_matches(&self, id: ConditionId, item: &dyn BoardItem) -> Option<bool> {
        self.condition(id)
            .map(|c| crate::evaluate::eval_expr(&c.expr, item))
    }

    /// Rules that apply to `item`, in declaration order: the rule's layer
    /// clause (if any) holds and every referenced condition is true.
    pub fn applicable_rules<'a>(
        &'a self,
        item: &'a dyn BoardItem,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| crate::evaluate::rule_applies(self, rule, item))
    }
}

impl fmt::Display for RuleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleModel(version {}, {} conditions, {} rules{})",
            self.version,
            self.conditions.len(),
            self.rules.len(),
            if self.too_recent { ", too recent" } else { "" },
        )
    }
}
