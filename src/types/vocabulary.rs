use std::collections::HashMap;

use super::dimension::Quantity;
use super::expr::{Attribute, CompareOp};
use super::rule::ConstraintKind;

/// What kind of token an attribute's right-hand side must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A layer name, resolved through the board's layer resolver.
    Layer,
    /// A string or bare identifier.
    Text,
    /// One of the item type names (`track`, `via`, ...).
    ItemType,
    /// A dimensioned length.
    Length,
    /// A plain integer; unit suffixes are rejected.
    Count,
}

#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub attribute: Attribute,
    pub value: ValueKind,
    pub ops: Vec<CompareOp>,
}

impl AttributeSpec {
    #[must_use]
    pub fn new(attribute: Attribute, value: ValueKind, ops: &[CompareOp]) -> Self {
        Self {
            attribute,
            value,
            ops: ops.to_vec(),
        }
    }
}

/// Parameter shape of a constraint kind: `params[i]` is the quantity at
/// position `i`, the first `min_params` are mandatory.
#[derive(Debug, Clone)]
pub struct ConstraintSpec {
    pub kind: ConstraintKind,
    pub params: Vec<Quantity>,
    pub min_params: usize,
}

impl ConstraintSpec {
    #[must_use]
    pub fn new(kind: ConstraintKind, params: &[Quantity], min_params: usize) -> Self {
        Self {
            kind,
            params: params.to_vec(),
            min_params: min_params.min(params.len()),
        }
    }

    #[must_use]
    pub fn max_params(&self) -> usize {
        self.params.len()
    }
}

/// Name tables for attributes and constraint kinds.
///
/// The parser only consults these tables, so a host can add aliases or
/// alternative parameter shapes without touching the grammar.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    attributes: HashMap<String, AttributeSpec>,
    constraints: HashMap<String, ConstraintSpec>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

impl Vocabulary {
    /// A vocabulary with no names at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            attributes: HashMap::new(),
            constraints: HashMap::new(),
        }
    }

    /// The default attribute and constraint tables.
    #[must_use]
    pub fn standard() -> Self {
        use CompareOp as Op;
        use ConstraintKind as K;
        use Quantity::{Angle, Count, Length, Ratio};

        let mut v = Self::empty();

        for (name, attribute, value, ops) in [
            ("layer", Attribute::Layer, ValueKind::Layer, &Op::EQUALITY[..]),
            ("netclass", Attribute::NetClass, ValueKind::Text, &Op::EQUALITY[..]),
            ("net", Attribute::Net, ValueKind::Text, &Op::EQUALITY[..]),
            ("reference", Attribute::Reference, ValueKind::Text, &Op::EQUALITY[..]),
            ("type", Attribute::ItemType, ValueKind::ItemType, &Op::EQUALITY[..]),
            ("width", Attribute::Width, ValueKind::Length, &Op::ALL[..]),
            ("pin_count", Attribute::PinCount, ValueKind::Count, &Op::ALL[..]),
        ] {
            v.register_attribute(name, AttributeSpec::new(attribute, value, ops));
        }

        for (kind, params, min) in [
            (K::Clearance, &[Length][..], 1),
            (K::HoleClearance, &[Length][..], 1),
            (K::EdgeClearance, &[Length][..], 1),
            (K::TrackWidth, &[Length, Length][..], 1),
            (K::ViaDiameter, &[Length, Length][..], 1),
            (K::HoleSize, &[Length, Length][..], 1),
            (K::AnnularWidth, &[Length][..], 1),
            (K::DiffPairGap, &[Length, Length][..], 1),
            (K::TrackLength, &[Length, Length][..], 1),
            (K::Skew, &[Length][..], 1),
            (K::TrackAngle, &[Angle][..], 1),
            (K::PasteMarginRatio, &[Ratio][..], 1),
            (K::ViaCount, &[Count][..], 1),
        ] {
            v.register_constraint(kind.name(), ConstraintSpec::new(kind, params, min));
        }
        v
    }

    /// Register (or replace) an attribute name.
    pub fn register_attribute(&mut self, name: &str, spec: AttributeSpec) {
        self.attributes.insert(name.to_owned(), spec);
    }

    /// Register (or replace) a constraint name.
    pub fn register_constraint(&mut self, name: &str, spec: ConstraintSpec) {
        self.constraints.insert(name.to_owned(), spec);
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, spec: AttributeSpec) -> Self {
        self.register_attribute(name, spec);
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, name: &str, spec: ConstraintSpec) -> Self {
        self.register_constraint(name, spec);
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn constraint(&self, name: &str) -> Option<&ConstraintSpec> {
        self.constraints.get(name)
    }

    /// Iterate over all registered constraint names.
    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }
}
