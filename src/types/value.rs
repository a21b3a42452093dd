use std::cmp::Ordering;
use std::fmt;

use super::expr::CompareOp;
use super::layer::LayerId;

/// Kinds of board item a `type` predicate can test for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Track,
    Via,
    Pad,
    Zone,
    Text,
    Graphic,
    Hole,
}

impl ItemType {
    pub const ALL: [ItemType; 7] = [
        ItemType::Track,
        ItemType::Via,
        ItemType::Pad,
        ItemType::Zone,
        ItemType::Text,
        ItemType::Graphic,
        ItemType::Hole,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Track => "track",
            ItemType::Via => "via",
            ItemType::Pad => "pad",
            ItemType::Zone => "zone",
            ItemType::Text => "text",
            ItemType::Graphic => "graphic",
            ItemType::Hole => "hole",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<ItemType> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Right-hand side of a predicate, and the value a board item reports for an
/// attribute. Lengths are in nanometres.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Layer(LayerId),
    Text(String),
    ItemType(ItemType),
    Length(i64),
    Count(i64),
}

impl AttrValue {
    /// Compare this value to another using the given operator.
    ///
    /// Returns `None` for mismatched kinds, and for ordering operators on
    /// kinds that only support equality (layers, text, item types).
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &AttrValue) -> Option<bool> {
        let ord = match (self, other) {
            (AttrValue::Length(a), AttrValue::Length(b))
            | (AttrValue::Count(a), AttrValue::Count(b)) => a.cmp(b),
            _ => {
                let equal = self.equals_same_kind(other)?;
                return match op {
                    CompareOp::Eq => Some(equal),
                    CompareOp::Neq => Some(!equal),
                    _ => None,
                };
            }
        };
        Some(match op {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
        })
    }

    fn equals_same_kind(&self, other: &AttrValue) -> Option<bool> {
        match (self, other) {
            (AttrValue::Layer(a), AttrValue::Layer(b)) => Some(a == b),
            (AttrValue::Text(a), AttrValue::Text(b)) => Some(a == b),
            (AttrValue::ItemType(a), AttrValue::ItemType(b)) => Some(a == b),
            _ => None,
        }
    }
}

impl From<LayerId> for AttrValue {
    fn from(v: LayerId) -> Self {
        AttrValue::Layer(v)
    }
}

impl From<ItemType> for AttrValue {
    fn from(v: ItemType) -> Self {
        AttrValue::ItemType(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Layer(v) => write!(f, "{v}"),
            AttrValue::Text(v) => write!(f, "\"{v}\""),
            AttrValue::ItemType(v) => write!(f, "{v}"),
            AttrValue::Length(v) => write!(f, "{}", super::Dimension::length_nm(*v)),
            AttrValue::Count(v) => write!(f, "{v}"),
        }
    }
}
