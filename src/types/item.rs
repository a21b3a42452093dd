use std::collections::HashMap;

use super::expr::Attribute;
use super::layer::LayerId;
use super::value::AttrValue;

/// The view of a board item that conditions are evaluated against.
///
/// The board model itself lives with the host; it only has to answer layer
/// membership and report attribute values.
pub trait BoardItem {
    /// Whether the item occupies `layer`. Multi-layer items (vias, through-hole
    /// pads) answer `true` for each layer they span.
    fn on_layer(&self, layer: LayerId) -> bool;

    /// The item's value for a non-layer attribute, `None` if it has none.
    fn attribute(&self, attribute: Attribute) -> Option<&AttrValue>;
}

/// A plain attribute map implementing [`BoardItem`], handy for hosts that
/// flatten their items and for tests.
#[derive(Debug, Clone, Default)]
pub struct ItemContext {
    layers: Vec<LayerId>,
    values: HashMap<Attribute, AttrValue>,
}

impl ItemContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer the item occupies.
    #[must_use]
    pub fn with_layer(mut self, layer: LayerId) -> Self {
        if !self.layers.contains(&layer) {
            self.layers.push(layer);
        }
        self
    }

    /// Set an attribute value, replacing any previous one.
    #[must_use]
    pub fn set(mut self, attribute: Attribute, value: impl Into<AttrValue>) -> Self {
        self.insert(attribute, value.into());
        self
    }

    /// Set an attribute value (mutable reference version).
    pub fn insert(&mut self, attribute: Attribute, value: AttrValue) {
        self.values.insert(attribute, value);
    }

    #[must_use]
    pub fn get(&self, attribute: Attribute) -> Option<&AttrValue> {
        self.values.get(&attribute)
    }

    #[must_use]
    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }
}

impl BoardItem for ItemContext {
    fn on_layer(&self, layer: LayerId) -> bool {
        self.layers.contains(&layer)
    }

    fn attribute(&self, attribute: Attribute) -> Option<&AttrValue> {
        self.get(attribute)
    }
}
