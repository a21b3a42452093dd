use std::collections::HashMap;
use std::fmt;

/// Opaque identifier of a board layer, handed out by a [`LayerResolver`].
///
/// The parser never interprets the number; it only stores it in predicates
/// and rule layer clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u16);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lookup from canonical layer names to [`LayerId`]s, supplied by the host board.
///
/// Returning `None` is an explicit "not found": the parser reports it as an
/// unknown layer and never substitutes a default.
pub trait LayerResolver {
    fn resolve(&self, name: &str) -> Option<LayerId>;
}

impl<F> LayerResolver for F
where
    F: Fn(&str) -> Option<LayerId>,
{
    fn resolve(&self, name: &str) -> Option<LayerId> {
        self(name)
    }
}

impl LayerResolver for HashMap<String, LayerId> {
    fn resolve(&self, name: &str) -> Option<LayerId> {
        self.get(name).copied()
    }
}

/// A simple name -> id table implementing [`LayerResolver`].
#[derive(Debug, Clone, Default)]
pub struct LayerTable {
    by_name: HashMap<String, LayerId>,
    names: Vec<(LayerId, String)>,
}

impl LayerTable {
    /// Largest copper count [`standard`](Self::standard) honours; the
    /// technical layers need the remaining ids.
    pub const MAX_COPPER_LAYERS: u16 = u16::MAX - 8;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the usual stack-up for a board with `copper_layers` copper layers:
    /// `F.Cu`, `In1.Cu` .. `In{n-2}.Cu`, `B.Cu`, then the technical layers.
    ///
    /// The count is clamped to [`MAX_COPPER_LAYERS`](Self::MAX_COPPER_LAYERS)
    /// and to at least 2, so every layer gets a distinct id.
    #[must_use]
    pub fn standard(copper_layers: u16) -> Self {
        let copper_layers = copper_layers.clamp(2, Self::MAX_COPPER_LAYERS);
        let mut table = Self::new();
        let mut next = 0_u16;
        let mut push = |table: &mut Self, name: &str| {
            table.insert(name, LayerId(next));
            next += 1;
        };

        push(&mut table, "F.Cu");
        for i in 1..copper_layers - 1 {
            push(&mut table, &format!("In{i}.Cu"));
        }
        push(&mut table, "B.Cu");
        for name in [
            "F.SilkS",
            "B.SilkS",
            "F.Mask",
            "B.Mask",
            "F.Paste",
            "B.Paste",
            "Edge.Cuts",
        ] {
            push(&mut table, name);
        }
        table
    }

    /// Register a name. Re-registering a name rebinds it to the new id.
    pub fn insert(&mut self, name: &str, id: LayerId) {
        if let Some(old) = self.by_name.insert(name.to_owned(), id) {
            self.names.retain(|(i, n)| !(*i == old && n == name));
        }
        self.names.push((id, name.to_owned()));
    }

    #[must_use]
    pub fn with(mut self, name: &str, id: LayerId) -> Self {
        self.insert(name, id);
        self
    }

    /// The first name registered for `id`, if any.
    #[must_use]
    pub fn name_of(&self, id: LayerId) -> Option<&str> {
        self.names
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, n)| n.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl LayerResolver for LayerTable {
    fn resolve(&self, name: &str) -> Option<LayerId> {
        self.by_name.get(name).copied()
    }
}
