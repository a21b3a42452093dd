use std::fmt;

use super::dimension::Dimension;
use super::expr::Expr;
use super::layer::LayerId;

/// Stable index of a condition inside its [`RuleModel`](super::RuleModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId(pub usize);

/// A named, reusable boolean expression over board-item attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub name: String,
    pub expr: Expr,
}

/// Kinds of constraint a rule can carry. The parameter shape of each kind
/// lives in the [`Vocabulary`](super::Vocabulary) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConstraintKind {
    Clearance,
    HoleClearance,
    EdgeClearance,
    TrackWidth,
    ViaDiameter,
    HoleSize,
    AnnularWidth,
    DiffPairGap,
    TrackLength,
    Skew,
    TrackAngle,
    PasteMarginRatio,
    ViaCount,
}

impl ConstraintKind {
    /// Keyword used for this kind in the default vocabulary.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ConstraintKind::Clearance => "clearance",
            ConstraintKind::HoleClearance => "hole_clearance",
            ConstraintKind::EdgeClearance => "edge_clearance",
            ConstraintKind::TrackWidth => "track_width",
            ConstraintKind::ViaDiameter => "via_diameter",
            ConstraintKind::HoleSize => "hole_size",
            ConstraintKind::AnnularWidth => "annular_width",
            ConstraintKind::DiffPairGap => "diff_pair_gap",
            ConstraintKind::TrackLength => "track_length",
            ConstraintKind::Skew => "skew",
            ConstraintKind::TrackAngle => "track_angle",
            ConstraintKind::PasteMarginRatio => "paste_margin_ratio",
            ConstraintKind::ViaCount => "via_count",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One constraint line of a rule body, parameters already in internal units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub params: Vec<Dimension>,
}

impl Constraint {
    #[must_use]
    pub fn new(kind: ConstraintKind, params: Vec<Dimension>) -> Self {
        Self { kind, params }
    }

    /// The first parameter (the minimum, for min/max kinds).
    #[must_use]
    pub fn value(&self) -> Option<Dimension> {
        self.params.first().copied()
    }

    /// The second parameter of a min/max pair, if given.
    #[must_use]
    pub fn max(&self) -> Option<Dimension> {
        self.params.get(1).copied()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (i, p) in self.params.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{p}")?;
        }
        Ok(())
    }
}

/// A named constraint set, optionally restricted to a layer and gated by
/// conditions (all of which must hold).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub layer: Option<LayerId>,
    pub conditions: Vec<ConditionId>,
    pub constraints: Vec<Constraint>,
}

impl Rule {
    /// First constraint of the given kind.
    #[must_use]
    pub fn constraint(&self, kind: ConstraintKind) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.kind == kind)
    }
}
