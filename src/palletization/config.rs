//! Packing configuration.

use serde::{Deserialize, Serialize};

use crate::models::PalletSpec;

/// How strictly the units of one order stay together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupingPolicy {
    /// An order is packed onto exactly one pallet. An order that does not fit
    /// an empty pallet is an error.
    #[default]
    Cohesive,
    /// An order is kept together when some pallet takes it whole; otherwise
    /// its units are placed one by one.
    Preferred,
    /// Units are placed one by one regardless of their order.
    Independent,
}

/// Scoring of feasible `(space, orientation)` candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementRule {
    /// Lowest `y`, then lowest `x`.
    #[default]
    BottomLeft,
    /// Largest distance between the item's top-right corner and the far
    /// corner of the pallet.
    FarCorner,
}

/// Palletizer settings.
///
/// # Examples
///
/// ```
/// use u_picking::models::PalletSpec;
/// use u_picking::palletization::{GroupingPolicy, PackingConfig, PlacementRule};
///
/// let config = PackingConfig::default()
///     .with_pallet(PalletSpec::new(80.0, 60.0).unwrap())
///     .with_grouping(GroupingPolicy::Independent)
///     .with_placement_rule(PlacementRule::FarCorner)
///     .with_rotation(false);
/// assert_eq!(config.pallet().width(), 80.0);
/// assert!(!config.allow_rotation());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackingConfig {
    pallet: PalletSpec,
    grouping: GroupingPolicy,
    placement_rule: PlacementRule,
    allow_rotation: bool,
    min_ems_edge: f64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            pallet: PalletSpec::default(),
            grouping: GroupingPolicy::default(),
            placement_rule: PlacementRule::default(),
            allow_rotation: true,
            min_ems_edge: 0.0,
        }
    }
}

impl PackingConfig {
    /// Sets the pallet specification.
    pub fn with_pallet(mut self, pallet: PalletSpec) -> Self {
        self.pallet = pallet;
        self
    }

    /// Sets the grouping policy.
    pub fn with_grouping(mut self, grouping: GroupingPolicy) -> Self {
        self.grouping = grouping;
        self
    }

    /// Sets the placement rule.
    pub fn with_placement_rule(mut self, rule: PlacementRule) -> Self {
        self.placement_rule = rule;
        self
    }

    /// Enables or disables 90° rotation.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Sets the shortest usable space edge. Spaces with a shorter edge are
    /// discarded after each placement.
    pub fn with_min_ems_edge(mut self, edge: f64) -> Self {
        self.min_ems_edge = edge;
        self
    }

    pub fn pallet(&self) -> &PalletSpec {
        &self.pallet
    }

    pub fn grouping(&self) -> GroupingPolicy {
        self.grouping
    }

    pub fn placement_rule(&self) -> PlacementRule {
        self.placement_rule
    }

    pub fn allow_rotation(&self) -> bool {
        self.allow_rotation
    }

    pub fn min_ems_edge(&self) -> f64 {
        self.min_ems_edge
    }

    /// Validates the limits.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_ems_edge.is_finite() && self.min_ems_edge >= 0.0) {
            return Err("min_ems_edge must be finite and non-negative".into());
        }
        if self.pallet.max_height().is_nan() || self.pallet.max_height() <= 0.0 {
            return Err("pallet max_height must be positive".into());
        }
        if self.pallet.max_weight().is_nan() || self.pallet.max_weight() < 0.0 {
            return Err("pallet max_weight must be non-negative".into());
        }
        Ok(())
    }
}
