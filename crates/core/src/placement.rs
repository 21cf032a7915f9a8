//! Placement representation for positioned parts.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A positioned copy of a design on a sheet.
///
/// `(x, y)` is the translation applied *after* rotating the design about its
/// bounding-box centre. `rotation` is in degrees and intentionally a plain
/// `f64`: layouts produced with a fine rotation step keep their exact angle
/// instead of being quantised to quarter turns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The ID of the placed design.
    pub design_id: String,
    /// X translation in millimetres.
    pub x: f64,
    /// Y translation in millimetres.
    pub y: f64,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(design_id: impl Into<String>, x: f64, y: f64, rotation: f64) -> Self {
        Self {
            design_id: design_id.into(),
            x,
            y,
            rotation,
        }
    }

    /// Returns the placement translated by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            design_id: self.design_id.clone(),
            x: self.x + dx,
            y: self.y + dy,
            rotation: self.rotation,
        }
    }
}

/// Aggregate statistics over a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Placements per rotation angle (keyed by whole millidegrees).
    pub rotation_distribution: HashMap<i64, usize>,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements(placements: &[Placement]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            let key = (p.rotation * 1000.0).round() as i64;
            *stats.rotation_distribution.entry(key).or_insert(0) += 1;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_new() {
        let p = Placement::new("part", 10.0, 20.0, 90.0);
        assert_eq!(p.design_id, "part");
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
        assert_eq!(p.rotation, 90.0);
    }

    #[test]
    fn test_placement_translated() {
        let p = Placement::new("part", 10.0, 20.0, 0.0).translated(5.0, -5.0);
        assert_eq!(p.x, 15.0);
        assert_eq!(p.y, 15.0);
    }

    #[test]
    fn test_placement_stats() {
        let placements = vec![
            Placement::new("a", 0.0, 0.0, 0.0),
            Placement::new("a", 10.0, 0.0, 90.0),
            Placement::new("a", 20.0, 0.0, 90.0),
        ];

        let stats = PlacementStats::from_placements(&placements);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.rotation_distribution.get(&0), Some(&1));
        assert_eq!(stats.rotation_distribution.get(&90_000), Some(&2));
    }
}
