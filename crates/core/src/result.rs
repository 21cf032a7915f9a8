//! Per-sheet nesting result.

use crate::placement::{Placement, PlacementStats};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of nesting one design onto one sheet.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NestingResult {
    /// Identifier of the sheet preset.
    pub sheet_id: String,
    /// Display name of the sheet preset.
    pub sheet_name: String,
    /// Sheet width in millimetres.
    pub sheet_width: f64,
    /// Sheet height in millimetres.
    pub sheet_height: f64,
    /// Committed placements.
    pub placements: Vec<Placement>,
    /// Number of parts placed.
    pub count: usize,
    /// Area utilisation in percent (0.0 - 100.0).
    pub efficiency: f64,
    /// Total area covered by placed parts.
    pub used_area: f64,
    /// Sheet area not covered by placed parts.
    pub wasted_area: f64,
    /// True when some placement is within 3 mm of the sheet edge.
    pub edge_warning: bool,
}

impl NestingResult {
    /// Builds a result from a placement list, computing the derived areas.
    ///
    /// `design_area` is the area of one copy of the design.
    pub fn from_placements(
        sheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        sheet_width: f64,
        sheet_height: f64,
        placements: Vec<Placement>,
        design_area: f64,
    ) -> Self {
        let count = placements.len();
        let sheet_area = sheet_width * sheet_height;
        let used_area = count as f64 * design_area;
        let efficiency = if sheet_area > 0.0 {
            100.0 * used_area / sheet_area
        } else {
            0.0
        };

        Self {
            sheet_id: sheet_id.into(),
            sheet_name: sheet_name.into(),
            sheet_width,
            sheet_height,
            placements,
            count,
            efficiency,
            used_area,
            wasted_area: sheet_area - used_area,
            edge_warning: false,
        }
    }

    /// Sets the edge warning flag.
    pub fn with_edge_warning(mut self, warning: bool) -> Self {
        self.edge_warning = warning;
        self
    }

    /// Returns true if at least one part was placed.
    pub fn is_successful(&self) -> bool {
        !self.placements.is_empty()
    }

    /// Returns the efficiency formatted as a percentage string.
    pub fn efficiency_percent(&self) -> String {
        format!("{:.1}%", self.efficiency)
    }

    /// Computes placement statistics.
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_placements(&self.placements)
    }
}

/// Sorts results by descending efficiency (best sheet first).
pub fn rank_results(results: &mut [NestingResult]) {
    results.sort_by(|a, b| {
        b.efficiency
            .partial_cmp(&a.efficiency)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(count: usize, sheet: f64) -> NestingResult {
        let placements = (0..count)
            .map(|i| Placement::new("d", i as f64 * 10.0, 0.0, 0.0))
            .collect();
        NestingResult::from_placements("s", "sheet", sheet, sheet, placements, 100.0)
    }

    #[test]
    fn test_efficiency_formula() {
        let result = result_with(6, 100.0);
        assert_eq!(result.count, 6);
        assert!((result.efficiency - 6.0).abs() < 1e-9);
        assert!((result.used_area - 600.0).abs() < 1e-9);
        assert!((result.wasted_area - 9400.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_percent_format() {
        let result = result_with(6, 100.0);
        assert_eq!(result.efficiency_percent(), "6.0%");
    }

    #[test]
    fn test_rank_results() {
        let mut results = vec![result_with(1, 100.0), result_with(8, 100.0), result_with(4, 100.0)];
        rank_results(&mut results);

        assert_eq!(results[0].count, 8);
        assert_eq!(results[1].count, 4);
        assert_eq!(results[2].count, 1);
    }
}
