//! Manual-layout validation.
//!
//! After the engine has produced a layout the user may drag parts around;
//! these checks gate both the committed layout (hard bounds, margin-aware
//! pair collisions) and the transient drag position. Findings are reported
//! as human-readable messages with 1-based placement indices.

use crate::collision;
use crate::design::{rendered_polygon, Design, MainPolygonRule, SheetPreset};
use sheetnest_core::Placement;

/// Validates a user-edited placement list against a sheet.
///
/// Every placement must be contained in the sheet (hard bounds, margin 0)
/// and every pair must be collision-free with the configured margin.
/// Returns one message per violation; an empty list means the layout is
/// valid.
pub fn validate_layout(
    design: &Design,
    placements: &[Placement],
    sheet: &SheetPreset,
    margin: f64,
) -> Vec<String> {
    validate_layout_with_rule(design, placements, sheet, margin, MainPolygonRule::default())
}

/// [`validate_layout`] with an explicit main-polygon rule.
pub fn validate_layout_with_rule(
    design: &Design,
    placements: &[Placement],
    sheet: &SheetPreset,
    margin: f64,
    rule: MainPolygonRule,
) -> Vec<String> {
    let bounds = sheet.bounds();
    let rendered: Vec<Vec<(f64, f64)>> = placements
        .iter()
        .map(|p| rendered_polygon(design, p, rule))
        .collect();

    let mut errors = Vec::new();

    for (i, polygon) in rendered.iter().enumerate() {
        if !collision::polygon_inside_bounds(polygon, &bounds, 0.0) {
            errors.push(format!("Placement {} is outside the sheet", i + 1));
        }
    }

    for i in 0..rendered.len() {
        for j in (i + 1)..rendered.len() {
            if collision::collides(&rendered[i], &rendered[j], margin) {
                errors.push(format!("Placements {} and {} overlap", i + 1, j + 1));
            }
        }
    }

    errors
}

/// Drag-time test: would moving placement `index` to `(x, y)` keep the
/// layout valid? Bounds are checked with the margin (the drag must not
/// enter the edge band) and collisions against every other placement use
/// the margin too. Invalid moves simply leave the position unchanged.
pub fn drag_position_valid(
    design: &Design,
    placements: &[Placement],
    index: usize,
    x: f64,
    y: f64,
    sheet: &SheetPreset,
    margin: f64,
) -> bool {
    let Some(placement) = placements.get(index) else {
        return false;
    };

    let moved = Placement::new(placement.design_id.clone(), x, y, placement.rotation);
    let polygon = rendered_polygon(design, &moved, MainPolygonRule::default());

    if !collision::polygon_inside_bounds(&polygon, &sheet.bounds(), margin) {
        return false;
    }

    for (i, other) in placements.iter().enumerate() {
        if i == index {
            continue;
        }
        let other_polygon = rendered_polygon(design, other, MainPolygonRule::default());
        if collision::collides(&polygon, &other_polygon, margin) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> SheetPreset {
        SheetPreset::new("s", "Sheet", 100.0, 100.0, "test")
    }

    #[test]
    fn test_valid_layout_passes() {
        let design = Design::rectangle("r", 20.0, 20.0);
        let placements = vec![
            Placement::new("r", 5.0, 5.0, 0.0),
            Placement::new("r", 40.0, 5.0, 0.0),
        ];

        assert!(validate_layout(&design, &placements, &sheet(), 3.0).is_empty());
    }

    #[test]
    fn test_out_of_bounds_reported_one_based() {
        let design = Design::rectangle("r", 20.0, 20.0);
        let placements = vec![
            Placement::new("r", 5.0, 5.0, 0.0),
            Placement::new("r", 90.0, 5.0, 0.0), // right edge at 110
        ];

        let errors = validate_layout(&design, &placements, &sheet(), 3.0);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Placement 2"));
    }

    #[test]
    fn test_collision_reported_with_margin() {
        let design = Design::rectangle("r", 20.0, 20.0);
        // 2 mm apart: clear of each other but inside the 3 mm margin
        let placements = vec![
            Placement::new("r", 5.0, 5.0, 0.0),
            Placement::new("r", 27.0, 5.0, 0.0),
        ];

        let errors = validate_layout(&design, &placements, &sheet(), 3.0);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("1 and 2"));

        assert!(validate_layout(&design, &placements, &sheet(), 0.0).is_empty());
    }

    #[test]
    fn test_drag_validation() {
        let design = Design::rectangle("r", 20.0, 20.0);
        let placements = vec![
            Placement::new("r", 5.0, 5.0, 0.0),
            Placement::new("r", 60.0, 5.0, 0.0),
        ];

        // A clear spot is fine
        assert!(drag_position_valid(
            &design,
            &placements,
            1,
            60.0,
            60.0,
            &sheet(),
            3.0
        ));
        // Onto the other part is not
        assert!(!drag_position_valid(
            &design,
            &placements,
            1,
            10.0,
            10.0,
            &sheet(),
            3.0
        ));
        // Into the margin band is not
        assert!(!drag_position_valid(
            &design,
            &placements,
            1,
            79.0,
            60.0,
            &sheet(),
            3.0
        ));
        // Unknown index never validates
        assert!(!drag_position_valid(
            &design,
            &placements,
            5,
            60.0,
            60.0,
            &sheet(),
            3.0
        ));
    }
}
