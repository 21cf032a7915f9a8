//! Polygon collision oracle.
//!
//! Exact overlap tests for possibly concave polygons, built from segment
//! intersection, containment and vertex-to-edge distances. This path needs
//! no boolean kernel, so it also serves as the cold-start fallback; the
//! kernel-delegating variant [`collides_via_clip`] must agree with it to
//! within the kernel grid (1/1000 mm).

use crate::clip;
use crate::geometry::{self, BoundingBox};

/// Containment tolerance for bounds checks: exact-fit layouts put vertices
/// directly on the shrunk sheet boundary.
const BOUNDS_EPS: f64 = 1e-6;

/// Returns true when any edge of `a` properly crosses any edge of `b`.
/// Boundary contact (shared vertices, collinear touching edges) is not a
/// crossing: parts are allowed to touch.
fn edges_intersect(a: &[(f64, f64)], b: &[(f64, f64)]) -> bool {
    let n = a.len();
    let m = b.len();
    for i in 0..n {
        let a1 = a[i];
        let a2 = a[(i + 1) % n];
        for j in 0..m {
            let b1 = b[j];
            let b2 = b[(j + 1) % m];
            if geometry::segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Returns true when either polygon's reference vertex lies inside the
/// other (catches full containment once edge crossings are ruled out).
fn reference_containment(a: &[(f64, f64)], b: &[(f64, f64)]) -> bool {
    (!a.is_empty() && geometry::point_in_polygon(a[0], b))
        || (!b.is_empty() && geometry::point_in_polygon(b[0], a))
}

/// Minimum distance between two polygons.
///
/// Zero when the polygons intersect or one contains the other; otherwise
/// the minimum over each vertex of one against each edge of the other.
pub fn min_polygon_distance(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    if a.len() < 3 || b.len() < 3 {
        return f64::INFINITY;
    }

    if edges_intersect(a, b) || reference_containment(a, b) {
        return 0.0;
    }

    let mut min = f64::INFINITY;
    let n = a.len();
    let m = b.len();

    for &p in a {
        for j in 0..m {
            min = min.min(geometry::point_to_segment_distance(p, b[j], b[(j + 1) % m]));
        }
    }
    for &p in b {
        for i in 0..n {
            min = min.min(geometry::point_to_segment_distance(p, a[i], a[(i + 1) % n]));
        }
    }

    min
}

/// Exact polygon-polygon collision test.
///
/// - Bounding boxes expanded by `margin` that do not overlap mean no
///   collision, unconditionally.
/// - With `margin = 0`: collision iff any edge pair intersects or either
///   polygon contains the other's reference vertex.
/// - With `margin > 0`: collision iff the minimum polygon distance is less
///   than `margin`.
pub fn collides(a: &[(f64, f64)], b: &[(f64, f64)], margin: f64) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }

    let bbox_a = geometry::bounding_box(a);
    let bbox_b = geometry::bounding_box(b);
    if !geometry::bboxes_overlap(&bbox_a, &bbox_b, 2.0 * margin) {
        return false;
    }

    if margin > 0.0 {
        min_polygon_distance(a, b) < margin
    } else {
        edges_intersect(a, b) || reference_containment(a, b)
    }
}

/// Kernel-delegating overlap test: both polygons are expanded by half the
/// margin and collision is a non-empty intersection. Decision boundaries
/// agree with [`collides`] to within the kernel grid.
pub fn collides_via_clip(a: &[(f64, f64)], b: &[(f64, f64)], margin: f64) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }

    let bbox_a = geometry::bounding_box(a);
    let bbox_b = geometry::bounding_box(b);
    if !geometry::bboxes_overlap(&bbox_a, &bbox_b, 2.0 * margin) {
        return false;
    }

    let (subject, clip_rings) = if margin > 0.0 {
        (
            clip::offset(&[a.to_vec()], margin / 2.0),
            clip::offset(&[b.to_vec()], margin / 2.0),
        )
    } else {
        (vec![a.to_vec()], vec![b.to_vec()])
    };

    let overlap = clip::intersection(&subject, &clip_rings);
    overlap.iter().any(|r| geometry::polygon_area(r) > 0.0)
}

/// True when every vertex of `polygon` lies inside `bounds` shrunk by
/// `margin` (with a small tolerance so exact fits pass).
pub fn polygon_inside_bounds(polygon: &[(f64, f64)], bounds: &BoundingBox, margin: f64) -> bool {
    if polygon.is_empty() {
        return false;
    }

    let min_x = bounds.x + margin - BOUNDS_EPS;
    let min_y = bounds.y + margin - BOUNDS_EPS;
    let max_x = bounds.right() - margin + BOUNDS_EPS;
    let max_y = bounds.top() - margin + BOUNDS_EPS;

    polygon
        .iter()
        .all(|&(x, y)| x >= min_x && x <= max_x && y >= min_y && y <= max_y)
}

/// Minimum distance from any vertex of `polygon` to any of the four sheet
/// edges. Used for the near-edge warning.
pub fn min_distance_to_bounds(polygon: &[(f64, f64)], bounds: &BoundingBox) -> f64 {
    polygon
        .iter()
        .map(|&(x, y)| {
            (x - bounds.x)
                .min(bounds.right() - x)
                .min(y - bounds.y)
                .min(bounds.top() - y)
        })
        .fold(f64::INFINITY, f64::min)
}

/// Pairwise collision check over a full placement set.
pub fn any_pair_collides(polygons: &[Vec<(f64, f64)>], margin: f64) -> bool {
    for i in 0..polygons.len() {
        for j in (i + 1)..polygons.len() {
            if collides(&polygons[i], &polygons[j], margin) {
                return true;
            }
        }
    }
    false
}
