//! Polygon boolean and offset engine.
//!
//! Mediates between floating-point world millimetres and the integer-
//! coordinate Clipper kernel. Every coordinate crossing the boundary is
//! quantised to the 1/1000 mm grid (`f64::round` rounds half away from
//! zero), and the same factor is handed to the kernel so the integers it
//! sees are exact.
//!
//! All operations accept and return flat lists of simple rings; holes
//! produced by the kernel are not propagated. A kernel result that is empty
//! for a clearly non-empty input is treated as a numeric edge case: union
//! and offset fall back to returning the subject unchanged, difference and
//! Minkowski return the empty list. Nothing in this module panics or
//! returns an error.

use crate::geometry::{self, BoundingBox};
use geo::{Coord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};
use std::sync::atomic::{AtomicBool, Ordering};

/// World-to-integer scale factor (sub-millimetre precision).
pub const CLIPPER_SCALE: f64 = 1000.0;

/// Miter limit for offset joins.
const MITER_LIMIT: f64 = 2.0;

static KERNEL_READY: AtomicBool = AtomicBool::new(false);

/// The kernel is linked statically and needs no asynchronous setup, but the
/// readiness flag is kept so cold-start callers (the collision oracle's
/// geometric path) can tell whether boolean results are available yet.
fn ensure_kernel() {
    KERNEL_READY.store(true, Ordering::Relaxed);
}

/// True once the kernel has served at least one operation.
pub fn kernel_ready() -> bool {
    KERNEL_READY.load(Ordering::Relaxed)
}

/// Quantises a world coordinate to the kernel grid.
#[inline]
fn quantize(v: f64) -> f64 {
    (v * CLIPPER_SCALE).round() / CLIPPER_SCALE
}

fn ring_to_geo(ring: &[(f64, f64)]) -> GeoPolygon<f64> {
    let mut coords: Vec<Coord<f64>> = ring
        .iter()
        .map(|&(x, y)| Coord {
            x: quantize(x),
            y: quantize(y),
        })
        .collect();

    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(*first);
        }
    }

    GeoPolygon::new(LineString::new(coords), vec![])
}

fn rings_to_multi(rings: &[Vec<(f64, f64)>]) -> MultiPolygon<f64> {
    MultiPolygon::new(rings.iter().map(|r| ring_to_geo(r)).collect())
}

fn multi_to_rings(multi: &MultiPolygon<f64>) -> Vec<Vec<(f64, f64)>> {
    let mut rings = Vec::new();
    for polygon in &multi.0 {
        let mut ring: Vec<(f64, f64)> =
            polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }
    rings
}

/// Drops rings that cannot carry area.
fn usable(rings: &[Vec<(f64, f64)>]) -> Vec<Vec<(f64, f64)>> {
    rings.iter().filter(|r| r.len() >= 3).cloned().collect()
}

/// Merges touching and overlapping rings (non-zero fill).
///
/// Falls back to returning the input unchanged when the kernel produces
/// nothing for a non-empty input.
pub fn union(rings: &[Vec<(f64, f64)>]) -> Vec<Vec<(f64, f64)>> {
    let subject = usable(rings);
    if subject.len() <= 1 {
        return subject;
    }

    ensure_kernel();
    let first = rings_to_multi(&subject[..1]);
    let rest = rings_to_multi(&subject[1..]);
    let result = first.union(&rest, CLIPPER_SCALE);
    let merged = multi_to_rings(&result);

    if merged.is_empty() {
        log::warn!("union collapsed {} rings to nothing, keeping subject", subject.len());
        return subject;
    }
    merged
}

/// Subtracts `clip` from `subject` (non-zero fill). An empty result is a
/// legitimate outcome.
pub fn difference(
    subject: &[Vec<(f64, f64)>],
    clip: &[Vec<(f64, f64)>],
) -> Vec<Vec<(f64, f64)>> {
    let subject = usable(subject);
    let clip = usable(clip);

    if subject.is_empty() {
        return Vec::new();
    }
    if clip.is_empty() {
        return subject;
    }

    ensure_kernel();
    let result = rings_to_multi(&subject).difference(&rings_to_multi(&clip), CLIPPER_SCALE);
    multi_to_rings(&result)
}

/// Intersects `subject` with `clip` (non-zero fill).
pub fn intersection(
    subject: &[Vec<(f64, f64)>],
    clip: &[Vec<(f64, f64)>],
) -> Vec<Vec<(f64, f64)>> {
    let subject = usable(subject);
    let clip = usable(clip);

    if subject.is_empty() || clip.is_empty() {
        return Vec::new();
    }

    ensure_kernel();
    let result = rings_to_multi(&subject).intersection(&rings_to_multi(&clip), CLIPPER_SCALE);
    multi_to_rings(&result)
}

/// Offsets closed rings by `delta` (positive expands, negative contracts)
/// with mitered joins. `delta = 0` is the identity.
pub fn offset(rings: &[Vec<(f64, f64)>], delta: f64) -> Vec<Vec<(f64, f64)>> {
    let subject = usable(rings);
    if subject.is_empty() || delta == 0.0 {
        return subject;
    }

    ensure_kernel();
    let result = rings_to_multi(&subject).offset(
        delta,
        JoinType::Miter(MITER_LIMIT),
        EndType::ClosedPolygon,
        CLIPPER_SCALE,
    );
    let expanded = multi_to_rings(&result);

    if expanded.is_empty() && delta > 0.0 {
        log::warn!("positive offset by {delta} produced nothing, keeping subject");
        return subject;
    }
    expanded
}

/// Minkowski sum of two closed rings.
///
/// Convex inputs take the O(n + m) edge-merge path. Non-convex inputs are
/// ear-clipped into convex pieces, the pairwise sums are taken, and the
/// parts are merged through [`union`]. Returns empty when either input is
/// degenerate.
pub fn minkowski_sum_path(
    pattern: &[(f64, f64)],
    subject: &[(f64, f64)],
) -> Vec<Vec<(f64, f64)>> {
    if pattern.len() < 3 || subject.len() < 3 {
        return Vec::new();
    }

    if geometry::is_convex(pattern) && geometry::is_convex(subject) {
        let sum = geometry::minkowski_sum_convex(pattern, subject);
        return if sum.len() >= 3 { vec![sum] } else { Vec::new() };
    }

    let pattern_parts = geometry::triangulate(pattern);
    let subject_parts = geometry::triangulate(subject);
    if pattern_parts.is_empty() || subject_parts.is_empty() {
        return Vec::new();
    }

    let mut partial: Vec<Vec<(f64, f64)>> = Vec::new();
    for sp in &subject_parts {
        for pp in &pattern_parts {
            let sum = geometry::minkowski_sum_convex(pp, sp);
            if sum.len() >= 3 {
                partial.push(sum);
            }
        }
    }

    if partial.is_empty() {
        return Vec::new();
    }
    union(&partial)
}

/// Bounding box over a set of rings; useful for adaptive sampling of kernel
/// output.
pub fn rings_bounding_box(rings: &[Vec<(f64, f64)>]) -> BoundingBox {
    geometry::union_bounding_box(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon_area;
    use approx::assert_relative_eq;

    fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Vec<(f64, f64)> {
        vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
    }

    fn total_area(rings: &[Vec<(f64, f64)>]) -> f64 {
        rings.iter().map(|r| polygon_area(r)).sum()
    }

    #[test]
    fn test_union_overlapping() {
        let merged = union(&[rect_at(0.0, 0.0, 10.0, 10.0), rect_at(5.0, 0.0, 10.0, 10.0)]);
        assert_eq!(merged.len(), 1);
        assert_relative_eq!(total_area(&merged), 150.0, epsilon = 0.01);
        assert!(kernel_ready());
    }

    #[test]
    fn test_union_disjoint() {
        let merged = union(&[rect_at(0.0, 0.0, 10.0, 10.0), rect_at(20.0, 0.0, 10.0, 10.0)]);
        assert_eq!(merged.len(), 2);
        assert_relative_eq!(total_area(&merged), 200.0, epsilon = 0.01);
    }

    #[test]
    fn test_union_single_is_identity() {
        let single = union(&[rect_at(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(single.len(), 1);
        assert_relative_eq!(total_area(&single), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference() {
        let result = difference(
            &[rect_at(0.0, 0.0, 10.0, 10.0)],
            &[rect_at(5.0, 0.0, 10.0, 10.0)],
        );
        assert_relative_eq!(total_area(&result), 50.0, epsilon = 0.01);
    }

    #[test]
    fn test_difference_total() {
        let result = difference(
            &[rect_at(2.0, 2.0, 5.0, 5.0)],
            &[rect_at(0.0, 0.0, 10.0, 10.0)],
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_intersection() {
        let result = intersection(
            &[rect_at(0.0, 0.0, 10.0, 10.0)],
            &[rect_at(5.0, 5.0, 10.0, 10.0)],
        );
        assert_relative_eq!(total_area(&result), 25.0, epsilon = 0.01);

        let empty = intersection(
            &[rect_at(0.0, 0.0, 10.0, 10.0)],
            &[rect_at(20.0, 20.0, 5.0, 5.0)],
        );
        assert!(empty.is_empty());
    }

    #[test]
    fn test_offset_zero_is_identity() {
        let rings = vec![rect_at(0.0, 0.0, 10.0, 10.0)];
        let result = offset(&rings, 0.0);
        assert_eq!(result, rings);
    }

    #[test]
    fn test_offset_expand_miter() {
        let result = offset(&[rect_at(0.0, 0.0, 10.0, 10.0)], 2.0);
        assert_eq!(result.len(), 1);
        // Mitered square offset keeps square corners: (10+4)^2
        assert_relative_eq!(total_area(&result), 196.0, epsilon = 0.5);
    }

    #[test]
    fn test_offset_contract() {
        let result = offset(&[rect_at(0.0, 0.0, 10.0, 10.0)], -2.0);
        assert_relative_eq!(total_area(&result), 36.0, epsilon = 0.5);

        // Contracting past collapse is a legitimate empty result
        let gone = offset(&[rect_at(0.0, 0.0, 10.0, 10.0)], -6.0);
        assert!(gone.is_empty());
    }

    #[test]
    fn test_minkowski_convex() {
        let sum = minkowski_sum_path(&rect_at(0.0, 0.0, 5.0, 5.0), &rect_at(0.0, 0.0, 10.0, 10.0));
        assert_eq!(sum.len(), 1);
        assert_relative_eq!(total_area(&sum), 225.0, epsilon = 0.01);
    }

    #[test]
    fn test_minkowski_concave() {
        let l_shape = vec![
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 30.0),
            (0.0, 30.0),
        ];
        let square = rect_at(0.0, 0.0, 4.0, 4.0);
        let sum = minkowski_sum_path(&square, &l_shape);

        assert!(!sum.is_empty());
        // The sum strictly contains the subject: area grows by at least the
        // square's area.
        assert!(total_area(&sum) > polygon_area(&l_shape) + polygon_area(&square));
        let bbox = rings_bounding_box(&sum);
        assert_relative_eq!(bbox.width, 24.0, epsilon = 0.01);
        assert_relative_eq!(bbox.height, 34.0, epsilon = 0.01);
    }

    #[test]
    fn test_minkowski_degenerate() {
        assert!(minkowski_sum_path(&[(0.0, 0.0), (1.0, 1.0)], &rect_at(0.0, 0.0, 5.0, 5.0))
            .is_empty());
    }

    #[test]
    fn test_quantisation_boundary() {
        // Coordinates snap to the 1/1000 grid, half away from zero
        assert_eq!(quantize(0.00049), 0.0);
        assert_eq!(quantize(0.0005), 0.001);
        assert_eq!(quantize(-0.0005), -0.001);
    }
}
