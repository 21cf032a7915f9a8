//! No-Fit Polygon and Inner-Fit Polygon construction.
//!
//! The NFP of a fixed polygon A and a moving polygon B is the locus of
//! anchor positions (B's first vertex) at which B touches or overlaps A,
//! computed as the Minkowski sum `A ⊕ (−B)` after translating B so its
//! anchor sits on the origin. Placing the anchor strictly outside the NFP
//! keeps the polygons disjoint; on the boundary they touch.
//!
//! The IFP is the dual for containers: the locus of anchor positions at
//! which B fits inside the bin. For the rectangular bins used by the driver
//! there is a closed form; the general Minkowski-erosion form is kept for
//! non-rectangular bins and as a cross-check.

use crate::clip;
use crate::geometry::{self, BoundingBox};
use std::collections::HashMap;

/// An NFP or IFP result: zero or more simple rings.
#[derive(Debug, Clone, Default)]
pub struct Nfp {
    /// The rings. Non-convex inputs can produce several.
    pub polygons: Vec<Vec<(f64, f64)>>,
}

impl Nfp {
    /// Creates an empty NFP.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an NFP with a single ring.
    pub fn from_ring(ring: Vec<(f64, f64)>) -> Self {
        Self {
            polygons: vec![ring],
        }
    }

    /// Creates an NFP from multiple rings.
    pub fn from_rings(polygons: Vec<Vec<(f64, f64)>>) -> Self {
        Self { polygons }
    }

    /// Returns true if the NFP has no rings.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Total vertex count across all rings.
    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.len()).sum()
    }

    /// Bounding box over all rings.
    pub fn bounding_box(&self) -> BoundingBox {
        geometry::union_bounding_box(&self.polygons)
    }

    /// Returns the NFP translated by `offset`.
    pub fn translated(&self, offset: (f64, f64)) -> Nfp {
        Nfp {
            polygons: self
                .polygons
                .iter()
                .map(|ring| geometry::translate_polygon(ring, offset.0, offset.1))
                .collect(),
        }
    }

    /// True when `point` lies inside any ring.
    pub fn contains_point(&self, point: (f64, f64)) -> bool {
        self.polygons
            .iter()
            .any(|ring| geometry::point_in_polygon(point, ring))
    }
}

/// Computes `NFP(fixed, moving) = fixed ⊕ (−moving)` with the moving
/// polygon anchored at its first vertex.
///
/// Degenerate input (fewer than three vertices) yields an empty NFP, as
/// does a kernel numeric edge.
pub fn compute_nfp(fixed: &[(f64, f64)], moving: &[(f64, f64)]) -> Nfp {
    if fixed.len() < 3 || moving.len() < 3 {
        return Nfp::new();
    }

    let anchored = geometry::normalize_to_first_vertex(moving);
    let negated: Vec<(f64, f64)> = anchored.iter().map(|&(x, y)| (-x, -y)).collect();

    Nfp::from_rings(clip::minkowski_sum_path(&negated, fixed))
}

/// Closed-form IFP for an axis-aligned rectangular bin.
///
/// With `ref = moving[0]` and the moving polygon's bounding box
/// `[min_x..max_x] × [min_y..max_y]`, valid anchor positions form the
/// rectangle shrunk by the anchor's offsets to each bbox side. A
/// zero-width or zero-height result is a legitimate exact fit; only a
/// negative extent is empty.
pub fn ifp_rect(bin: &BoundingBox, moving: &[(f64, f64)]) -> Nfp {
    if moving.len() < 3 || !bin.is_valid() {
        return Nfp::new();
    }

    let anchor = moving[0];
    let bbox = geometry::bounding_box(moving);

    let offset_left = anchor.0 - bbox.x;
    let offset_right = bbox.right() - anchor.0;
    let offset_bottom = anchor.1 - bbox.y;
    let offset_top = bbox.top() - anchor.1;

    let min_x = bin.x + offset_left;
    let max_x = bin.right() - offset_right;
    let min_y = bin.y + offset_bottom;
    let max_y = bin.top() - offset_top;

    const EPS: f64 = 1e-9;
    if min_x > max_x + EPS || min_y > max_y + EPS {
        return Nfp::new();
    }

    let max_x = max_x.max(min_x);
    let max_y = max_y.max(min_y);

    Nfp::from_ring(vec![
        (min_x, min_y),
        (max_x, min_y),
        (max_x, max_y),
        (min_x, max_y),
    ])
}

/// General IFP by Minkowski erosion: the intersection of the bin translated
/// by the negation of each vertex of the anchored moving polygon.
///
/// Only exercised on rectangular bins by the driver; kept for general bins
/// and unit-tested against [`ifp_rect`] on rectangles.
pub fn ifp_general(bin: &[(f64, f64)], moving: &[(f64, f64)]) -> Nfp {
    if bin.len() < 3 || moving.len() < 3 {
        return Nfp::new();
    }

    let anchored = geometry::normalize_to_first_vertex(moving);

    let mut result: Vec<Vec<(f64, f64)>> = vec![geometry::translate_polygon(
        bin,
        -anchored[0].0,
        -anchored[0].1,
    )];

    for &(gx, gy) in anchored.iter().skip(1) {
        let translated = vec![geometry::translate_polygon(bin, -gx, -gy)];
        result = clip::intersection(&result, &translated);
        if result.is_empty() {
            return Nfp::new();
        }
    }

    Nfp::from_rings(result)
}

/// Cache key for NFP lookups: structural fingerprints of both shapes, both
/// rotations in whole millidegrees, and the inside (IFP) flag.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct NfpKey {
    shape_a: String,
    shape_b: String,
    rotation_a: i64,
    rotation_b: i64,
    inside: bool,
}

impl NfpKey {
    /// Builds a key from shape fingerprints and rotations in degrees.
    pub fn new(
        shape_a: impl Into<String>,
        shape_b: impl Into<String>,
        rotation_a_deg: f64,
        rotation_b_deg: f64,
        inside: bool,
    ) -> Self {
        Self {
            shape_a: shape_a.into(),
            shape_b: shape_b.into(),
            rotation_a: (rotation_a_deg * 1000.0).round() as i64,
            rotation_b: (rotation_b_deg * 1000.0).round() as i64,
            inside,
        }
    }
}

/// Process-local NFP cache.
///
/// A plain map with a single writer: each placer owns one cache, and
/// parallel search partitions by placer instance rather than sharing.
/// Entries live for the duration of one nesting job.
#[derive(Debug, Default)]
pub struct NfpCache {
    entries: HashMap<NfpKey, Nfp>,
}

impl NfpCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached NFP for `key`, computing and storing it on miss.
    pub fn get_or_compute<F>(&mut self, key: NfpKey, compute: F) -> &Nfp
    where
        F: FnOnce() -> Nfp,
    {
        self.entries.entry(key).or_insert_with(compute)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries (per-job invalidation).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision;
    use crate::geometry::{normalize_to_first_vertex, translate_polygon};
    use approx::assert_relative_eq;

    fn rect(w: f64, h: f64) -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
    }

    fn l_shape() -> Vec<(f64, f64)> {
        vec![
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 30.0),
            (0.0, 30.0),
        ]
    }

    #[test]
    fn test_nfp_two_squares() {
        let nfp = compute_nfp(&rect(10.0, 10.0), &rect(5.0, 5.0));
        assert!(!nfp.is_empty());

        // A ⊕ (−B) for a 10-square and an origin-anchored 5-square spans
        // [-5, 10] in both axes.
        let bbox = nfp.bounding_box();
        assert_relative_eq!(bbox.x, -5.0, epsilon = 0.01);
        assert_relative_eq!(bbox.y, -5.0, epsilon = 0.01);
        assert_relative_eq!(bbox.width, 15.0, epsilon = 0.01);
        assert_relative_eq!(bbox.height, 15.0, epsilon = 0.01);
    }

    #[test]
    fn test_nfp_degenerate_input() {
        assert!(compute_nfp(&rect(10.0, 10.0), &[(0.0, 0.0), (1.0, 0.0)]).is_empty());
        assert!(compute_nfp(&[], &rect(5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_nfp_probe_contract() {
        // Interior anchor positions overlap, exterior ones stay disjoint.
        let fixed = l_shape();
        let moving = rect(6.0, 6.0);
        let nfp = compute_nfp(&fixed, &moving);
        assert!(!nfp.is_empty());

        let anchored = normalize_to_first_vertex(&moving);
        let bbox = nfp.bounding_box();
        let tolerance = 2.0 / clip::CLIPPER_SCALE;

        let steps = 17;
        for iy in 0..steps {
            for ix in 0..steps {
                let p = (
                    bbox.x - 2.0 + (bbox.width + 4.0) * ix as f64 / (steps - 1) as f64,
                    bbox.y - 2.0 + (bbox.height + 4.0) * iy as f64 / (steps - 1) as f64,
                );

                // Skip probes hugging the NFP boundary; contact is allowed
                // there and float noise decides either way.
                let near_boundary = nfp.polygons.iter().any(|ring| {
                    let n = ring.len();
                    (0..n).any(|i| {
                        geometry::point_to_segment_distance(p, ring[i], ring[(i + 1) % n])
                            < tolerance
                    })
                });
                if near_boundary {
                    continue;
                }

                let placed = translate_polygon(&anchored, p.0, p.1);
                let overlaps = collision::collides(&fixed, &placed, 0.0);
                assert_eq!(
                    nfp.contains_point(p),
                    overlaps,
                    "probe {:?} disagrees with NFP",
                    p
                );
            }
        }
    }

    #[test]
    fn test_ifp_rect_basic() {
        let bin = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let ifp = ifp_rect(&bin, &rect(10.0, 10.0));
        assert!(!ifp.is_empty());

        let bbox = ifp.bounding_box();
        assert_relative_eq!(bbox.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.width, 90.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.height, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ifp_rect_anchor_not_at_bbox_min() {
        // Anchor at the top of the triangle shifts the valid rectangle
        let triangle = vec![(5.0, 10.0), (0.0, 0.0), (10.0, 0.0)];
        let bin = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let ifp = ifp_rect(&bin, &triangle);

        let bbox = ifp.bounding_box();
        assert_relative_eq!(bbox.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.width, 90.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.height, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ifp_rect_exact_fit() {
        let bin = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let ifp = ifp_rect(&bin, &rect(50.0, 50.0));
        // Exactly one anchor position: degenerate but not empty
        assert!(!ifp.is_empty());
        let bbox = ifp.bounding_box();
        assert_relative_eq!(bbox.width, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.height, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ifp_rect_oversize() {
        let bin = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        assert!(ifp_rect(&bin, &rect(60.0, 10.0)).is_empty());
        assert!(ifp_rect(&bin, &rect(10.0, 60.0)).is_empty());
    }

    #[test]
    fn test_ifp_general_matches_rect() {
        let bin_box = BoundingBox::new(0.0, 0.0, 100.0, 60.0);
        let bin_ring = bin_box.to_ring();

        for moving in [rect(10.0, 10.0), rect(25.0, 12.0), l_shape()] {
            let fast = ifp_rect(&bin_box, &moving);
            let general = ifp_general(&bin_ring, &moving);
            assert!(!fast.is_empty());
            assert!(!general.is_empty());

            let fb = fast.bounding_box();
            let gb = general.bounding_box();
            assert_relative_eq!(fb.x, gb.x, epsilon = 0.01);
            assert_relative_eq!(fb.y, gb.y, epsilon = 0.01);
            assert_relative_eq!(fb.width, gb.width, epsilon = 0.01);
            assert_relative_eq!(fb.height, gb.height, epsilon = 0.01);
        }
    }

    #[test]
    fn test_nfp_cache_computes_once() {
        let mut cache = NfpCache::new();
        let mut computations = 0;

        let key = NfpKey::new("p4_a100", "p4_a25", 0.0, 90.0, false);
        cache.get_or_compute(key.clone(), || {
            computations += 1;
            compute_nfp(&rect(10.0, 10.0), &rect(5.0, 5.0))
        });
        cache.get_or_compute(key, || {
            computations += 1;
            compute_nfp(&rect(10.0, 10.0), &rect(5.0, 5.0))
        });

        assert_eq!(computations, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_nfp_cache_distinct_rotations() {
        let mut cache = NfpCache::new();
        for rot in [0.0, 90.0, 180.0, 270.0] {
            cache.get_or_compute(NfpKey::new("a", "b", 0.0, rot, false), Nfp::new);
        }
        assert_eq!(cache.len(), 4);

        // The inside flag separates NFP from IFP entries
        cache.get_or_compute(NfpKey::new("a", "b", 0.0, 0.0, true), Nfp::new);
        assert_eq!(cache.len(), 5);

        cache.clear();
        assert!(cache.is_empty());
    }
}
