//! Design and sheet-preset types.
//!
//! A [`Design`] is created by the ingestion side (vector parser) and never
//! mutated afterwards: a set of simple closed rings in world millimetres,
//! with the enclosing bounding box and summed ring area precomputed.

use crate::geometry::{self, BoundingBox};
use geo::{Area, Centroid, ConvexHull, Coord, LineString, Polygon as GeoPolygon};
use sheetnest_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the collision shape is selected from a multi-ring design.
///
/// Layouts from the original engine picked the ring with the most vertices;
/// the area rule is the principled default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MainPolygonRule {
    /// The ring with the largest absolute area.
    #[default]
    LargestArea,
    /// The ring with the most vertices (legacy-compatible).
    MostVertices,
}

/// An immutable design to be nested: one or more simple closed rings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Design {
    id: String,
    name: String,
    view_box: BoundingBox,
    bounding_box: BoundingBox,
    polygons: Vec<Vec<(f64, f64)>>,
    total_area: f64,
}

impl Design {
    /// Creates an empty design with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            view_box: BoundingBox::default(),
            bounding_box: BoundingBox::default(),
            polygons: Vec::new(),
            total_area: 0.0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the view box reported by the parser. Defaults to the bounding
    /// box of the rings.
    pub fn with_view_box(mut self, view_box: BoundingBox) -> Self {
        self.view_box = view_box;
        self
    }

    /// Appends a closed ring and recomputes the derived values.
    pub fn with_polygon(mut self, ring: Vec<(f64, f64)>) -> Self {
        self.polygons.push(ring);
        self.recompute();
        self
    }

    /// Creates a rectangular design.
    pub fn rectangle(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new(id).with_polygon(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, height),
            (0.0, height),
        ])
    }

    /// Creates an L-shaped design: a `width × height` rectangle with the
    /// region right of `notch_width` and above `notch_height` removed.
    pub fn l_shape(
        id: impl Into<String>,
        width: f64,
        height: f64,
        notch_width: f64,
        notch_height: f64,
    ) -> Self {
        Self::new(id).with_polygon(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, notch_height),
            (notch_width, notch_height),
            (notch_width, height),
            (0.0, height),
        ])
    }

    /// Creates a circle approximation with `n` vertices.
    pub fn circle(id: impl Into<String>, radius: f64, n: usize) -> Self {
        let n = n.max(8);
        let step = std::f64::consts::TAU / n as f64;
        let ring: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let angle = i as f64 * step;
                (
                    radius + radius * angle.cos(),
                    radius + radius * angle.sin(),
                )
            })
            .collect();
        Self::new(id).with_polygon(ring)
    }

    fn recompute(&mut self) {
        self.bounding_box = geometry::union_bounding_box(&self.polygons);
        self.total_area = self.polygons.iter().map(|p| geometry::polygon_area(p)).sum();
        if self.view_box.area() == 0.0 {
            self.view_box = self.bounding_box;
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The design's rings, in ingestion order.
    pub fn polygons(&self) -> &[Vec<(f64, f64)>] {
        &self.polygons
    }

    /// Bounding box enclosing all rings.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Parser-reported view box.
    pub fn view_box(&self) -> BoundingBox {
        self.view_box
    }

    /// Summed absolute area of all rings.
    pub fn area(&self) -> f64 {
        self.total_area
    }

    /// Bounding-box width.
    pub fn width(&self) -> f64 {
        self.bounding_box.width
    }

    /// Bounding-box height.
    pub fn height(&self) -> f64 {
        self.bounding_box.height
    }

    /// Checks that the design can be nested at all: at least one ring with
    /// three or more vertices and non-zero area.
    pub fn validate(&self) -> Result<()> {
        if self.polygons.is_empty() {
            return Err(Error::InvalidGeometry(format!(
                "design '{}' has no polygons",
                self.id
            )));
        }
        let main = self.main_polygon(MainPolygonRule::default());
        if main.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "design '{}' main polygon has fewer than 3 vertices",
                self.id
            )));
        }
        if self.total_area <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "design '{}' has zero area",
                self.id
            )));
        }
        Ok(())
    }

    /// True when [`Design::validate`] succeeds. Degenerate designs
    /// short-circuit to "no placements" rather than erroring.
    pub fn is_packable(&self) -> bool {
        self.validate().is_ok()
    }

    /// Selects the collision shape according to `rule`. Falls back to the
    /// first ring when all candidates are equivalent.
    pub fn main_polygon(&self, rule: MainPolygonRule) -> &[(f64, f64)] {
        static EMPTY: &[(f64, f64)] = &[];
        if self.polygons.is_empty() {
            return EMPTY;
        }

        let idx = match rule {
            MainPolygonRule::LargestArea => self
                .polygons
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| {
                    geometry::polygon_area(a)
                        .partial_cmp(&geometry::polygon_area(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i)
                .unwrap_or(0),
            MainPolygonRule::MostVertices => self
                .polygons
                .iter()
                .enumerate()
                .max_by_key(|(_, p)| p.len())
                .map(|(i, _)| i)
                .unwrap_or(0),
        };

        &self.polygons[idx]
    }

    /// Returns a copy with every ring shifted so the common bounding box has
    /// its minimum at the origin (the ingestion frame).
    pub fn normalized(&self) -> Design {
        let bbox = self.bounding_box;
        let polygons: Vec<Vec<(f64, f64)>> = self
            .polygons
            .iter()
            .map(|ring| geometry::translate_polygon(ring, -bbox.x, -bbox.y))
            .collect();

        let mut design = Design {
            id: self.id.clone(),
            name: self.name.clone(),
            view_box: self.view_box,
            bounding_box: BoundingBox::default(),
            polygons,
            total_area: 0.0,
        };
        design.recompute();
        design
    }

    fn main_as_geo(&self) -> GeoPolygon<f64> {
        let ring = self.main_polygon(MainPolygonRule::default());
        let exterior = LineString::from(
            ring.iter().map(|&(x, y)| Coord { x, y }).collect::<Vec<_>>(),
        );
        GeoPolygon::new(exterior, vec![])
    }

    /// Area-weighted centroid of the main polygon.
    pub fn centroid(&self) -> (f64, f64) {
        match self.main_as_geo().centroid() {
            Some(c) => (c.x(), c.y()),
            None => (0.0, 0.0),
        }
    }

    /// Convex hull of the main polygon.
    pub fn convex_hull(&self) -> Vec<(f64, f64)> {
        let hull = self.main_as_geo().convex_hull();
        let mut points: Vec<(f64, f64)> =
            hull.exterior().points().map(|p| (p.x(), p.y())).collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }

    /// Area of the main polygon according to the geo kernel; used as a
    /// cross-check against the shoelace sum in tests.
    pub fn main_area(&self) -> f64 {
        self.main_as_geo().unsigned_area()
    }
}

/// Reconstructs the world-space polygon a placement occupies: the main
/// polygon (bounding box at the origin) rotated about its bounding-box
/// centre, then translated by the placement.
///
/// This is the rendering frame; NFP reasoning uses the first-vertex anchor
/// frame instead, and the two must never be collapsed.
pub fn rendered_polygon(
    design: &Design,
    placement: &sheetnest_core::Placement,
    rule: MainPolygonRule,
) -> Vec<(f64, f64)> {
    let main = geometry::normalize_to_bbox_origin(design.main_polygon(rule));
    let bbox = geometry::bounding_box(&main);
    let centre = (bbox.width / 2.0, bbox.height / 2.0);
    geometry::translate_polygon(
        &geometry::rotate_polygon(&main, placement.rotation, centre),
        placement.x,
        placement.y,
    )
}

/// Cheap structural fingerprint used as a cache-key component:
/// `"p<vertex count>_a<round(100 · area)>"`.
pub fn shape_fingerprint(polygon: &[(f64, f64)]) -> String {
    format!(
        "p{}_a{}",
        polygon.len(),
        (100.0 * geometry::polygon_area(polygon)).round() as i64
    )
}

/// A rectangular sheet size offered to the nesting driver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetPreset {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Width in millimetres.
    pub width: f64,
    /// Height in millimetres.
    pub height: f64,
    /// Grouping category, e.g. "iso-a" or "board".
    pub category: String,
}

impl SheetPreset {
    /// Creates a sheet preset.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: f64,
        height: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            category: category.into(),
        }
    }

    /// Sheet area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The sheet as a bounding box anchored at the origin.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }
}

/// The built-in sheet catalogue.
pub fn standard_presets() -> Vec<SheetPreset> {
    vec![
        SheetPreset::new("a4", "A4", 210.0, 297.0, "iso-a"),
        SheetPreset::new("a3", "A3", 297.0, 420.0, "iso-a"),
        SheetPreset::new("a2", "A2", 420.0, 594.0, "iso-a"),
        SheetPreset::new("a1", "A1", 594.0, 841.0, "iso-a"),
        SheetPreset::new("b2", "B2", 515.0, 728.0, "iso-b"),
        SheetPreset::new("b1", "B1", 728.0, 1030.0, "iso-b"),
        SheetPreset::new("board-s", "Board 400x600", 400.0, 600.0, "board"),
        SheetPreset::new("board-m", "Board 600x900", 600.0, 900.0, "board"),
        SheetPreset::new("board-l", "Board 1000x1500", 1000.0, 1500.0, "board"),
    ]
}
