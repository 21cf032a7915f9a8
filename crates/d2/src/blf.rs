//! Bottom-Left-Fill placer.
//!
//! Deterministic single-design packer driven by NFP/IFP reasoning. Per
//! candidate rotation the valid anchor region is
//! `IFP(bin) − offset(∪ placed NFPs, margin)`; candidates are the region's
//! ring vertices plus an adaptive lattice, and the bottom-left one wins
//! (minimum y, then minimum x).
//!
//! Two reference frames are in play and deliberately kept apart. NFP
//! reasoning anchors the rotated polygon at its first vertex and positions
//! name that anchor. Rendering rotates the design about its bounding-box
//! centre and then translates. Before a candidate is committed the rendered
//! polygons are reconstructed in the second frame and re-checked for
//! containment and collision; frame-mismatch edge cases die here instead of
//! in the layout.

use crate::clip;
use crate::collision;
use crate::design::{shape_fingerprint, Design, MainPolygonRule};
use crate::geometry::{self, BoundingBox};
use crate::nfp::{self, NfpCache, NfpKey};
use sheetnest_core::{
    CancelFlag, Config, Error, Placement, ProgressCallback, ProgressInfo, Result,
};

/// Adaptive grid target: lattice candidate count per valid region.
const TARGET_CANDIDATES: f64 = 1e5;

/// Floor for the sampling step so zero-margin configurations stay finite.
const MIN_GRID_STEP: f64 = 0.1;

/// A committed part in both reference frames.
struct PlacedPart {
    /// Rotated polygon anchored at its first vertex (NFP frame, at origin).
    anchor_polygon: Vec<(f64, f64)>,
    /// World-space polygon in the rendering frame.
    rendered: Vec<(f64, f64)>,
    /// World position of the anchor (first vertex).
    position: (f64, f64),
    /// Rotation in degrees.
    rotation: f64,
}

/// Deterministic bottom-left-fill placer for one design on one sheet.
pub struct BlfPlacer<'a> {
    design: &'a Design,
    /// Main polygon normalised so its bounding box starts at the origin.
    main: Vec<(f64, f64)>,
    main_bbox: BoundingBox,
    fingerprint: String,
    sheet: BoundingBox,
    margin: f64,
    base_step: f64,
    rotations: Vec<f64>,
    cache: NfpCache,
    placed: Vec<PlacedPart>,
    placements: Vec<Placement>,
    max_placements: usize,
}

impl<'a> BlfPlacer<'a> {
    /// Creates a placer for `design` on a `sheet_width × sheet_height`
    /// sheet, using the margin, rotation step and grid step from `config`.
    pub fn new(
        design: &'a Design,
        sheet_width: f64,
        sheet_height: f64,
        config: &Config,
    ) -> Result<Self> {
        Self::with_main_rule(
            design,
            sheet_width,
            sheet_height,
            config,
            MainPolygonRule::default(),
        )
    }

    /// Creates a placer with an explicit main-polygon selection rule.
    pub fn with_main_rule(
        design: &'a Design,
        sheet_width: f64,
        sheet_height: f64,
        config: &Config,
        rule: MainPolygonRule,
    ) -> Result<Self> {
        design.validate()?;
        if sheet_width <= 0.0 || sheet_height <= 0.0 {
            return Err(Error::InvalidBoundary(format!(
                "sheet {sheet_width}x{sheet_height} is not a valid rectangle"
            )));
        }

        let main = geometry::normalize_to_bbox_origin(design.main_polygon(rule));
        let main_bbox = geometry::bounding_box(&main);
        let fingerprint = shape_fingerprint(&main);

        let sheet = BoundingBox::new(0.0, 0.0, sheet_width, sheet_height);
        let design_area = design.area();
        let max_placements = (sheet.area() / design_area).ceil() as usize + 10;

        Ok(Self {
            design,
            main,
            main_bbox,
            fingerprint,
            sheet,
            margin: config.margin,
            base_step: config.grid_step.unwrap_or(config.margin),
            rotations: config.rotation_angles(),
            cache: NfpCache::new(),
            placed: Vec::new(),
            placements: Vec::new(),
            max_placements,
        })
    }

    /// The placement cap for this design/sheet pairing; also the chromosome
    /// length used by the genetic search.
    pub fn max_placements(&self) -> usize {
        self.max_placements
    }

    /// Committed placements so far.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Rendered polygons of all committed placements.
    pub fn rendered_polygons(&self) -> Vec<Vec<(f64, f64)>> {
        self.placed.iter().map(|p| p.rendered.clone()).collect()
    }

    /// Runs the full placement loop, sweeping every allowed rotation per
    /// iteration and committing the bottom-left winner.
    ///
    /// The top of each iteration is a suspension point: progress is
    /// reported and cancellation observed there.
    pub fn run(
        &mut self,
        progress: Option<&ProgressCallback>,
        cancel: &CancelFlag,
    ) -> Result<Vec<Placement>> {
        let budget = 2 * self.max_placements;
        let rotations = self.rotations.clone();
        let mut attempts = 0;

        while self.placed.len() < self.max_placements && attempts < budget {
            cancel.check()?;
            if let Some(callback) = progress {
                let percent = 100.0 * self.placed.len() as f64 / self.max_placements as f64;
                callback(
                    ProgressInfo::new(percent, "bottom-left fill")
                        .with_placed(self.placed.len()),
                );
            }
            attempts += 1;

            let mut best: Option<((f64, f64), f64)> = None;
            for &rotation in &rotations {
                if let Some(position) = self.best_position_for_rotation(rotation) {
                    if best.map_or(true, |(bp, _)| bottom_left_better(position, bp)) {
                        best = Some((position, rotation));
                    }
                }
            }

            let Some((position, rotation)) = best else {
                break; // sheet full: no rotation produced a candidate
            };

            // Failed validation burns an attempt but is not fatal.
            self.try_commit(position, rotation);
        }

        Ok(self.placements.clone())
    }

    /// Runs the simplified placement loop used as the GA fitness evaluator:
    /// iteration `i` uses `rotation_genes[i % len]` instead of sweeping,
    /// and the loop stops at the first iteration that cannot place.
    ///
    /// Returns the number of parts committed.
    pub fn run_sequenced(
        &mut self,
        rotation_genes: &[f64],
        cancel: &CancelFlag,
    ) -> Result<usize> {
        if rotation_genes.is_empty() {
            return Ok(0);
        }

        for i in 0..self.max_placements {
            cancel.check()?;
            let rotation = rotation_genes[i % rotation_genes.len()];

            let Some(position) = self.best_position_for_rotation(rotation) else {
                break;
            };
            if !self.try_commit(position, rotation) {
                break;
            }
        }

        Ok(self.placed.len())
    }

    /// Valid-area construction and bottom-left scan for one rotation.
    fn best_position_for_rotation(&mut self, rotation: f64) -> Option<(f64, f64)> {
        let effective = self.sheet.shrunk(self.margin);
        if !effective.is_valid() {
            return None;
        }

        let rotated = geometry::normalize_to_first_vertex(&geometry::rotate_polygon(
            &self.main,
            rotation,
            (0.0, 0.0),
        ));

        let bin_ifp = nfp::ifp_rect(&effective, &rotated);
        if bin_ifp.is_empty() {
            return None;
        }

        let valid = if self.placed.is_empty() {
            bin_ifp.polygons
        } else {
            let cache = &mut self.cache;
            let fingerprint = &self.fingerprint;
            let mut all_nfps: Vec<Vec<(f64, f64)>> = Vec::new();

            for part in &self.placed {
                let key = NfpKey::new(
                    fingerprint.clone(),
                    fingerprint.clone(),
                    part.rotation,
                    rotation,
                    false,
                );
                let nfp = cache.get_or_compute(key, || {
                    nfp::compute_nfp(&part.anchor_polygon, &rotated)
                });
                all_nfps.extend(nfp.translated(part.position).polygons);
            }

            let unioned = clip::union(&all_nfps);
            let expanded = clip::offset(&unioned, self.margin);
            let valid = clip::difference(&bin_ifp.polygons, &expanded);
            if valid.is_empty() {
                return None; // numeric edge or genuinely no room
            }
            valid
        };

        self.scan_bottom_left(&valid)
    }

    /// Picks the bottom-left candidate: every ring vertex plus the lattice
    /// points inside each ring, at an adaptive step.
    fn scan_bottom_left(&self, valid: &[Vec<(f64, f64)>]) -> Option<(f64, f64)> {
        let region_bbox = geometry::bounding_box(&valid[0]);
        let step = (region_bbox.area() / TARGET_CANDIDATES)
            .sqrt()
            .max(self.base_step)
            .max(MIN_GRID_STEP);

        let mut best: Option<(f64, f64)> = None;
        let mut consider = |p: (f64, f64), best: &mut Option<(f64, f64)>| {
            if best.map_or(true, |b| bottom_left_better(p, b)) {
                *best = Some(p);
            }
        };

        for ring in valid {
            for &vertex in ring {
                consider(vertex, &mut best);
            }

            // Lattice scan from the bottom row up; the first row with an
            // interior point already holds this ring's best lattice
            // candidate, rows above it cannot win.
            let bbox = geometry::bounding_box(ring);
            let mut y = bbox.y;
            'rows: while y <= bbox.top() + 1e-9 {
                let mut x = bbox.x;
                while x <= bbox.right() + 1e-9 {
                    if geometry::point_in_polygon((x, y), ring) {
                        consider((x, y), &mut best);
                        break 'rows;
                    }
                    x += step;
                }
                y += step;
            }
        }

        best
    }

    /// Rendering-frame translation equivalent to anchoring the rotated
    /// polygon's first vertex at `position`.
    fn placement_translation(&self, position: (f64, f64), rotation: f64) -> (f64, f64) {
        let centre = (self.main_bbox.width / 2.0, self.main_bbox.height / 2.0);
        let anchor_rotated = geometry::rotate_point(self.main[0], rotation, (0.0, 0.0));
        let centre_rotated = geometry::rotate_point(centre, rotation, (0.0, 0.0));

        (
            position.0 - anchor_rotated.0 + centre_rotated.0 - centre.0,
            position.1 - anchor_rotated.1 + centre_rotated.1 - centre.1,
        )
    }

    /// Reconstructs the rendered polygon for a candidate and re-validates
    /// containment and collision before committing it.
    fn try_commit(&mut self, position: (f64, f64), rotation: f64) -> bool {
        let translation = self.placement_translation(position, rotation);
        let centre = (self.main_bbox.width / 2.0, self.main_bbox.height / 2.0);
        let rendered = geometry::translate_polygon(
            &geometry::rotate_polygon(&self.main, rotation, centre),
            translation.0,
            translation.1,
        );

        if !collision::polygon_inside_bounds(&rendered, &self.sheet, self.margin) {
            return false;
        }
        for part in &self.placed {
            if collision::collides(&rendered, &part.rendered, 0.0) {
                return false;
            }
        }

        let anchor_polygon = geometry::normalize_to_first_vertex(&geometry::rotate_polygon(
            &self.main,
            rotation,
            (0.0, 0.0),
        ));

        self.placed.push(PlacedPart {
            anchor_polygon,
            rendered,
            position,
            rotation,
        });
        self.placements.push(Placement::new(
            self.design.id(),
            translation.0,
            translation.1,
            rotation,
        ));
        true
    }
}

/// Bottom-left ordering: minimum y wins, minimum x breaks ties.
fn bottom_left_better(a: (f64, f64), b: (f64, f64)) -> bool {
    const EPS: f64 = 1e-9;
    a.1 < b.1 - EPS || (a.1 < b.1 + EPS && a.0 < b.0 - EPS)
}
