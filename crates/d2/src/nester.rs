//! Nesting driver: per-sheet strategy race and sheet ranking.
//!
//! Each candidate sheet is attacked by several independent packers — a
//! rectilinear rotation sweep, a two-pass mixed-rotation grid packer, the
//! NFP bottom-left-fill placer, and optionally the genetic search — and the
//! layout with the most parts wins (first discovered wins ties). Sheets
//! that take no placement at all are omitted from the ranked list rather
//! than reported as errors.

use crate::blf::BlfPlacer;
use crate::collision;
use crate::design::{rendered_polygon, Design, MainPolygonRule, SheetPreset};
use crate::ga_nesting::run_ga_nesting;
use crate::geometry::{self, BoundingBox};
use sheetnest_core::{
    rank_results, Algorithm, CancelFlag, Config, NestingResult, Placement, ProgressCallback,
    ProgressInfo, Result,
};

/// Placements closer than this to a sheet edge raise the warning flag.
const EDGE_WARNING_MM: f64 = 3.0;

/// Floor for the mixed-grid lattice step.
const MIN_GRID_STEP: f64 = 0.5;

/// Per-sheet nesting driver.
pub struct Nester {
    config: Config,
    main_rule: MainPolygonRule,
    cancelled: CancelFlag,
}

impl Nester {
    /// Creates a driver with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            main_rule: MainPolygonRule::default(),
            cancelled: CancelFlag::new(),
        }
    }

    /// Overrides the main-polygon selection rule.
    pub fn with_main_rule(mut self, rule: MainPolygonRule) -> Self {
        self.main_rule = rule;
        self
    }

    /// Returns the cancellation handle for this driver.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancelled.clone()
    }

    /// Requests cancellation at the next suspension point.
    pub fn cancel(&self) {
        self.cancelled.cancel();
    }

    /// Nests `design` onto every sheet and returns the results ranked by
    /// descending efficiency.
    pub fn nest(&self, design: &Design, sheets: &[SheetPreset]) -> Result<Vec<NestingResult>> {
        self.nest_with_progress(design, sheets, None)
    }

    /// Like [`Nester::nest`], reporting progress between sheets.
    pub fn nest_with_progress(
        &self,
        design: &Design,
        sheets: &[SheetPreset],
        progress: Option<&ProgressCallback>,
    ) -> Result<Vec<NestingResult>> {
        self.config.validate()?;

        if !design.is_packable() {
            log::warn!("design '{}' is degenerate, nothing to nest", design.id());
            return Ok(Vec::new());
        }

        let design = design.normalized();
        let mut results = Vec::new();

        for (index, sheet) in sheets.iter().enumerate() {
            // Suspension point: cancellation is only observed here and
            // inside the packers' own loops.
            self.cancelled.check()?;
            if let Some(callback) = progress {
                let percent = 100.0 * index as f64 / sheets.len().max(1) as f64;
                callback(ProgressInfo::new(
                    percent,
                    format!("nesting onto {}", sheet.name),
                ));
            }

            if let Some(result) = self.nest_sheet(&design, sheet, progress)? {
                results.push(result);
            }
        }

        if let Some(callback) = progress {
            callback(ProgressInfo::new(100.0, "ranking sheets").finished());
        }

        rank_results(&mut results);
        Ok(results)
    }

    /// Runs every configured strategy on one sheet and keeps the best.
    fn nest_sheet(
        &self,
        design: &Design,
        sheet: &SheetPreset,
        progress: Option<&ProgressCallback>,
    ) -> Result<Option<NestingResult>> {
        let mut best: Vec<Placement> = Vec::new();
        let mut keep_best = |candidate: Vec<Placement>| {
            if candidate.len() > best.len() {
                best = candidate;
            }
        };

        keep_best(self.grid_sweep(design, sheet));
        self.cancelled.check()?;
        keep_best(self.mixed_grid(design, sheet));
        self.cancelled.check()?;

        if matches!(self.config.algorithm, Algorithm::Nfp | Algorithm::NfpGa) {
            match self.run_blf(design, sheet, progress) {
                Ok(placements) => keep_best(placements),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => log::warn!("BLF skipped on sheet '{}': {}", sheet.id, e),
            }
        }

        if self.config.algorithm == Algorithm::NfpGa {
            match run_ga_nesting(
                design,
                sheet.width,
                sheet.height,
                &self.config,
                &self.cancelled,
                progress,
            ) {
                Ok(placements) => keep_best(placements),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => log::warn!("GA skipped on sheet '{}': {}", sheet.id, e),
            }
        }

        if best.is_empty() {
            log::debug!("sheet '{}' takes no placement, skipping", sheet.id);
            return Ok(None);
        }

        let bounds = sheet.bounds();
        let edge_warning = best.iter().any(|placement| {
            let polygon = rendered_polygon(design, placement, self.main_rule);
            collision::min_distance_to_bounds(&polygon, &bounds) < EDGE_WARNING_MM
        });

        Ok(Some(
            NestingResult::from_placements(
                sheet.id.clone(),
                sheet.name.clone(),
                sheet.width,
                sheet.height,
                best,
                design.area(),
            )
            .with_edge_warning(edge_warning),
        ))
    }

    fn run_blf(
        &self,
        design: &Design,
        sheet: &SheetPreset,
        progress: Option<&ProgressCallback>,
    ) -> Result<Vec<Placement>> {
        let mut placer = BlfPlacer::with_main_rule(
            design,
            sheet.width,
            sheet.height,
            &self.config,
            self.main_rule,
        )?;
        placer.run(progress, &self.cancelled)
    }

    /// Strategy (a): rectilinear count per quarter-turn rotation, realised
    /// as a regular grid with `side + margin` pitch. Cheap enough to serve
    /// as an instant preview.
    pub fn grid_sweep(&self, design: &Design, sheet: &SheetPreset) -> Vec<Placement> {
        let margin = self.config.margin;
        let avail_w = sheet.width - 2.0 * margin;
        let avail_h = sheet.height - 2.0 * margin;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return Vec::new();
        }

        let main = geometry::normalize_to_bbox_origin(design.main_polygon(self.main_rule));
        let main_bbox = geometry::bounding_box(&main);
        let centre = (main_bbox.width / 2.0, main_bbox.height / 2.0);

        let mut best: Option<(usize, f64, BoundingBox)> = None;
        for rotation in [0.0, 90.0, 180.0, 270.0] {
            let rotated_bbox =
                geometry::bounding_box(&geometry::rotate_polygon(&main, rotation, centre));
            let side_w = rotated_bbox.width;
            let side_h = rotated_bbox.height;
            if side_w > avail_w || side_h > avail_h {
                continue;
            }

            let cols = ((avail_w + margin) / (side_w + margin)).floor() as usize;
            let rows = ((avail_h + margin) / (side_h + margin)).floor() as usize;
            let count = cols * rows;

            if count > best.as_ref().map_or(0, |(c, _, _)| *c) {
                best = Some((count, rotation, rotated_bbox));
            }
        }

        let Some((_, rotation, rotated_bbox)) = best else {
            return Vec::new();
        };

        let cols = ((avail_w + margin) / (rotated_bbox.width + margin)).floor() as usize;
        let rows = ((avail_h + margin) / (rotated_bbox.height + margin)).floor() as usize;

        let mut placements = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let target_x = margin + col as f64 * (rotated_bbox.width + margin);
                let target_y = margin + row as f64 * (rotated_bbox.height + margin);
                placements.push(Placement::new(
                    design.id(),
                    target_x - rotated_bbox.x,
                    target_y - rotated_bbox.y,
                    rotation,
                ));
            }
        }
        placements
    }

    /// Strategy (b): two-pass greedy lattice packer trying 0° and 90° at
    /// every point, first at a coarse step, then at half that step to fill
    /// the gaps the first pass left.
    pub fn mixed_grid(&self, design: &Design, sheet: &SheetPreset) -> Vec<Placement> {
        let margin = self.config.margin;
        let bounds = sheet.bounds();
        if !bounds.shrunk(margin).is_valid() {
            return Vec::new();
        }

        let main = geometry::normalize_to_bbox_origin(design.main_polygon(self.main_rule));
        let main_bbox = geometry::bounding_box(&main);
        let centre = (main_bbox.width / 2.0, main_bbox.height / 2.0);

        let min_dim = main_bbox.width.min(main_bbox.height);
        let coarse = margin.max(min_dim / 4.0).max(MIN_GRID_STEP);

        let rotations: [(f64, Vec<(f64, f64)>, BoundingBox); 2] = {
            let r0 = geometry::rotate_polygon(&main, 0.0, centre);
            let b0 = geometry::bounding_box(&r0);
            let r90 = geometry::rotate_polygon(&main, 90.0, centre);
            let b90 = geometry::bounding_box(&r90);
            [(0.0, r0, b0), (90.0, r90, b90)]
        };

        let mut placements: Vec<Placement> = Vec::new();
        let mut rendered: Vec<Vec<(f64, f64)>> = Vec::new();

        for step in [coarse, (coarse / 2.0).max(MIN_GRID_STEP)] {
            let mut y = margin;
            while y <= sheet.height - margin {
                let mut x = margin;
                while x <= sheet.width - margin {
                    for (rotation, polygon, bbox) in &rotations {
                        let dx = x - bbox.x;
                        let dy = y - bbox.y;
                        let candidate = geometry::translate_polygon(polygon, dx, dy);

                        if !collision::polygon_inside_bounds(&candidate, &bounds, margin) {
                            continue;
                        }
                        if rendered
                            .iter()
                            .any(|placed| collision::collides(&candidate, placed, margin))
                        {
                            continue;
                        }

                        placements.push(Placement::new(design.id(), dx, dy, *rotation));
                        rendered.push(candidate);
                        break;
                    }
                    x += step;
                }
                y += step;
            }
        }

        placements
    }
}
