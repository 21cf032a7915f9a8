//! # sheetnest-d2
//!
//! 2D irregular nesting engine: given one design (one or more arbitrary,
//! possibly non-convex polygons) and a set of rectangular sheet sizes,
//! produce for each sheet a layout of as many non-overlapping copies as
//! possible and rank the sheets by area utilisation.
//!
//! ## Pipeline
//!
//! - [`geometry`] — polygon primitives (rotation, bounding boxes, ray-cast
//!   containment, the two origin normalisations)
//! - [`clip`] — boolean/offset kernel wrapper at integer scale 1000
//! - [`collision`] — exact overlap oracle with bounding-box prefilter
//! - [`nfp`] — No-Fit / Inner-Fit polygon construction and caching
//! - [`blf`] — deterministic bottom-left-fill placer
//! - [`ga_nesting`] — genetic search over placement order and rotation
//! - [`nester`] — per-sheet strategy race and ranking
//! - [`validate`] — manual-edit layout validation
//! - [`job`] — background dispatch with progress and cancellation
//!
//! ## Quick start
//!
//! ```rust
//! use sheetnest_d2::{Config, Design, Nester, SheetPreset};
//!
//! let design = Design::l_shape("bracket", 20.0, 30.0, 10.0, 10.0);
//! let sheets = vec![SheetPreset::new("board", "Board", 100.0, 100.0, "board")];
//!
//! let nester = Nester::new(Config::new().with_margin(3.0));
//! let results = nester.nest(&design, &sheets).unwrap();
//!
//! if let Some(best) = results.first() {
//!     println!("{} parts at {}", best.count, best.efficiency_percent());
//! }
//! ```

pub mod blf;
pub mod clip;
pub mod collision;
pub mod design;
pub mod ga_nesting;
pub mod geometry;
pub mod job;
pub mod nester;
pub mod nfp;
pub mod validate;

pub use blf::BlfPlacer;
pub use design::{
    rendered_polygon, shape_fingerprint, standard_presets, Design, MainPolygonRule, SheetPreset,
};
pub use geometry::BoundingBox;
pub use ga_nesting::{run_ga_nesting, NestingChromosome, NestingProblem};
pub use job::{start as start_job, JobEvent, JobHandle};
pub use nester::Nester;
pub use nfp::{Nfp, NfpCache, NfpKey};
pub use sheetnest_core::{
    rank_results, Algorithm, CancelFlag, Config, Error, GaConfig, NestingResult, Placement,
    ProgressCallback, ProgressInfo, Result,
};
