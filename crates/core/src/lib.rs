//! # sheetnest-core
//!
//! Framework layer for the sheetnest 2D nesting engine.
//!
//! This crate holds everything that is not polygon-shaped: error types,
//! solver configuration and progress reporting, cooperative cancellation,
//! the genetic-algorithm machinery, and the placement/result value types.
//! The geometric engine itself lives in `sheetnest-d2`.
//!
//! ## Components
//!
//! - [`Error`] / [`Result`] — error handling; [`Error::Cancelled`] is the
//!   sentinel observed at suspension points
//! - [`Config`], [`Algorithm`], [`CancelFlag`], [`ProgressInfo`] — engine
//!   configuration and control
//! - [`GaRunner`], [`GaProblem`], [`Individual`] — generic GA framework
//! - [`Placement`], [`NestingResult`] — output value types
//! - [`robust`] — exact orientation predicates
//!
//! ## Feature flags
//!
//! - `serde`: serialization support on public value types

pub mod error;
pub mod ga;
pub mod placement;
pub mod result;
pub mod robust;
pub mod solver;

pub use error::{Error, Result};
pub use ga::{GaConfig, GaProblem, GaProgress, GaResult, GaRunner, Individual};
pub use placement::{Placement, PlacementStats};
pub use result::{rank_results, NestingResult};
pub use solver::{Algorithm, CancelFlag, Config, ProgressCallback, ProgressInfo};
