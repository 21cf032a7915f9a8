//! Solver configuration, progress reporting and cooperative cancellation.

use crate::error::{Error, Result};
use crate::ga::GaConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nesting algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// Grid and rotation sweep only (fast, rectilinear layouts).
    Fast,
    /// Grid sweep plus NFP-guided Bottom-Left-Fill.
    #[default]
    Nfp,
    /// All of the above plus genetic search over order and rotation.
    NfpGa,
}

/// Common configuration for the nesting engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Algorithm to run per sheet.
    pub algorithm: Algorithm,

    /// Minimum gap between placements and to the sheet edge, in millimetres.
    pub margin: f64,

    /// Rotation step in degrees; must divide 360. The allowed rotation set
    /// is `{0, step, 2·step, …, < 360}`.
    pub rotation_step: u32,

    /// Base grid step for candidate sampling. `None` falls back to `margin`.
    pub grid_step: Option<f64>,

    /// RNG seed for the genetic search. `None` seeds from entropy; a fixed
    /// seed makes placements reproducible.
    pub seed: Option<u64>,

    /// Genetic algorithm parameters.
    pub ga: GaConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            margin: 0.0,
            rotation_step: 90,
            grid_step: None,
            seed: None,
            ga: GaConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the margin in millimetres.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    /// Sets the rotation step in degrees.
    pub fn with_rotation_step(mut self, step: u32) -> Self {
        self.rotation_step = step;
        self
    }

    /// Sets the base grid step.
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = Some(step);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the GA parameters.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Returns the allowed rotation angles in degrees: `0, step, …, < 360`.
    pub fn rotation_angles(&self) -> Vec<f64> {
        let step = self.rotation_step.max(1);
        (0..360).step_by(step as usize).map(f64::from).collect()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.margin < 0.0 {
            return Err(Error::ConfigError("margin must be >= 0".into()));
        }
        if self.rotation_step == 0 || 360 % self.rotation_step != 0 {
            return Err(Error::ConfigError(format!(
                "rotation step {} does not divide 360",
                self.rotation_step
            )));
        }
        if let Some(step) = self.grid_step {
            if step < 0.0 {
                return Err(Error::ConfigError("grid step must be >= 0".into()));
            }
        }
        Ok(())
    }
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information reported at suspension points.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Progress in percent (0.0 - 100.0). Advisory; reports may be coalesced.
    pub percent: f64,
    /// Human-readable phase description.
    pub message: String,
    /// Number of parts placed so far in the current layout.
    pub placed: usize,
    /// Whether the engine is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a running progress report.
    pub fn new(percent: f64, message: impl Into<String>) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            message: message.into(),
            placed: 0,
            running: true,
        }
    }

    /// Sets the placed count.
    pub fn with_placed(mut self, placed: usize) -> Self {
        self.placed = placed;
        self
    }

    /// Marks the run as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }
}

/// Shared cooperative-cancellation flag.
///
/// The controller sets the flag; the engine observes it at suspension points
/// (between sheets, between generations, between placement iterations) and
/// raises [`Error::Cancelled`]. Partial results are not returned on cancel.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Raises [`Error::Cancelled`] if cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_angles() {
        let config = Config::new().with_rotation_step(90);
        assert_eq!(config.rotation_angles(), vec![0.0, 90.0, 180.0, 270.0]);

        let config = Config::new().with_rotation_step(120);
        assert_eq!(config.rotation_angles(), vec![0.0, 120.0, 240.0]);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::new().validate().is_ok());
        assert!(Config::new().with_rotation_step(70).validate().is_err());
        assert!(Config::new().with_margin(3.0).validate().is_ok());
    }

    #[test]
    fn test_cancel_flag() {
        let flag = CancelFlag::new();
        assert!(flag.check().is_ok());

        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
        assert!(flag.check().unwrap_err().is_cancelled());
    }
}
