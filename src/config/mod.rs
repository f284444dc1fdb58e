//!
//! Tunable parameters of the iterative solvers
//!

pub mod error;

use std::path::Path;

use serde::{Serialize, Deserialize};
use error::ConfigError;

/// Residual magnitude below which a root is accepted.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Newton iterations before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
/// Finite-difference step used to estimate the residual's derivative.
pub const DEFAULT_STEP: f64 = 1e-6;

///
/// A container for the parameters shared by all iterative solvers.
/// All features have an associated getter function. Missing fields in a configuration file fall
/// back to their defaults.
///
/// # Fields:
/// - `tolerance`: The residual magnitude below which the solver has converged
/// - `max_iterations`: The maximum number of Newton iterations
/// - `step`: The finite-difference step for derivative estimates
/// - `bisection_fallback`: Whether to bisect the feasible bracket when Newton's method fails
/// - `require_convergence`: Whether the center distance solver should fail instead of returning
/// its best effort
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, getset::CopyGetters)]
#[getset(get_copy = "pub")]
#[serde(default)]
pub struct SolverConfig {
    tolerance: f64,
    max_iterations: usize,
    step: f64,
    bisection_fallback: bool,
    require_convergence: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            step: DEFAULT_STEP,
            bisection_fallback: true,
            require_convergence: false,
        }
    }
}

impl SolverConfig {
    ///
    /// Parses and validates a configuration from a JSON string.
    ///
    /// # Parameters:
    /// - `json`: The JSON document, any omitted field takes its default
    ///
    /// # Returns:
    /// - A valid `SolverConfig`
    /// - A `ConfigError` explaining why the document was rejected
    ///
    pub fn from_json(json: &str) -> Result<SolverConfig, ConfigError> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    ///
    /// Reads, parses and validates a configuration file.
    ///
    /// # Parameters:
    /// - `path`: The path of the JSON configuration file
    ///
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<SolverConfig, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&json)
    }

    ///
    /// Checks the configuration can drive a solver.
    ///
    /// # Returns:
    /// - Void if every field is usable
    /// - A `ConfigError::Invalid` naming the first bad field
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.) {
            return Err(ConfigError::Invalid { field: "tolerance", reason: "must be a positive number" });
        }
        if !(self.step.is_finite() && self.step > 0.) {
            return Err(ConfigError::Invalid { field: "step", reason: "must be a positive number" });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid { field: "max_iterations", reason: "must be at least 1" });
        }

        Ok(())
    }

    // the setters do not validate, the solvers reject an unusable configuration on entry

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_bisection_fallback(mut self, enabled: bool) -> Self {
        self.bisection_fallback = enabled;
        self
    }

    pub fn with_require_convergence(mut self, required: bool) -> Self {
        self.require_convergence = required;
        self
    }
}
