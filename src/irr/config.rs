//! Convergence settings for the IRR solver

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{RateError, RateResult};

/// Default starting rate for Newton-Raphson (10%)
pub const DEFAULT_INITIAL_GUESS: f64 = 0.10;

/// Default hard cap on Newton-Raphson iterations
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Default step-size tolerance
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Convergence configuration, constructed per call and never retained by the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Starting rate for the iteration
    #[serde(default = "default_initial_guess")]
    pub initial_guess: f64,

    /// Maximum Newton-Raphson steps before giving up
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Converged once |new_rate - rate| falls below this
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_initial_guess() -> f64 {
    DEFAULT_INITIAL_GUESS
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ConvergenceConfig {
    /// Defaults overlaid with IRR_GUESS, IRR_MAX_ITERATIONS and IRR_TOLERANCE
    ///
    /// Unset or unparseable variables keep their default value.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let initial_guess: f64 = env::var("IRR_GUESS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.initial_guess);

        let max_iterations: u32 = env::var("IRR_MAX_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_iterations);

        let tolerance: f64 = env::var("IRR_TOLERANCE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.tolerance);

        Self {
            initial_guess,
            max_iterations,
            tolerance,
        }
    }

    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject settings the iteration cannot run with
    pub fn validate(&self) -> RateResult<()> {
        if !self.initial_guess.is_finite() {
            return Err(RateError::invalid(format!(
                "initial guess must be finite, got {}",
                self.initial_guess
            )));
        }
        if self.max_iterations == 0 {
            return Err(RateError::invalid("max iterations must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(RateError::invalid(format!(
                "tolerance must be a positive finite number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
