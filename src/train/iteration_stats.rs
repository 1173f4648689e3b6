use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Progress report emitted by `train_loop` every `progress_period` sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationStats {
    /// Number of completed sweeps over the training set.
    pub iteration: u64,
    /// Sweep cap for this run.
    pub max_iterations: u64,
    /// Learning rate after the sweep.
    pub learning_rate: f64,
    /// Sum of the per-case errors kept during the sweep.
    pub total_error: f64,
    /// Sign of the change in `total_error` since the previous sweep
    /// (`-1.0` improving, `1.0` worsening, `0.0` unchanged or first sweep).
    pub error_trend: f64,
    /// Updates rejected and rolled back so far.
    pub reverts: u64,
    /// Wall-clock time since training started, in milliseconds.
    pub elapsed_ms: u64,
}

/// Weights captured mid-run for the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightSnapshot {
    pub iteration: u64,
    pub weights: Vec<Matrix>,
}
