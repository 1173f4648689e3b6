use std::fmt;

use serde::{Serialize, Deserialize};

/// Why a training run stopped. Every variant is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every case's error is within the threshold.
    Converged,
    /// The learning rate fell to or below its floor.
    RateExhausted,
    /// The sweep cap was reached.
    IterationExhausted,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationReason::Converged => "error for every case is within the threshold",
            TerminationReason::RateExhausted => "learning rate fell to its floor",
            TerminationReason::IterationExhausted => "maximum number of iterations reached",
        };
        f.write_str(text)
    }
}

/// Result of `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub reason: TerminationReason,
    /// Completed sweeps over the training set.
    pub iterations: u64,
    /// Learning rate when training stopped.
    pub learning_rate: f64,
    /// Updates rejected and rolled back over the whole run.
    pub reverts: u64,
    /// Error of each training case under the final weights.
    pub errors: Vec<f64>,
}

impl TrainOutcome {
    pub fn converged(&self) -> bool {
        self.reason == TerminationReason::Converged
    }

    pub fn max_error(&self) -> f64 {
        self.errors.iter().copied().fold(0.0, f64::max)
    }

    pub fn total_error(&self) -> f64 {
        self.errors.iter().sum()
    }
}
