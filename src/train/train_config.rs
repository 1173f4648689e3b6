use std::sync::mpsc;

use crate::train::hyperparameters::Hyperparameters;
use crate::train::iteration_stats::{IterationStats, WeightSnapshot};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `hyperparameters`: learning-rate schedule and termination limits
/// - `progress_period`: sweeps between progress reports; `0` disables them
/// - `save_period`    : sweeps between weight snapshots; `0` disables them
/// - `progress_tx`    : optional channel receiving one `IterationStats` per
///                       progress report
/// - `snapshot_tx`    : optional channel receiving periodic weight snapshots
///                       for persistence
///
/// Reports and snapshots are side effects only: a dropped receiver is ignored
/// and never changes the course of training.
pub struct TrainConfig {
    pub hyperparameters: Hyperparameters,
    pub progress_period: u64,
    pub save_period: u64,
    pub progress_tx: Option<mpsc::Sender<IterationStats>>,
    pub snapshot_tx: Option<mpsc::Sender<WeightSnapshot>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no reports and no snapshots.
    pub fn new(hyperparameters: Hyperparameters) -> Self {
        TrainConfig {
            hyperparameters,
            progress_period: 0,
            save_period: 0,
            progress_tx: None,
            snapshot_tx: None,
        }
    }

    pub(crate) fn progress_due(&self, iteration: u64) -> bool {
        self.progress_period > 0 && iteration % self.progress_period == 0
    }

    pub(crate) fn snapshot_due(&self, iteration: u64) -> bool {
        self.snapshot_tx.is_some() && self.save_period > 0 && iteration % self.save_period == 0
    }
}
