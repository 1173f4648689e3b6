use std::time::Instant;

use log::{debug, info};

use crate::error::Result;
use crate::loss::sse::SseLoss;
use crate::network::Network;
use crate::train::hyperparameters::Hyperparameters;
use crate::train::iteration_stats::{IterationStats, WeightSnapshot};
use crate::train::outcome::{TerminationReason, TrainOutcome};
use crate::train::train_config::TrainConfig;
use crate::train::trainer::Trainer;
use crate::train::training_set::TrainingSet;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains with no progress reports or snapshots.
pub fn train(
    network: &mut Network,
    training_set: &TrainingSet,
    hyperparameters: Hyperparameters,
) -> Result<TrainOutcome> {
    train_loop(network, training_set, &TrainConfig::new(hyperparameters))
}

/// Trains `network` on `training_set` until it converges, the learning rate
/// is exhausted, or the sweep cap is reached.
///
/// One iteration is one in-order sweep over every case, updating the weights
/// after each case. The run converges when every case's error stayed within
/// `error_threshold` during the sweep and still is under the weights left at
/// its end. Termination conditions are checked before every sweep, so a run
/// whose learning rate already sits at its floor performs no sweep at all.
///
/// # Errors
/// Fails before the first sweep when the hyperparameters are invalid or the
/// training set does not match the network's input and output widths.
pub fn train_loop(
    network: &mut Network,
    training_set: &TrainingSet,
    config: &TrainConfig,
) -> Result<TrainOutcome> {
    let params = &config.hyperparameters;
    params.validate()?;
    training_set.check_against(network.topology())?;

    info!(
        "training {:?} on {} cases: lambda {}, modifier {}, floor {}, threshold {}, max iterations {}",
        network.topology().sizes(),
        training_set.len(),
        params.learning_rate,
        params.learning_rate_modifier,
        params.min_learning_rate,
        params.error_threshold,
        params.max_iterations
    );

    let started = Instant::now();
    let mut trainer = Trainer::new(network, params);
    let mut iterations = 0;
    let mut converged = false;
    let mut previous_total: Option<f64> = None;

    let reason = loop {
        if let Some(reason) = termination(converged, trainer.learning_rate(), iterations, params) {
            break reason;
        }

        let summary = trainer.sweep(network, training_set, params.error_threshold)?;
        iterations += 1;

        converged = summary.within_threshold
            && case_errors(network, training_set).iter().all(|&e| e <= params.error_threshold);

        let error_trend = previous_total.map_or(0.0, |prev| sign(summary.total_error - prev));
        previous_total = Some(summary.total_error);

        if config.progress_due(iterations) {
            let stats = IterationStats {
                iteration: iterations,
                max_iterations: params.max_iterations,
                learning_rate: trainer.learning_rate(),
                total_error: summary.total_error,
                error_trend,
                reverts: trainer.reverts(),
                elapsed_ms: started.elapsed().as_millis() as u64,
            };
            debug!(
                "iteration {}: total error {:.6e} (trend {}), learning rate {:.6e}",
                stats.iteration, stats.total_error, stats.error_trend, stats.learning_rate
            );
            if let Some(ref tx) = config.progress_tx {
                // A departed listener does not stop training.
                let _ = tx.send(stats);
            }
        }

        if config.snapshot_due(iterations) {
            if let Some(ref tx) = config.snapshot_tx {
                let _ = tx.send(WeightSnapshot {
                    iteration: iterations,
                    weights: network.export_weights(),
                });
            }
        }
    };

    let outcome = TrainOutcome {
        reason,
        iterations,
        learning_rate: trainer.learning_rate(),
        reverts: trainer.reverts(),
        errors: case_errors(network, training_set),
    };

    info!(
        "training ended after {} iterations: {} (learning rate {:.6e}, max case error {:.6e})",
        outcome.iterations,
        outcome.reason,
        outcome.learning_rate,
        outcome.max_error()
    );

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn termination(
    converged: bool,
    learning_rate: f64,
    iterations: u64,
    params: &Hyperparameters,
) -> Option<TerminationReason> {
    if converged {
        Some(TerminationReason::Converged)
    } else if learning_rate <= params.min_learning_rate {
        Some(TerminationReason::RateExhausted)
    } else if iterations >= params.max_iterations {
        Some(TerminationReason::IterationExhausted)
    } else {
        None
    }
}

/// Error of every case under the current weights.
fn case_errors(network: &mut Network, training_set: &TrainingSet) -> Vec<f64> {
    training_set.iter()
        .map(|case| SseLoss::loss(network.propagate(&case.input), &case.expected))
        .collect()
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
