use log::trace;

use crate::{
    error::Result,
    loss::sse::SseLoss,
    network::Network,
    train::backprop::Backprop,
    train::hyperparameters::Hyperparameters,
    train::training_set::{TrainingCase, TrainingSet},
};

/// Outcome of one online update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Case error before the update.
    pub previous_error: f64,
    /// Case error right after the update was applied. `None` when adaptation
    /// is off and the update was kept without being re-evaluated.
    pub new_error: Option<f64>,
    /// False when the update was rolled back.
    pub accepted: bool,
}

impl StepResult {
    /// Error of the weights left in place by this step, as far as it was
    /// measured. Without re-evaluation this is the error before the update.
    pub fn kept_error(&self) -> f64 {
        match self.new_error {
            Some(new_error) if self.accepted => new_error,
            _ => self.previous_error,
        }
    }
}

/// Aggregate of one full pass over the training set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSummary {
    pub total_error: f64,
    pub within_threshold: bool,
}

/// Online gradient descent with an adaptive step size.
///
/// Updates the weights one case at a time. When adaptation is enabled an
/// update that fails to lower the case's error is subtracted again and the
/// step shrinks; an improving update is kept and the step grows.
#[derive(Debug, Clone)]
pub struct Trainer {
    backprop: Backprop,
    learning_rate: f64,
    modifier: f64,
    adaptive: bool,
    ceiling: Option<f64>,
    reverts: u64,
}

impl Trainer {
    pub fn new(network: &Network, hyperparameters: &Hyperparameters) -> Trainer {
        Trainer {
            backprop: Backprop::new(network.topology()),
            learning_rate: hyperparameters.learning_rate,
            modifier: hyperparameters.learning_rate_modifier,
            adaptive: hyperparameters.is_adaptive(),
            ceiling: hyperparameters.max_learning_rate,
            reverts: 0,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn reverts(&self) -> u64 {
        self.reverts
    }

    /// Forward pass, backward pass and weight update for a single case.
    pub fn step(&mut self, network: &mut Network, case: &TrainingCase) -> Result<StepResult> {
        let previous_error = SseLoss::loss(network.forward(&case.input)?, &case.expected);

        let deltas = self.backprop.backward(network, &case.expected, self.learning_rate)?;
        network.apply_deltas(deltas)?;

        if !self.adaptive {
            trace!("error {previous_error:.6e}, update kept unconditionally");
            return Ok(StepResult { previous_error, new_error: None, accepted: true });
        }

        let new_error = SseLoss::loss(network.propagate(&case.input), &case.expected);

        let accepted = if new_error >= previous_error {
            network.revert_deltas(self.backprop.deltas())?;
            self.learning_rate /= self.modifier;
            self.reverts += 1;
            false
        } else {
            self.learning_rate *= self.modifier;
            if let Some(ceiling) = self.ceiling {
                self.learning_rate = self.learning_rate.min(ceiling);
            }
            true
        };

        trace!(
            "error {previous_error:.6e} -> {new_error:.6e}, {}, learning rate now {:.6e}",
            if accepted { "kept" } else { "rolled back" },
            self.learning_rate
        );

        Ok(StepResult { previous_error, new_error: Some(new_error), accepted })
    }

    /// Steps through every case in order.
    pub fn sweep(
        &mut self,
        network: &mut Network,
        training_set: &TrainingSet,
        error_threshold: f64,
    ) -> Result<SweepSummary> {
        let mut summary = SweepSummary { total_error: 0.0, within_threshold: true };

        for case in training_set.iter() {
            let kept = self.step(network, case)?.kept_error();
            summary.total_error += kept;
            if kept > error_threshold {
                summary.within_threshold = false;
            }
        }

        Ok(summary)
    }
}
