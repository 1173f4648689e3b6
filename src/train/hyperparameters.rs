use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::network::check_range;

/// Convergence settings for one training run.
///
/// # Fields
/// - `learning_rate`         : initial step size (lambda)
/// - `learning_rate_modifier`: factor the step grows by after an improving
///                              update and shrinks by after a rejected one;
///                              exactly `1.0` disables adaptation
/// - `min_learning_rate`     : training stops once the rate falls to this floor
/// - `max_learning_rate`     : optional ceiling applied when the rate grows
/// - `error_threshold`       : largest acceptable per-case error
/// - `max_iterations`        : cap on full sweeps over the training set
/// - `random_range`          : `[min, max)` for randomized weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    pub learning_rate: f64,
    pub learning_rate_modifier: f64,
    pub min_learning_rate: f64,
    pub max_learning_rate: Option<f64>,
    pub error_threshold: f64,
    pub max_iterations: u64,
    pub random_range: (f64, f64),
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            learning_rate: 1.0,
            learning_rate_modifier: 2.0,
            min_learning_rate: 1e-6,
            max_learning_rate: None,
            error_threshold: 0.01,
            max_iterations: 100_000,
            random_range: (-1.5, 1.5),
        }
    }
}

impl Hyperparameters {
    /// True when the learning rate reacts to each update's outcome.
    pub fn is_adaptive(&self) -> bool {
        self.learning_rate_modifier != 1.0
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("learning_rate", self.learning_rate),
            ("learning_rate_modifier", self.learning_rate_modifier),
            ("min_learning_rate", self.min_learning_rate),
            ("error_threshold", self.error_threshold),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidHyperparameter(format!("{name} must be finite, got {value}")));
        }
        if self.learning_rate_modifier <= 0.0 {
            return Err(Error::InvalidHyperparameter(format!(
                "learning_rate_modifier must be positive, got {}",
                self.learning_rate_modifier
            )));
        }
        if let Some(ceiling) = self.max_learning_rate {
            if ceiling.is_nan() || ceiling <= self.min_learning_rate {
                return Err(Error::InvalidHyperparameter(format!(
                    "max_learning_rate {ceiling} must exceed min_learning_rate {}",
                    self.min_learning_rate
                )));
            }
        }
        let (min, max) = self.random_range;
        check_range(min, max)
    }
}
