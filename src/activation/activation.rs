use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Threshold function applied to every non-input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    /// f(x) = x
    #[serde(alias = "linear")]
    Identity,
    /// f(x) = 1 / (1 + e^-x)
    #[default]
    #[serde(alias = "logistic")]
    Sigmoid,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
        }
    }

    /// Derivative evaluated at a raw weighted sum.
    pub fn derivative(&self, weighted_sum: f64) -> f64 {
        self.derivative_from_output(self.function(weighted_sum))
    }

    /// Derivative expressed through the already computed activation `fx`,
    /// so the backward pass never repeats the exponentiation.
    pub fn derivative_from_output(&self, fx: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Sigmoid => fx * (1.0 - fx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_passes_through_with_unit_slope() {
        let f = ActivationFunction::Identity;
        assert_eq!(f.function(-3.25), -3.25);
        assert_eq!(f.derivative(-3.25), 1.0);
        assert_eq!(f.derivative(1e9), 1.0);
    }

    #[test]
    fn sigmoid_is_half_at_zero() {
        let f = ActivationFunction::Sigmoid;
        assert_eq!(f.function(0.0), 0.5);
        assert_eq!(f.derivative(0.0), 0.25);
    }

    #[test]
    fn sigmoid_derivative_matches_output_identity() {
        let f = ActivationFunction::Sigmoid;
        let mut x = -12.0;
        while x <= 12.0 {
            let fx = f.function(x);
            assert_abs_diff_eq!(f.derivative(x), fx * (1.0 - fx), epsilon = 1e-12);
            assert_abs_diff_eq!(f.derivative_from_output(fx), f.derivative(x), epsilon = 1e-12);
            x += 0.37;
        }
    }

    #[test]
    fn sigmoid_derivative_agrees_with_finite_difference() {
        let f = ActivationFunction::Sigmoid;
        let h = 1e-6;
        for &x in &[-2.0, -0.5, 0.3, 1.7] {
            let numeric = (f.function(x + h) - f.function(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(f.derivative(x), numeric, epsilon = 1e-8);
        }
    }

    #[test]
    fn parses_legacy_names() {
        let linear: ActivationFunction = serde_json::from_str("\"linear\"").unwrap();
        let logistic: ActivationFunction = serde_json::from_str("\"logistic\"").unwrap();
        let sigmoid: ActivationFunction = serde_json::from_str("\"sigmoid\"").unwrap();
        assert_eq!(linear, ActivationFunction::Identity);
        assert_eq!(logistic, ActivationFunction::Sigmoid);
        assert_eq!(sigmoid, ActivationFunction::Sigmoid);
    }
}
