/// Half sum of squared errors, `E = 0.5 * Σ (expected - predicted)²`.
///
/// The factor of one half cancels the 2 of the derivative, so the output
/// error signal is plain `expected - predicted`.
pub struct SseLoss;

impl SseLoss {
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        0.5 * predicted.iter().zip(expected.iter())
            .map(|(p, e)| (e - p).powi(2))
            .sum::<f64>()
    }

    /// Raw output error `expected - predicted` for a single unit.
    pub fn omega(predicted: f64, expected: f64) -> f64 {
        expected - predicted
    }
}
