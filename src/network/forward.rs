use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;
use crate::network::buffers::ForwardPass;

/// Propagates `input` through `weights`, writing every layer's weighted sums
/// and activations into `pass`.
///
/// The caller guarantees that `input` matches the input layer and that `pass`
/// was sized from the same topology as `weights`. Each loop is bounded by the
/// width of its own layer.
pub fn propagate(
    weights: &[Matrix],
    activation: ActivationFunction,
    input: &[f64],
    pass: &mut ForwardPass,
) {
    pass.activations[0].copy_from_slice(input);
    pass.weighted_sums[0].copy_from_slice(input);

    for (n, layer) in weights.iter().enumerate() {
        let (below, above) = pass.activations.split_at_mut(n + 1);
        let inputs = &below[n];
        let outputs = &mut above[0];
        let sums = &mut pass.weighted_sums[n + 1];

        for i in 0..layer.cols {
            let mut sum = 0.0;
            for (j, a) in inputs.iter().enumerate() {
                sum += a * layer.data[j][i];
            }
            sums[i] = sum;
            outputs[i] = activation.function(sum);
        }
    }
}
