use crate::error::{Error, Result};
use crate::loss::sse::SseLoss;
use crate::network::{DeltaTensor, ForwardPass, Network, Topology};

/// Back-propagation scratch space: one error signal (psi) per unit and the
/// delta tensor of the most recent backward pass.
///
/// Allocated once per topology and reused for every training case.
#[derive(Debug, Clone)]
pub struct Backprop {
    psi: Vec<Vec<f64>>,
    deltas: DeltaTensor,
}

impl Backprop {
    pub fn new(topology: &Topology) -> Backprop {
        Backprop {
            psi: topology.sizes().iter().map(|&size| vec![0.0; size]).collect(),
            deltas: DeltaTensor::zeros(topology),
        }
    }

    /// Computes the weight deltas for the network's most recent forward pass.
    pub fn backward(
        &mut self,
        network: &Network,
        expected: &[f64],
        learning_rate: f64,
    ) -> Result<&DeltaTensor> {
        self.backward_from(network, network.last_pass(), expected, learning_rate)
    }

    /// Computes `delta[n][j][i] = learning_rate * a[n][j] * psi[n+1][i]` for
    /// every connection, where psi is the error signal of the half
    /// sum-of-squares error pushed back through the current weights.
    ///
    /// Adding the result to the weights descends the error surface.
    pub fn backward_from(
        &mut self,
        network: &Network,
        pass: &ForwardPass,
        expected: &[f64],
        learning_rate: f64,
    ) -> Result<&DeltaTensor> {
        self.check_shapes(network, pass, expected)?;

        let f = network.activation();
        let weights = network.weights();
        let last = self.psi.len() - 1;
        let outputs = &pass.activations[last];

        for (i, psi) in self.psi[last].iter_mut().enumerate() {
            *psi = SseLoss::omega(outputs[i], expected[i]) * f.derivative_from_output(outputs[i]);
        }

        // The input layer receives no error signal of its own.
        for n in (1..last).rev() {
            let (below, above) = self.psi.split_at_mut(n + 1);
            let upstream = &above[0];
            for (j, psi) in below[n].iter_mut().enumerate() {
                let omega: f64 = upstream.iter()
                    .enumerate()
                    .map(|(i, p)| p * weights[n].data[j][i])
                    .sum();
                *psi = omega * f.derivative_from_output(pass.activations[n][j]);
            }
        }

        for (n, delta) in self.deltas.layers.iter_mut().enumerate() {
            let upstream = &self.psi[n + 1];
            for (j, a) in pass.activations[n].iter().enumerate() {
                for (i, p) in upstream.iter().enumerate() {
                    delta.data[j][i] = learning_rate * a * p;
                }
            }
        }

        Ok(&self.deltas)
    }

    pub fn deltas(&self) -> &DeltaTensor {
        &self.deltas
    }

    /// Error signals of the most recent backward pass, one vector per layer.
    /// The input layer's entry is never written.
    pub fn psi(&self) -> &[Vec<f64>] {
        &self.psi
    }

    fn check_shapes(&self, network: &Network, pass: &ForwardPass, expected: &[f64]) -> Result<()> {
        let sizes = network.topology().sizes();
        if self.psi.len() != sizes.len() {
            return Err(Error::mismatch("back-propagation layers", sizes.len(), self.psi.len()));
        }
        if pass.activations.len() != sizes.len() {
            return Err(Error::mismatch("forward pass layers", sizes.len(), pass.activations.len()));
        }
        for (n, (&size, psi)) in sizes.iter().zip(&self.psi).enumerate() {
            if psi.len() != size {
                return Err(Error::mismatch(format!("back-propagation layer {n}"), size, psi.len()));
            }
            if pass.activations[n].len() != size {
                return Err(Error::mismatch(format!("forward pass layer {n}"), size, pass.activations[n].len()));
            }
        }
        if expected.len() != network.topology().output_size() {
            return Err(Error::mismatch("expected output", network.topology().output_size(), expected.len()));
        }
        Ok(())
    }
}
