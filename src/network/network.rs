use log::debug;
use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::matrix::{self, Matrix};
use crate::network::buffers::ForwardPass;
use crate::network::delta::DeltaTensor;
use crate::network::forward;
use crate::network::topology::Topology;

/// Weights as supplied by a configuration, indexed `[layer][from][to]`.
/// `None` marks a connection that must be randomized.
pub type InitialWeights = Vec<Vec<Vec<Option<f64>>>>;

/// A bias-free fully connected feed-forward network.
///
/// Owns its weights and the buffers of the most recent forward pass, which
/// the backward pass reads.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    activation: ActivationFunction,
    weights: Vec<Matrix>,
    pass: ForwardPass,
}

impl Network {
    /// Builds a network, randomizing every connection `initial` leaves unset
    /// within `[min, max)` of `random_range`.
    pub fn new(
        topology: Topology,
        activation: ActivationFunction,
        initial: Option<&InitialWeights>,
        random_range: (f64, f64),
    ) -> Result<Network> {
        Network::with_rng(topology, activation, initial, random_range, &mut rand::thread_rng())
    }

    /// Same as [`Network::new`] with an explicit random source.
    pub fn with_rng<R: Rng + ?Sized>(
        topology: Topology,
        activation: ActivationFunction,
        initial: Option<&InitialWeights>,
        random_range: (f64, f64),
        rng: &mut R,
    ) -> Result<Network> {
        let (min, max) = random_range;
        check_range(min, max)?;
        if let Some(initial) = initial {
            check_initial_shape(&topology, initial)?;
        }

        let mut randomized = 0;
        let weights = topology.weight_shapes()
            .enumerate()
            .map(|(n, (rows, cols))| {
                let mut layer = Matrix::zeros(rows, cols);
                for j in 0..rows {
                    for i in 0..cols {
                        let given = initial.and_then(|w| w[n][j][i]);
                        let value = given.unwrap_or_else(|| {
                            randomized += 1;
                            matrix::uniform(min, max, &mut *rng)
                        });
                        layer.set(j, i, value);
                    }
                }
                layer
            })
            .collect();

        debug!(
            "built network {:?}: {} of {} weights randomized in [{min}, {max})",
            topology.sizes(),
            randomized,
            topology.connection_count()
        );

        let pass = ForwardPass::new(&topology);
        Ok(Network { topology, activation, weights, pass })
    }

    /// Builds a network from a complete weight tensor.
    pub fn from_weights(
        topology: Topology,
        activation: ActivationFunction,
        weights: Vec<Matrix>,
    ) -> Result<Network> {
        check_tensor_shape(&topology, &weights, "weights")?;
        let pass = ForwardPass::new(&topology);
        Ok(Network { topology, activation, weights, pass })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    /// Snapshot of the current weights for persistence.
    pub fn export_weights(&self) -> Vec<Matrix> {
        self.weights.clone()
    }

    /// Overwrites every weight with a uniform sample from `[min, max)`.
    pub fn randomize_weights<R: Rng + ?Sized>(&mut self, min: f64, max: f64, rng: &mut R) -> Result<()> {
        check_range(min, max)?;
        for layer in &mut self.weights {
            *layer = Matrix::random_uniform(layer.rows, layer.cols, min, max, rng);
        }
        Ok(())
    }

    /// Forward pass into the network's own buffers; returns the output layer.
    pub fn forward(&mut self, input: &[f64]) -> Result<&[f64]> {
        self.check_input(input)?;
        Ok(self.propagate(input))
    }

    /// Forward pass for callers that validated `input` up front.
    pub(crate) fn propagate(&mut self, input: &[f64]) -> &[f64] {
        forward::propagate(&self.weights, self.activation, input, &mut self.pass);
        self.pass.output()
    }

    /// Buffers written by the most recent [`Network::forward`].
    pub fn last_pass(&self) -> &ForwardPass {
        &self.pass
    }

    /// Computes the output for `input` without touching the network's buffers.
    pub fn infer(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        let mut pass = ForwardPass::new(&self.topology);
        forward::propagate(&self.weights, self.activation, input, &mut pass);
        Ok(pass.output().to_vec())
    }

    /// Adds `deltas` to the weights.
    pub fn apply_deltas(&mut self, deltas: &DeltaTensor) -> Result<()> {
        check_tensor_shape(&self.topology, deltas.layers(), "delta tensor")?;
        for (layer, delta) in self.weights.iter_mut().zip(deltas.layers()) {
            *layer += delta;
        }
        Ok(())
    }

    /// Subtracts previously applied `deltas`, undoing [`Network::apply_deltas`].
    pub fn revert_deltas(&mut self, deltas: &DeltaTensor) -> Result<()> {
        check_tensor_shape(&self.topology, deltas.layers(), "delta tensor")?;
        for (layer, delta) in self.weights.iter_mut().zip(deltas.layers()) {
            *layer -= delta;
        }
        Ok(())
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.topology.input_size() {
            return Err(Error::mismatch("input vector", self.topology.input_size(), input.len()));
        }
        Ok(())
    }
}

/// Accepts `[min, max)` bounds that are finite, ordered and whose width is
/// itself representable.
pub(crate) fn check_range(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min > max || !(max - min).is_finite() {
        return Err(Error::InvalidRange { min, max });
    }
    Ok(())
}

fn check_initial_shape(topology: &Topology, initial: &InitialWeights) -> Result<()> {
    let layers = topology.layer_count() - 1;
    if initial.len() != layers {
        return Err(Error::mismatch("initial weight layers", layers, initial.len()));
    }
    for (n, ((rows, cols), layer)) in topology.weight_shapes().zip(initial).enumerate() {
        if layer.len() != rows {
            return Err(Error::mismatch(format!("initial weights of layer {n}"), rows, layer.len()));
        }
        for (j, row) in layer.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::mismatch(
                    format!("initial weights of layer {n}, unit {j}"),
                    cols,
                    row.len(),
                ));
            }
        }
    }
    Ok(())
}

fn check_tensor_shape(topology: &Topology, tensor: &[Matrix], what: &str) -> Result<()> {
    let layers = topology.layer_count() - 1;
    if tensor.len() != layers {
        return Err(Error::mismatch(format!("{what} layers"), layers, tensor.len()));
    }
    for (n, ((rows, cols), m)) in topology.weight_shapes().zip(tensor).enumerate() {
        if m.rows != rows || m.data.len() != rows {
            return Err(Error::mismatch(format!("{what} rows of layer {n}"), rows, m.data.len()));
        }
        if let Some(row) = m.data.iter().find(|row| row.len() != cols) {
            return Err(Error::mismatch(format!("{what} columns of layer {n}"), cols, row.len()));
        }
        if m.cols != cols {
            return Err(Error::mismatch(format!("{what} columns of layer {n}"), cols, m.cols));
        }
    }
    Ok(())
}
