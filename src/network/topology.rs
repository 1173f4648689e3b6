use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered layer widths, input layer first and output layer last.
///
/// A `Topology` always has at least two layers and no empty layer; it cannot
/// be changed once a network has been built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    pub fn new(sizes: Vec<usize>) -> Result<Topology> {
        if sizes.len() < 2 {
            return Err(Error::Topology(format!(
                "at least 2 layers are required, got {}",
                sizes.len()
            )));
        }
        if let Some(layer) = sizes.iter().position(|&size| size == 0) {
            return Err(Error::Topology(format!("layer {layer} has no units")));
        }
        Ok(Topology { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn layer_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn layer_size(&self, layer: usize) -> usize {
        self.sizes[layer]
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// `(rows, cols)` of each connectivity layer's weight matrix.
    pub fn weight_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Total number of connections across all connectivity layers.
    pub fn connection_count(&self) -> usize {
        self.weight_shapes().map(|(rows, cols)| rows * cols).sum()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = Error;

    fn try_from(sizes: Vec<usize>) -> Result<Topology> {
        Topology::new(sizes)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.sizes
    }
}
