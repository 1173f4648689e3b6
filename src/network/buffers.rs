use crate::network::topology::Topology;

/// Per-layer activations and weighted sums of the most recent forward pass.
///
/// Sized once from a topology and overwritten in place by every pass. The
/// input layer's weighted sums mirror its activations.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub(crate) activations: Vec<Vec<f64>>,
    pub(crate) weighted_sums: Vec<Vec<f64>>,
}

impl ForwardPass {
    pub fn new(topology: &Topology) -> ForwardPass {
        let buffers: Vec<Vec<f64>> = topology.sizes().iter()
            .map(|&size| vec![0.0; size])
            .collect();
        ForwardPass {
            activations: buffers.clone(),
            weighted_sums: buffers,
        }
    }

    pub fn activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    pub fn weighted_sums(&self) -> &[Vec<f64>] {
        &self.weighted_sums
    }

    pub fn output(&self) -> &[f64] {
        &self.activations[self.activations.len() - 1]
    }
}
