use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// Weight changes computed for one training case, shaped like the weights.
///
/// Kept after being applied so the same update can be subtracted again when
/// the adaptive rule rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaTensor {
    pub(crate) layers: Vec<Matrix>,
}

impl DeltaTensor {
    pub fn zeros(topology: &Topology) -> DeltaTensor {
        DeltaTensor {
            layers: topology.weight_shapes()
                .map(|(rows, cols)| Matrix::zeros(rows, cols))
                .collect(),
        }
    }

    pub fn layers(&self) -> &[Matrix] {
        &self.layers
    }

    /// Wraps explicit matrices, e.g. a hand-built update in tests.
    pub fn from_layers(layers: Vec<Matrix>) -> DeltaTensor {
        DeltaTensor { layers }
    }
}
