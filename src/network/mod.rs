pub mod buffers;
pub mod delta;
pub mod forward;
pub mod network;
pub mod topology;

pub use buffers::ForwardPass;
pub use delta::DeltaTensor;
pub use network::{InitialWeights, Network};
pub use topology::Topology;
