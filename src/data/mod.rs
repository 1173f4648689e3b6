pub mod bitmap;
pub mod cases;

pub use cases::{format_activations, parse_activations};
