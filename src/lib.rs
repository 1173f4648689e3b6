pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;
pub mod data;
pub mod config;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use network::{DeltaTensor, ForwardPass, InitialWeights, Network, Topology};
pub use loss::sse::SseLoss;
pub use train::{
    train, train_loop, Backprop, Hyperparameters, IterationStats, TerminationReason,
    TrainConfig, TrainOutcome, Trainer, TrainingCase, TrainingSet, WeightSnapshot,
};
pub use config::ModelConfig;
