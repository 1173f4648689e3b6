pub mod backprop;
pub mod hyperparameters;
pub mod iteration_stats;
pub mod loop_fn;
pub mod outcome;
pub mod train_config;
pub mod trainer;
pub mod training_set;

pub use backprop::Backprop;
pub use hyperparameters::Hyperparameters;
pub use iteration_stats::{IterationStats, WeightSnapshot};
pub use loop_fn::{train, train_loop};
pub use outcome::{TerminationReason, TrainOutcome};
pub use train_config::TrainConfig;
pub use trainer::{StepResult, SweepSummary, Trainer};
pub use training_set::{TrainingCase, TrainingSet};
