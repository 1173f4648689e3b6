pub mod model_config;

pub use model_config::{BitmapCase, ModelConfig, TrainingSource};
