use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::data::bitmap;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::{InitialWeights, Network, Topology};
use crate::train::hyperparameters::Hyperparameters;
use crate::train::train_config::TrainConfig;
use crate::train::training_set::{TrainingCase, TrainingSet};

/// A training case whose input is read from an image file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapCase {
    /// Image path, relative paths resolve against the config file's directory.
    pub path: PathBuf,
    pub expected: Vec<f64>,
}

/// Where the training cases come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrainingSource {
    /// Cases listed directly in the config.
    Inline { cases: Vec<TrainingCase> },
    /// Inputs decoded from grayscale bitmaps, optionally resized first.
    Bitmaps {
        cases: Vec<BitmapCase>,
        #[serde(default)]
        resize: Option<(u32, u32)>,
    },
}

/// A fully serializable description of a model: architecture, optional
/// weights, training cases and hyperparameters.
///
/// Trained weights can be written back into the same file, so a config also
/// serves as the model's saved state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Human-readable name used in logs.
    pub name: String,
    /// Layer widths, input first.
    pub topology: Vec<usize>,
    #[serde(default)]
    pub activation: ActivationFunction,
    /// Weights indexed `[layer][from][to]`; `null` entries are randomized.
    #[serde(default)]
    pub weights: Option<InitialWeights>,
    /// Treat a literal `0.0` weight as unset, like the legacy trainer did.
    #[serde(default)]
    pub zero_weight_is_unset: bool,
    pub training: TrainingSource,
    #[serde(default)]
    pub hyperparameters: Hyperparameters,
    /// Sweeps between progress reports; `0` disables them.
    #[serde(default)]
    pub progress_period: u64,
    /// Sweeps between weight snapshots written back to the file; `0` disables them.
    #[serde(default)]
    pub save_period: u64,
}

impl ModelConfig {
    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `ModelConfig` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<ModelConfig> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn topology(&self) -> Result<Topology> {
        Topology::new(self.topology.clone())
    }

    /// Configured weights with the zero-as-unset policy applied.
    pub fn initial_weights(&self) -> Option<InitialWeights> {
        let weights = self.weights.as_ref()?;
        if !self.zero_weight_is_unset {
            return Some(weights.clone());
        }
        Some(weights.iter()
            .map(|layer| layer.iter()
                .map(|row| row.iter().map(|w| w.filter(|&v| v != 0.0)).collect())
                .collect())
            .collect())
    }

    /// Builds the network, randomizing unset weights within the configured range.
    pub fn build_network<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.hyperparameters.validate()?;
        let initial = self.initial_weights();
        Network::with_rng(
            self.topology()?,
            self.activation,
            initial.as_ref(),
            self.hyperparameters.random_range,
            rng,
        )
    }

    /// Loads the training cases. Relative bitmap paths resolve against `base_dir`.
    pub fn training_set(&self, base_dir: &Path) -> Result<TrainingSet> {
        let topology = self.topology()?;
        let cases = match &self.training {
            TrainingSource::Inline { cases } => cases.clone(),
            TrainingSource::Bitmaps { cases, resize } => cases.iter()
                .map(|case| {
                    let input = bitmap::load_grayscale(base_dir.join(&case.path), *resize)?;
                    Ok(TrainingCase::new(input, case.expected.clone()))
                })
                .collect::<Result<Vec<_>>>()?,
        };
        TrainingSet::new(cases, &topology)
    }

    /// Training options without channels; the caller attaches its listeners.
    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            progress_period: self.progress_period,
            save_period: self.save_period,
            ..TrainConfig::new(self.hyperparameters.clone())
        }
    }

    /// Stores `weights` as the config's fully specified weights.
    pub fn set_weights(&mut self, weights: &[Matrix]) -> Result<()> {
        let topology = self.topology()?;
        if weights.len() != topology.layer_count() - 1 {
            return Err(Error::mismatch("weight layers", topology.layer_count() - 1, weights.len()));
        }
        self.weights = Some(weights.iter()
            .map(|m| m.data.iter()
                .map(|row| row.iter().map(|&w| Some(w)).collect())
                .collect())
            .collect());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn xor_config() -> ModelConfig {
        serde_json::from_str(r#"{
            "name": "xor",
            "topology": [2, 2, 1],
            "activation": "sigmoid",
            "weights": [
                [[0.0, null], [0.5, -0.5]],
                [[1.0], [null]]
            ],
            "training": {
                "type": "inline",
                "cases": [
                    { "input": [0, 0], "expected": [0] },
                    { "input": [0, 1], "expected": [1] },
                    { "input": [1, 0], "expected": [1] },
                    { "input": [1, 1], "expected": [0] }
                ]
            },
            "hyperparameters": { "random_range": [3.0, 4.0] }
        }"#).unwrap()
    }

    #[test]
    fn explicit_zero_is_kept_by_default() {
        let config = xor_config();
        let net = config.build_network(&mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(net.weights()[0].get(0, 0), 0.0);
        assert!((3.0..4.0).contains(&net.weights()[0].get(0, 1)));
        assert!((3.0..4.0).contains(&net.weights()[1].get(1, 0)));
    }

    #[test]
    fn legacy_policy_randomizes_zeros() {
        let config = ModelConfig { zero_weight_is_unset: true, ..xor_config() };
        let net = config.build_network(&mut StdRng::seed_from_u64(9)).unwrap();
        assert!((3.0..4.0).contains(&net.weights()[0].get(0, 0)));
        assert_eq!(net.weights()[0].get(1, 1), -0.5);
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config = xor_config();
        assert_eq!(config.hyperparameters.error_threshold, 0.01);
        assert_eq!(config.progress_period, 0);
        assert!(!config.zero_weight_is_unset);
    }

    #[test]
    fn inline_cases_are_validated_against_topology() {
        let mut config = xor_config();
        config.topology = vec![3, 1];
        config.weights = None;
        let err = config.training_set(Path::new(".")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn set_weights_makes_every_weight_explicit() {
        let mut config = xor_config();
        let net = config.build_network(&mut StdRng::seed_from_u64(1)).unwrap();
        config.set_weights(net.weights()).unwrap();
        let rebuilt = config.build_network(&mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(rebuilt.weights(), net.weights());
    }
}
