use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::topology::Topology;

/// One input vector paired with the output the network should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingCase {
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
}

impl TrainingCase {
    pub fn new(input: Vec<f64>, expected: Vec<f64>) -> TrainingCase {
        TrainingCase { input, expected }
    }
}

/// Ordered training cases whose widths match a topology.
///
/// Dimensions are checked once here so the training loop can run its
/// forward passes unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    cases: Vec<TrainingCase>,
    input_size: usize,
    output_size: usize,
}

impl TrainingSet {
    pub fn new(cases: Vec<TrainingCase>, topology: &Topology) -> Result<TrainingSet> {
        if cases.is_empty() {
            return Err(Error::Config("training set has no cases".to_string()));
        }
        for (a, case) in cases.iter().enumerate() {
            if case.input.len() != topology.input_size() {
                return Err(Error::mismatch(
                    format!("training case {a} input"),
                    topology.input_size(),
                    case.input.len(),
                ));
            }
            if case.expected.len() != topology.output_size() {
                return Err(Error::mismatch(
                    format!("training case {a} expected output"),
                    topology.output_size(),
                    case.expected.len(),
                ));
            }
        }
        Ok(TrainingSet {
            cases,
            input_size: topology.input_size(),
            output_size: topology.output_size(),
        })
    }

    /// Builds a set from parallel input and expected-output lists.
    pub fn from_pairs(
        inputs: Vec<Vec<f64>>,
        expected: Vec<Vec<f64>>,
        topology: &Topology,
    ) -> Result<TrainingSet> {
        if inputs.len() != expected.len() {
            return Err(Error::mismatch("expected outputs", inputs.len(), expected.len()));
        }
        let cases = inputs.into_iter().zip(expected)
            .map(|(input, expected)| TrainingCase { input, expected })
            .collect();
        TrainingSet::new(cases, topology)
    }

    /// Confirms the set was built for a topology with the same end layers.
    pub fn check_against(&self, topology: &Topology) -> Result<()> {
        if self.input_size != topology.input_size() {
            return Err(Error::mismatch("training set input width", topology.input_size(), self.input_size));
        }
        if self.output_size != topology.output_size() {
            return Err(Error::mismatch("training set output width", topology.output_size(), self.output_size));
        }
        Ok(())
    }

    pub fn cases(&self) -> &[TrainingCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainingCase> {
        self.cases.iter()
    }
}
