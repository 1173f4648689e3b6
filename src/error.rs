/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, configuring or training a network.
///
/// Training itself never fails on numerical grounds: divergence and NaN
/// propagation simply run until a termination condition is reached.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid topology: {0}")]
    Topology(String),

    #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid random range [{min}, {max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Error {
        Error::DimensionMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// True for errors describing a malformed network or training setup,
    /// as opposed to I/O or decoding failures of the surrounding tooling.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Topology(_)
                | Error::DimensionMismatch { .. }
                | Error::InvalidRange { .. }
                | Error::InvalidHyperparameter(_)
                | Error::Config(_)
        )
    }
}
