use crate::error::{Error, Result};

/// Parses a comma-separated list of activations such as `"0.5,1,-2e-3"`.
///
/// Surrounding whitespace around each value is ignored; an empty entry is an
/// error.
pub fn parse_activations(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .enumerate()
        .map(|(k, token)| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| {
                Error::Config(format!("activation {k} is not a number: {token:?}"))
            })
        })
        .collect()
}

/// Formats activations the way [`parse_activations`] reads them.
pub fn format_activations(values: &[f64]) -> String {
    values.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
