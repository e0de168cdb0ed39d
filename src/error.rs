//! Error types for the mining core

use thiserror::Error;

/// Errors raised before or while mining a dataset.
///
/// An empty rule set is not an error; callers receive `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum MiningError {
    /// Input could not be read or split into delimited rows.
    #[error("input error: {0}")]
    Input(String),

    /// A threshold lies outside its valid range.
    #[error("invalid parameter {name} = {value}: expected {expected}")]
    Parameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Result type for the mining core.
pub type MiningResult<T> = Result<T, MiningError>;

impl From<csv::Error> for MiningError {
    fn from(err: csv::Error) -> Self {
        MiningError::Input(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = MiningError::Input("no transactions".into());
        assert_eq!(err.to_string(), "input error: no transactions");

        let err = MiningError::Parameter {
            name: "min_support",
            value: 0.0,
            expected: "a value in (0, 1]",
        };
        assert_eq!(
            err.to_string(),
            "invalid parameter min_support = 0: expected a value in (0, 1]"
        );
    }
}
