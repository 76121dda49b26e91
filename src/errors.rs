use thiserror::Error;

/// A malformed or out-of-range input supplied to the engine. Raised
/// immediately and never downgraded to a default value; carries the
/// offending field name and value.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} is outside the plausible range {min}..{max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Invalid target band \"{band}\" (expected one of A-G)")]
    InvalidTargetBand { band: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] ValidationError),
    #[error("Project input could not be parsed: {0}")]
    MalformedProject(#[from] serde_json::Error),
    #[error("Project input failed validation: {0}")]
    InvalidProject(String),
}
