//! Error types shared by the parser, the blending engine and the report writer.
//! Every variant carries enough context to be shown to the user as is.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlendError {
    #[error("input file '{path}' could not be opened: {reason}")]
    FileNotFound { path: String, reason: String },
    #[error("variable '{name}' was not found in the solver output")]
    VariableNotFound { name: String },
    #[error("malformed number '{token}' in line {line} of the matrix block")]
    MalformedNumber { token: String, line: usize },
    #[error("ragged matrix: row {row} has {found} values, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("matrix has {found} rows but {expected} raw materials are configured")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("package {package} has zero total weight, its concentrations are undefined")]
    ZeroWeightPackage { package: usize },
    #[error("report '{path}' could not be written: {reason}")]
    OutputWriteFailure { path: String, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("configuration parsing error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type BlendResult<T> = Result<T, BlendError>;
