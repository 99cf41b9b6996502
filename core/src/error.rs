use std::fmt;
use thiserror::Error;

/// One violated input constraint. Validation collects all of them
/// before any simulation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterViolation {
    pub field:   String,
    pub message: String,
}

impl ParameterViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for ParameterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    InsufficientData,
    DivisionByZero,
    Internal,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid parameters: {}", join_violations(.0))]
    InvalidParameters(Vec<ParameterViolation>),

    #[error("Insufficient data: {what}")]
    InsufficientData { what: String },

    #[error("Division by zero: {what}")]
    DivisionByZero { what: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnalysisError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameters(vec![ParameterViolation::new(field, message)])
    }

    pub fn insufficient(what: impl Into<String>) -> Self {
        Self::InsufficientData { what: what.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameters(_)    => ErrorKind::InvalidParameter,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::DivisionByZero { .. }   => ErrorKind::DivisionByZero,
            Self::Other(_)                => ErrorKind::Internal,
        }
    }

    /// Every violated constraint, empty for non-validation errors.
    pub fn violations(&self) -> &[ParameterViolation] {
        match self {
            Self::InvalidParameters(v) => v,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[ParameterViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
