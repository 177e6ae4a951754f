use thiserror::Error;

/// Errors that can occur while evaluating a MarkdQL query.
///
/// Parsing a document never fails, so this is the only error type the
/// crate surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unrecognized query: {0}")]
    UnrecognizedQuery(String),
    #[error("invalid regex in query token: {0}")]
    InvalidRegex(String),
}
