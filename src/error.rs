use thiserror::Error;

/// Failure of a single output slot. Other outputs keep rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("'{0}' is not a numeric column")]
    UnknownColumn(String),

    #[error("column '{0}' has no numeric values")]
    NoNumericValues(String),
}
