use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected a JSON object for {0}")]
    NotAnObject(&'static str),

    #[error("collection {0} is not an array")]
    CollectionNotArray(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
