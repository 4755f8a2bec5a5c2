//! Error types for tree construction and table sorting

use thiserror::Error;

/// Errors raised while building a [`crate::PathTree`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    #[error("Duplicate leaf path: {0}")]
    DuplicatePath(String),

    #[error("Path {path} conflicts with existing {existing}")]
    PathConflict { path: String, existing: String },

    #[error("Malformed path: {0:?}")]
    MalformedPath(String),

    #[error("Invalid size {size} for {path}")]
    InvalidSize { path: String, size: f64 },
}

/// Errors raised while sorting a [`crate::Table`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SortError {
    #[error("Cannot compare {left} with {right} in column {column}")]
    Incomparable {
        column: String,
        left: String,
        right: String,
    },

    #[error("Column index {0} out of range")]
    ColumnOutOfRange(usize),
}

/// Errors raised while constructing a [`crate::Table`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("No accessor registered for column {0}")]
    MissingAccessor(String),

    #[error("Initial sort column {0} out of range")]
    InitialSortOutOfRange(usize),
}
