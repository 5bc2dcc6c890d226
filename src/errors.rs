//! Errors
//!
//! Error type shared by table loading, tree construction and evaluation.
use thiserror::Error;

/// Errors that can occur while loading data, building or evaluating a tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    /// The named subset (build or test) has no rows.
    #[error("The {0} subset has no rows.")]
    EmptyInput(&'static str),
    /// The table has no feature column left after reserving the label column.
    #[error("A table with {0} column(s) has no feature columns after reserving the label.")]
    NoFeatures(usize),
    /// None of the free variables offers a candidate threshold.
    #[error("No free variable has two or more distinct values to split on.")]
    DegenerateSplit,
    /// Rows passed for prediction are narrower than the rows the tree was built on.
    #[error("Expected rows with at least {expected} feature column(s), found {found}.")]
    ShapeMismatch { expected: usize, found: usize },
    /// Two sequences that must pair up row by row have different lengths.
    #[error("Row counts differ: {0} vs {1}.")]
    LengthMismatch(usize, usize),
    /// The classifier was used before `fit`.
    #[error("Tree wasn't built yet.")]
    NotFitted,
    /// A source row has a different width than the first row.
    #[error("Row {row} has {found} column(s), expected {expected}.")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to read a table or a tree.
    #[error("Unable to read: {0}")]
    UnableToRead(String),
    /// Unable to write a tree.
    #[error("Unable to write: {0}")]
    UnableToWrite(String),
}
