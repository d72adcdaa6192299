use crate::core::models::error::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: cannot parse '{token}' as a number")]
    Parse { line: usize, token: String },

    #[error("Line {line}: expected {expected} column(s), found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Atom {index}: atomic number {value} is not a positive integer")]
    AtomicNumber { index: usize, value: f64 },

    #[error("Invalid data: {0}")]
    Model(#[from] ModelError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
