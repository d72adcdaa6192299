use super::error::IoError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading whitespace-delimited numeric tables.
///
/// Every line holds exactly [`TableFile::COLUMNS`] numbers. Blank lines and lines starting
/// with `#` are skipped. Implementors only convert the parsed rows into their model type;
/// tokenizing, column checks and line-numbered errors are shared.
pub trait TableFile {
    /// The model type produced from the table.
    type Output;

    /// Number of columns every data line must have.
    const COLUMNS: usize;

    /// Converts parsed rows into the model type.
    ///
    /// # Arguments
    ///
    /// * `rows` - One entry per data line, each exactly `COLUMNS` long.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows violate the model's invariants.
    fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self::Output, IoError>;

    /// Reads and converts a table from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, on a token that is not a number, on a line with the
    /// wrong number of columns, or when [`TableFile::from_rows`] rejects the data.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, IoError> {
        let mut rows = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let line_number = index + 1;
            let row = trimmed
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| IoError::Parse {
                        line: line_number,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if row.len() != Self::COLUMNS {
                return Err(IoError::ColumnCount {
                    line: line_number,
                    expected: Self::COLUMNS,
                    found: row.len(),
                });
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Reads and converts a table from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its contents are rejected.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, IoError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
