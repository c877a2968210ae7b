//! Error types for table rendering.

use thiserror::Error;

/// Table rendering error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A record does not expose the same fields, in the same order, as the first record.
    #[error("record {row} has fields [{}], expected [{}]", found.join(", "), expected.join(", "))]
    ShapeMismatch {
        /// Zero-based index of the offending record.
        row: usize,
        /// Field names of the first record.
        expected: Vec<String>,
        /// Field names of the offending record.
        found: Vec<String>,
    },

    /// A row does not have one cell per column.
    #[error("row {row} has {found} cells, expected {expected}")]
    CellCount {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for table rendering.
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = TableError::ShapeMismatch {
            row: 1,
            expected: vec!["Id".into(), "Name".into()],
            found: vec!["Id".into()],
        };
        assert_eq!(err.to_string(), "record 1 has fields [Id], expected [Id, Name]");
    }
}
