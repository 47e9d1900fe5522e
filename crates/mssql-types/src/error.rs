//! Error types for bit storage and metadata properties.

use thiserror::Error;

/// Errors raised by the compact bit containers and the metadata property
/// collection.
///
/// Every variant describes a bug in the calling layer rather than a runtime
/// fault; none of them are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Bit index outside a [`CompactBitArray`](crate::CompactBitArray).
    #[error("bit index {index} out of range for array of length {length}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the array.
        length: usize,
    },

    /// Cell outside a [`CompactBitMatrix`](crate::CompactBitMatrix).
    #[error("cell ({row}, {column}) out of range for {height}x{width} matrix")]
    CellOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        column: usize,
        /// Number of rows in the matrix.
        height: usize,
        /// Number of columns in the matrix.
        width: usize,
    },

    /// Dense matrix source whose rows are not all the same width.
    #[error("ragged matrix source: row {row} has {actual} columns, expected {expected}")]
    RaggedMatrix {
        /// Index of the first offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },

    /// Write attempted on a frozen metadata property collection.
    #[error("cannot set {property}: metadata property collection is read-only")]
    ReadOnly {
        /// Name of the property being written.
        property: &'static str,
    },

    /// Setter called without a property value.
    #[error("cannot set {property} to an empty value")]
    MissingProperty {
        /// Name of the property being written.
        property: &'static str,
    },
}
