//! # mssql-types
//!
//! Compact storage for per-column and per-type boolean metadata.
//!
//! Result-set descriptors carry a handful of sparsely used boolean facts per
//! column (does it have a default, is it part of a unique key) and the driver
//! keeps static tables keyed by two type codes. Storing these as `Vec<bool>`
//! or nested vectors costs a byte or more per flag plus allocation overhead;
//! the containers here pack them into words and bytes instead.
//!
//! ## Contents
//!
//! - [`CompactBitArray`]: fixed-length bit vector with one inline word
//! - [`CompactBitMatrix`]: fixed-size column-major bit table
//! - [`MetadataPropertyCollection`]: optional column-set properties with a
//!   one-way read-only switch
//! - [`ConversionTable`]: value kind × SQL type lookup built on the matrix
//!
//! None of these types synchronize internally. A frozen
//! [`MetadataPropertyCollection`] can be shared across threads because it no
//! longer accepts writes.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bit_array;
pub mod bit_matrix;
pub mod conversion;
pub mod error;
pub mod metadata;

pub use bit_array::CompactBitArray;
pub use bit_matrix::CompactBitMatrix;
pub use conversion::{ConversionTable, SqlDbType, ValueKind};
pub use error::TypeError;
pub use metadata::{
    ColumnOrder, DefaultFieldsProperty, MetadataPropertyCollection, SortOrder, SortOrderProperty,
    UniqueKeyProperty,
};
