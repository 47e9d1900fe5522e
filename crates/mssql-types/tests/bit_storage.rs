//! Property tests for the packed bit containers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mssql_types::{CompactBitArray, CompactBitMatrix, TypeError};
use proptest::prelude::*;

/// Array length and an index inside it.
fn length_and_index() -> impl Strategy<Value = (usize, usize)> {
    (1usize..300).prop_flat_map(|len| (Just(len), 0..len))
}

/// Matrix dimensions and a cell inside them.
fn dims_and_cell() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..40, 1usize..40)
        .prop_flat_map(|(rows, cols)| (Just(rows), Just(cols), 0..rows, 0..cols))
}

proptest! {
    #[test]
    fn single_bit_is_isolated((len, index) in length_and_index()) {
        let mut bits = CompactBitArray::new(len);
        bits.set(index, true).unwrap();

        for other in 0..len {
            prop_assert_eq!(bits.get(other).unwrap(), other == index);
        }
        prop_assert_eq!(bits.word_count(), len.div_ceil(32).max(1));
    }

    #[test]
    fn array_rejects_index_past_end(len in 0usize..300, past in 0usize..64) {
        let mut bits = CompactBitArray::new(len);
        let index = len + past;

        prop_assert_eq!(bits.get(index), Err(TypeError::IndexOutOfRange { index, length: len }));
        prop_assert!(bits.set(index, true).is_err());
    }

    #[test]
    fn array_matches_vec_model(model in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut bits = CompactBitArray::new(model.len());
        for (index, value) in model.iter().enumerate() {
            bits.set(index, *value).unwrap();
        }
        prop_assert_eq!(bits.iter().collect::<Vec<_>>(), model.clone());
        prop_assert_eq!(CompactBitArray::from_bools(model.iter().copied()), bits);
    }

    #[test]
    fn single_cell_is_isolated((rows, cols, row, col) in dims_and_cell()) {
        let mut dense = vec![vec![false; cols]; rows];
        dense[row][col] = true;
        let matrix = CompactBitMatrix::from_dense(&dense).unwrap();

        prop_assert_eq!(matrix.storage_len(), rows.div_ceil(8) * cols);
        for r in 0..rows {
            for c in 0..cols {
                prop_assert_eq!(matrix.get(r, c).unwrap(), r == row && c == col);
            }
        }
    }

    #[test]
    fn matrix_rejects_cells_out_of_range((rows, cols, row, col) in dims_and_cell()) {
        let mut matrix = CompactBitMatrix::new(rows, cols);

        prop_assert!(matrix.get(rows, col).is_err());
        prop_assert!(matrix.get(row, cols).is_err());
        prop_assert!(matrix.set(rows + row, cols + col, true).is_err());
    }
}

#[test]
fn test_forty_bit_array_layout() {
    let mut bits = CompactBitArray::new(40);
    bits.set(35, true).unwrap();

    assert!(!bits.get(3).unwrap());
    assert!(bits.get(35).unwrap());
    assert_eq!(bits.word_count(), 2);
}
