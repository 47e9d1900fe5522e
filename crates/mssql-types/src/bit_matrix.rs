//! Fixed-size packed boolean table.

use crate::error::TypeError;

/// A two-dimensional table of bits packed column-major into bytes.
///
/// The bit for `(row, column)` lives at linear position
/// `row + column * height`, i.e. byte `pos / 8`, bit `pos % 8`. Storage is
/// `ceil(height / 8) * width` bytes. Dimensions are fixed at construction;
/// individual bits stay mutable.
///
/// The matrix is agnostic of what its rows and columns mean. Callers with
/// enumerated keys convert them to indices, as
/// [`ConversionTable`](crate::ConversionTable) does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompactBitMatrix {
    bytes: Box<[u8]>,
    height: usize,
    width: usize,
}

impl CompactBitMatrix {
    /// Create a `height` x `width` matrix with every bit clear.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            bytes: vec![0; height.div_ceil(8) * width].into_boxed_slice(),
            height,
            width,
        }
    }

    /// Create a `height` x `width` matrix whose bit at `(row, column)` is
    /// `cell(row, column)`.
    pub fn from_fn<F>(height: usize, width: usize, mut cell: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut matrix = Self::new(height, width);
        for column in 0..width {
            for row in (0..height).filter(|&row| cell(row, column)) {
                let (byte, bit) = matrix.locate(row, column);
                matrix.bytes[byte] |= 1 << bit;
            }
        }
        matrix
    }

    /// Pack a dense row-major source into a matrix.
    ///
    /// The height is the number of rows and the width is the length of the
    /// first row; every other row must have the same length.
    pub fn from_dense<R>(rows: &[R]) -> Result<Self, TypeError>
    where
        R: AsRef<[bool]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut matrix = Self::new(rows.len(), width);

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(TypeError::RaggedMatrix {
                    row: row_index,
                    expected: width,
                    actual: row.len(),
                });
            }
            // Storage starts zeroed, so only true cells need a write.
            for (column, _) in row.iter().enumerate().filter(|(_, cell)| **cell) {
                let (byte, bit) = matrix.locate(row_index, column);
                matrix.bytes[byte] |= 1 << bit;
            }
        }

        Ok(matrix)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Size of the packed storage in bytes.
    #[must_use]
    pub fn storage_len(&self) -> usize {
        self.bytes.len()
    }

    /// Read the bit at `(row, column)`.
    pub fn get(&self, row: usize, column: usize) -> Result<bool, TypeError> {
        let (byte, bit) = self.checked_locate(row, column)?;
        Ok(self.bytes[byte] & (1 << bit) != 0)
    }

    /// Set or clear the bit at `(row, column)`.
    pub fn set(&mut self, row: usize, column: usize, value: bool) -> Result<(), TypeError> {
        let (byte, bit) = self.checked_locate(row, column)?;
        if value {
            self.bytes[byte] |= 1 << bit;
        } else {
            self.bytes[byte] &= !(1 << bit);
        }
        Ok(())
    }

    fn checked_locate(&self, row: usize, column: usize) -> Result<(usize, u32), TypeError> {
        if row >= self.height || column >= self.width {
            return Err(TypeError::CellOutOfRange {
                row,
                column,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.locate(row, column))
    }

    fn locate(&self, row: usize, column: usize) -> (usize, u32) {
        let position = row + column * self.height;
        (position / 8, (position % 8) as u32)
    }
}
