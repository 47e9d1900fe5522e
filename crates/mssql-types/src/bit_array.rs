//! Fixed-length packed boolean vector.
//!
//! Column flags (default values, unique key membership) are stored one bit per
//! column. Most result sets have 32 columns or fewer, so the first word lives
//! inline and only wider column sets pay for a heap allocation.

use crate::error::TypeError;

const BITS_PER_WORD: usize = u32::BITS as usize;

/// A fixed-length array of bits packed into 32-bit words.
///
/// Word 0 is stored inline; word `k > 0` lives at `overflow[k - 1]`. The
/// overflow segment holds `ceil(len / 32) - 1` words and is empty for arrays
/// of 32 bits or fewer.
///
/// Indexing is strict: any index `>= len` is rejected with
/// [`TypeError::IndexOutOfRange`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompactBitArray {
    first: u32,
    overflow: Box<[u32]>,
    length: usize,
}

impl CompactBitArray {
    /// Create an array of `length` bits, all clear.
    #[must_use]
    pub fn new(length: usize) -> Self {
        let overflow_words = word_count_for(length).saturating_sub(1);
        Self {
            first: 0,
            overflow: vec![0; overflow_words].into_boxed_slice(),
            length,
        }
    }

    /// Create an array holding the given bits in order.
    #[must_use]
    pub fn from_bools<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
        I::IntoIter: ExactSizeIterator,
    {
        let bits = bits.into_iter();
        let mut array = Self::new(bits.len());
        for (index, bit) in bits.enumerate() {
            if bit {
                let (word, offset) = locate(index);
                *array.word_mut(word) |= 1 << offset;
            }
        }
        array
    }

    /// Number of bits in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the array holds zero bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of 32-bit words backing the array, inline word included.
    #[must_use]
    pub fn word_count(&self) -> usize {
        1 + self.overflow.len()
    }

    /// Read the bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool, TypeError> {
        self.check_index(index)?;
        let (word, offset) = locate(index);
        Ok(self.word(word) & (1 << offset) != 0)
    }

    /// Set or clear the bit at `index`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), TypeError> {
        self.check_index(index)?;
        let (word, offset) = locate(index);
        let slot = self.word_mut(word);
        if value {
            *slot |= 1 << offset;
        } else {
            *slot &= !(1 << offset);
        }
        Ok(())
    }

    /// Iterate over every bit in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.length).map(move |index| {
            let (word, offset) = locate(index);
            self.word(word) & (1 << offset) != 0
        })
    }

    fn check_index(&self, index: usize) -> Result<(), TypeError> {
        if index >= self.length {
            return Err(TypeError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    fn word(&self, word: usize) -> u32 {
        match word {
            0 => self.first,
            n => self.overflow[n - 1],
        }
    }

    fn word_mut(&mut self, word: usize) -> &mut u32 {
        match word {
            0 => &mut self.first,
            n => &mut self.overflow[n - 1],
        }
    }
}

/// Split a bit index into (word index, bit offset within the word).
fn locate(index: usize) -> (usize, u32) {
    (index / BITS_PER_WORD, (index % BITS_PER_WORD) as u32)
}

fn word_count_for(bits: usize) -> usize {
    bits.div_ceil(BITS_PER_WORD)
}
