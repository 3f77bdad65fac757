//! A bit-packed store of missingness flags.

use crate::{Clear, HeapSize, Len};

/// A store for maintaining `Vec<bool>`, one bit per element.
///
/// Complete words live in `values`; the trailing partial word is `last_word`,
/// of which the low `last_bits` bits are in use. Bits above `last_bits` are
/// always zero, which lets `any` and `count_ones` read whole words.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Parts"))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mask {
    /// The bundles of bits that form complete `u64` values.
    values: Vec<u64>,
    /// The work-in-progress bits that are not yet complete.
    last_word: u64,
    /// The number of set bits in `last_word`.
    last_bits: u8,
}

impl Mask {
    pub fn new() -> Self { Self::default() }

    /// A mask of `len` copies of `bit`.
    pub fn repeat(bit: bool, len: usize) -> Self {
        let fill = if bit { u64::MAX } else { 0 };
        let last_bits = (len % 64) as u8;
        let last_word = if bit && last_bits > 0 { (1u64 << last_bits) - 1 } else { 0 };
        Self {
            values: vec![fill; len / 64],
            last_word,
            last_bits,
        }
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len(), "mask index {} out of bounds for length {}", index, self.len());
        let block = index / 64;
        let word = if block == self.values.len() { self.last_word } else { self.values[block] };
        (word >> (index % 64)) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, index: usize, bit: bool) {
        assert!(index < self.len(), "mask index {} out of bounds for length {}", index, self.len());
        let block = index / 64;
        let word = if block == self.values.len() { &mut self.last_word } else { &mut self.values[block] };
        let flag = 1u64 << (index % 64);
        if bit { *word |= flag; } else { *word &= !flag; }
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.last_word |= (bit as u64) << self.last_bits;
        self.last_bits += 1;
        // If we have a fully formed word, commit it to `self.values`.
        if self.last_bits == 64 {
            self.values.push(self.last_word);
            self.last_word = 0;
            self.last_bits = 0;
        }
    }

    pub fn pop(&mut self) -> Option<bool> {
        if self.last_bits == 0 {
            self.last_word = self.values.pop()?;
            self.last_bits = 64;
        }
        self.last_bits -= 1;
        let flag = 1u64 << self.last_bits;
        let bit = self.last_word & flag != 0;
        self.last_word &= !flag;
        Some(bit)
    }

    /// Shortens the mask to `len` bits, if it is longer.
    pub fn truncate(&mut self, len: usize) {
        while self.len() > len {
            self.pop();
        }
    }

    /// Inserts `bit` at `index`, shifting later bits up by one.
    pub fn insert(&mut self, index: usize, bit: bool) {
        assert!(index <= self.len(), "mask insertion index {} out of bounds for length {}", index, self.len());
        let tail: Vec<bool> = self.iter().skip(index).collect();
        self.truncate(index);
        self.push(bit);
        for bit in tail {
            self.push(bit);
        }
    }

    /// Removes and returns the bit at `index`, shifting later bits down by one.
    pub fn remove(&mut self, index: usize) -> bool {
        let bit = self.get(index);
        let tail: Vec<bool> = self.iter().skip(index + 1).collect();
        self.truncate(index);
        for bit in tail {
            self.push(bit);
        }
        bit
    }

    /// Whether any bit is set, examining a word at a time.
    #[inline]
    pub fn any(&self) -> bool {
        self.last_word != 0 || self.values.iter().any(|word| *word != 0)
    }

    /// The number of set bits.
    pub fn count_ones(&self) -> usize {
        let full: usize = self.values.iter().map(|word| word.count_ones() as usize).sum();
        full + self.last_word.count_ones() as usize
    }

    /// The position of the first set bit, should one exist.
    pub fn first_one(&self) -> Option<usize> {
        self.values
            .iter()
            .chain(std::iter::once(&self.last_word))
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(block, word)| 64 * block + word.trailing_zeros() as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item=bool> + '_ {
        (0 .. self.len()).map(move |index| self.get(index))
    }
}

impl Len for Mask {
    #[inline(always)] fn len(&self) -> usize { self.values.len() * 64 + (self.last_bits as usize) }
}

impl Clear for Mask {
    fn clear(&mut self) {
        self.values.clear();
        self.last_word = 0;
        self.last_bits = 0;
    }
}

impl HeapSize for Mask {
    fn heap_size(&self) -> (usize, usize) {
        self.values.heap_size()
    }
}

impl FromIterator<bool> for Mask {
    fn from_iter<I: IntoIterator<Item=bool>>(iter: I) -> Self {
        let mut mask = Mask::new();
        for bit in iter {
            mask.push(bit);
        }
        mask
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct Parts {
    values: Vec<u64>,
    last_word: u64,
    last_bits: u8,
}

// A partial word has fewer than 64 bits, and none set above them.
#[cfg(feature = "serde")]
impl TryFrom<Parts> for Mask {
    type Error = crate::Error;
    fn try_from(parts: Parts) -> crate::Result<Self> {
        let Parts { values, last_word, last_bits } = parts;
        if last_bits >= 64 || last_word >> last_bits != 0 {
            return Err(crate::Error::InvalidMask { last_word, last_bits });
        }
        Ok(Self { values, last_word, last_bits })
    }
}
