//! Coverage Sets

use smallvec::{SmallVec, smallvec};

const WORD_BITS: usize = u64::BITS as usize;

/// Bit set over the requested items of a single solve.
///
/// Bit `i` stands for the `i`-th requested item. Requests of up to 64 items
/// fit in one inline word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Coverage {
    words: SmallVec<[u64; 1]>,
}

impl Coverage {
    /// An empty set able to hold `len` items.
    pub fn empty(len: usize) -> Self {
        Self {
            words: smallvec![0; len.div_ceil(WORD_BITS)],
        }
    }

    /// A set holding every one of `len` items.
    pub fn full(len: usize) -> Self {
        let mut coverage = Self::empty(len);

        for bit in 0..len {
            coverage.insert(bit);
        }

        coverage
    }

    /// A set holding only `bit`.
    pub fn single(len: usize, bit: usize) -> Self {
        let mut coverage = Self::empty(len);
        coverage.insert(bit);

        coverage
    }

    /// Adds `bit` to the set. Bits beyond the set's capacity are ignored.
    pub fn insert(&mut self, bit: usize) {
        if let Some(word) = self.words.get_mut(bit / WORD_BITS) {
            *word |= 1_u64 << (bit % WORD_BITS);
        }
    }

    /// Whether `bit` is in the set.
    pub fn contains(&self, bit: usize) -> bool {
        self.words
            .get(bit / WORD_BITS)
            .is_some_and(|word| word & (1_u64 << (bit % WORD_BITS)) != 0)
    }

    /// Whether the set holds no items.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Number of items in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Number of items held by both sets.
    pub fn intersection_len(&self, other: &Coverage) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Adds every item of `other` to the set.
    pub fn union_with(&mut self, other: &Coverage) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
    }

    /// Removes every item of `other` from the set.
    pub fn difference_with(&mut self, other: &Coverage) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !b;
        }
    }

    /// Iterates over the item positions in the set, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1_u64 << bit) != 0)
                .map(move |bit| w * WORD_BITS + bit)
        })
    }

    /// The set as a single integer mask, if it fits in one machine word.
    pub fn as_mask(&self) -> Option<usize> {
        match self.words.as_slice() {
            [] => Some(0),
            [word] => usize::try_from(*word).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut coverage = Coverage::empty(70);

        coverage.insert(3);
        coverage.insert(65);

        assert!(coverage.contains(3));
        assert!(coverage.contains(65));
        assert!(!coverage.contains(4));
        assert_eq!(coverage.len(), 2);
        assert_eq!(coverage.iter().collect::<Vec<_>>(), vec![3, 65]);
    }

    #[test]
    fn insert_out_of_range_is_ignored() {
        let mut coverage = Coverage::empty(3);

        coverage.insert(200);

        assert!(coverage.is_empty());
    }

    #[test]
    fn full_holds_every_bit() {
        let coverage = Coverage::full(5);

        assert_eq!(coverage.len(), 5);
        assert_eq!(coverage.as_mask(), Some(0b1_1111));
    }

    #[test]
    fn set_operations() {
        let mut a = Coverage::empty(4);
        a.insert(0);
        a.insert(1);

        let mut b = Coverage::empty(4);
        b.insert(1);
        b.insert(2);

        assert_eq!(a.intersection_len(&b), 1);

        let mut union = a.clone();
        union.union_with(&b);
        assert_eq!(union.as_mask(), Some(0b111));

        let mut difference = a.clone();
        difference.difference_with(&b);
        assert_eq!(difference.as_mask(), Some(0b1));
    }

    #[test]
    fn wide_sets_have_no_single_mask() {
        assert_eq!(Coverage::single(65, 64).as_mask(), None);
        assert_eq!(Coverage::empty(0).as_mask(), Some(0));
    }
}
