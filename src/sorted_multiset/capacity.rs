use alloc::vec::Vec;

use log::debug;

use super::SortedMultiset;
use crate::raw::BlockStore;

impl<T> SortedMultiset<T> {
    /// Creates an empty multiset whose blocks split when they reach `block_capacity` elements.
    ///
    /// Blocks that fall below `block_capacity / 4` elements are merged with their right neighbor.
    /// Larger blocks make value lookups and iteration cheaper and inserts and removals dearer; a
    /// capacity around the square root of the expected length balances the two.
    ///
    /// # Panics
    ///
    /// Panics if `block_capacity` is less than 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::with_block_capacity(64);
    /// set.insert(1);
    /// assert_eq!(set.block_capacity(), 64);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn with_block_capacity(block_capacity: usize) -> Self {
        assert!(block_capacity >= 2, "`SortedMultiset::with_block_capacity()` - `block_capacity` < 2!");
        debug!("creating sorted multiset with block capacity {block_capacity}");
        SortedMultiset {
            store: BlockStore::new(block_capacity),
            len: 0,
        }
    }

    /// Returns the number of elements at which a block is split.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    /// use ranked_multiset::sorted_multiset::DEFAULT_BLOCK_CAPACITY;
    ///
    /// let set: SortedMultiset<i32> = SortedMultiset::new();
    /// assert_eq!(set.block_capacity(), DEFAULT_BLOCK_CAPACITY);
    /// ```
    #[must_use]
    pub const fn block_capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Returns the number of elements below which a block is merged with its right neighbor.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set: SortedMultiset<i32> = SortedMultiset::with_block_capacity(64);
    /// assert_eq!(set.merge_threshold(), 16);
    /// ```
    #[must_use]
    pub const fn merge_threshold(&self) -> usize {
        self.store.merge_threshold()
    }
}

impl<T: Clone + Ord> SortedMultiset<T> {
    /// Builds a multiset from `iter` with the given block capacity.
    ///
    /// The input is sorted once and loaded into blocks of `block_capacity - 1` elements.
    ///
    /// # Panics
    ///
    /// Panics if `block_capacity` is less than 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from_iter_with_block_capacity([3, 1, 2, 1], 16);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 1, 2, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n)
    #[must_use]
    pub fn from_iter_with_block_capacity<I>(iter: I, block_capacity: usize) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        assert!(block_capacity >= 2, "`SortedMultiset::from_iter_with_block_capacity()` - `block_capacity` < 2!");
        let mut keys: Vec<T> = iter.into_iter().collect();
        keys.sort();
        let len = keys.len();
        SortedMultiset {
            store: BlockStore::from_sorted(keys, block_capacity),
            len,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "`SortedMultiset::with_block_capacity()` - `block_capacity` < 2!")]
    fn block_capacity_below_two_panics() {
        let _: SortedMultiset<i32> = SortedMultiset::with_block_capacity(1);
    }

    #[test]
    fn bulk_load_uses_capacity_minus_one() {
        let set = SortedMultiset::from_iter_with_block_capacity((0..20).rev(), 8);
        set.store.validate_invariants();
        assert_eq!(set.len(), 20);
        assert_eq!(set.store.block_count(), 3);
        assert_eq!(set.store.blocks()[0].len(), 7);
        assert_eq!(set.store.blocks()[2].len(), 6);
    }

    #[test]
    fn empty_bulk_load_is_single_empty_block() {
        let set = SortedMultiset::from_iter_with_block_capacity(core::iter::empty::<u8>(), 8);
        set.store.validate_invariants();
        assert!(set.is_empty());
        assert_eq!(set.store.block_count(), 1);
    }
}
