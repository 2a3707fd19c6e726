use core::borrow::Borrow;
use core::ops::Index;

use super::SortedMultiset;
use crate::raw::Bisect;
use crate::{Error, Rank, Result};

impl<T> SortedMultiset<T> {
    /// Resolves a possibly negative rank against the current length.
    fn normalize_rank(&self, rank: isize) -> Result<usize> {
        let len = self.len;
        let normalized = if rank < 0 {
            len.checked_sub(rank.unsigned_abs())
        } else {
            Some(rank.unsigned_abs())
        };
        normalized.filter(|&rank| rank < len).ok_or(Error::OutOfRange {
            rank,
            len,
        })
    }

    /// Returns the element at an in-bounds rank.
    fn at(&self, rank: usize) -> &T {
        debug_assert!(rank < self.len, "`SortedMultiset::at()` - `rank` out of bounds!");
        let (index, offset) = self.store.locate_by_rank(rank);
        self.store.get(index, offset)
    }

    /// Returns the element at position `rank` in sorted order.
    ///
    /// A negative rank counts from the end: `-1` is the largest element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the normalized rank is not in `[0, len)`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::{Error, SortedMultiset};
    ///
    /// let set = SortedMultiset::from([10, 20, 20, 30]);
    /// assert_eq!(set.get(1), Ok(&20));
    /// assert_eq!(set.get(-1), Ok(&30));
    /// assert_eq!(set.get(4), Err(Error::OutOfRange { rank: 4, len: 4 }));
    /// ```
    pub fn get(&self, rank: isize) -> Result<&T> {
        let rank = self.normalize_rank(rank)?;
        Ok(self.at(rank))
    }
}

impl<T: Clone + Ord> SortedMultiset<T> {
    /// Removes and returns the element at position `rank` in sorted order.
    ///
    /// A negative rank counts from the end: `-1` is the largest element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the normalized rank is not in `[0, len)`; the multiset is
    /// left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n) to locate the element, O(block capacity) to remove it, plus an amortized rebuild
    /// when a block is merged or dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::from([1, 3, 4, 5, 5, 5]);
    /// assert_eq!(set.remove_at_rank(2), Ok(4));
    /// assert_eq!(set.remove_at_rank(-1), Ok(5));
    /// assert!(set.remove_at_rank(4).is_err());
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 5]);
    /// ```
    pub fn remove_at_rank(&mut self, rank: isize) -> Result<T> {
        let rank = self.normalize_rank(rank)?;
        let (index, offset) = self.store.locate_by_rank(rank);
        self.len -= 1;
        Ok(self.store.remove_at(index, offset))
    }

    /// Returns the number of elements strictly less than `value`.
    ///
    /// This is the leftmost position at which `value` could be inserted while keeping the
    /// sequence sorted.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([1, 3, 4, 5, 5, 5]);
    /// assert_eq!(set.rank_lower(&5), 3);
    /// assert_eq!(set.rank_lower(&0), 0);
    /// assert_eq!(set.rank_lower(&9), 6);
    /// ```
    #[must_use]
    pub fn rank_lower<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.store.rank_by_key(value, Bisect::Left)
    }

    /// Returns the number of elements less than or equal to `value`.
    ///
    /// This is the rightmost position at which `value` could be inserted while keeping the
    /// sequence sorted.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([1, 3, 4, 5, 5, 5]);
    /// assert_eq!(set.rank_upper(&5), 6);
    /// assert_eq!(set.rank_upper(&3), 2);
    /// ```
    #[must_use]
    pub fn rank_upper<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.store.rank_by_key(value, Bisect::Right)
    }

    /// Returns the smallest element greater than or equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([1, 3, 3, 7]);
    /// assert_eq!(set.lower_bound(&3), Some(&3));
    /// assert_eq!(set.lower_bound(&4), Some(&7));
    /// assert_eq!(set.lower_bound(&8), None);
    /// ```
    #[must_use]
    pub fn lower_bound<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let rank = self.rank_lower(value);
        (rank < self.len).then(|| self.at(rank))
    }

    /// Returns the smallest element strictly greater than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([1, 3, 3, 7]);
    /// assert_eq!(set.upper_bound(&3), Some(&7));
    /// assert_eq!(set.upper_bound(&7), None);
    /// ```
    #[must_use]
    pub fn upper_bound<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let rank = self.rank_upper(value);
        (rank < self.len).then(|| self.at(rank))
    }

    /// Returns the largest element strictly less than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([1, 3, 3, 7]);
    /// assert_eq!(set.floor_bound(&3), Some(&1));
    /// assert_eq!(set.floor_bound(&1), None);
    /// ```
    #[must_use]
    pub fn floor_bound<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.rank_lower(value).checked_sub(1).map(|rank| self.at(rank))
    }
}

/// Indexes into the multiset by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use ranked_multiset::{Rank, SortedMultiset};
///
/// let set = SortedMultiset::from([10, 20, 20]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T> Index<Rank> for SortedMultiset<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        assert!(rank.0 < self.len, "index out of bounds");
        self.at(rank.0)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn normalize_rank_on_empty_set_always_fails() {
        let set: SortedMultiset<i32> = SortedMultiset::new();
        for rank in [0, 1, -1, isize::MIN, isize::MAX] {
            assert_eq!(
                set.get(rank),
                Err(Error::OutOfRange {
                    rank,
                    len: 0
                })
            );
        }
    }

    #[test]
    fn extreme_ranks_do_not_overflow() {
        let set = SortedMultiset::from([1, 2, 3]);
        assert!(set.get(isize::MIN).is_err());
        assert!(set.get(isize::MAX).is_err());
        assert_eq!(set.get(-3), Ok(&1));
    }

    #[test]
    fn bounds_across_block_boundaries() {
        let set = SortedMultiset::from_iter_with_block_capacity([1, 2, 5, 5, 5, 9], 3);
        assert_eq!(set.store.block_count(), 3);
        assert_eq!(set.count(&5), 3);
        assert_eq!(set.rank_lower(&5), 2);
        assert_eq!(set.rank_upper(&5), 5);
        assert_eq!(set.lower_bound(&3), Some(&5));
        assert_eq!(set.upper_bound(&5), Some(&9));
        assert_eq!(set.floor_bound(&5), Some(&2));
        assert_eq!(set.floor_bound(&10), Some(&9));
    }

    #[test]
    fn rank_round_trip_holds_for_every_rank() {
        let set = SortedMultiset::from_iter_with_block_capacity((0..300).map(|v| v % 17), 6);
        for rank in 0..set.len() {
            let value = set[Rank(rank)];
            assert!(set.rank_lower(&value) <= rank);
            assert!(rank < set.rank_upper(&value));
        }
    }
}
