use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::slice;

use alloc::vec::{self, Vec};

use crate::raw::{Block, BlockStore};

mod capacity;
mod order_statistic;

/// The block capacity used by [`SortedMultiset::new`] and the `From`/`FromIterator` constructors.
pub const DEFAULT_BLOCK_CAPACITY: usize = 700;

/// A sorted multiset with O(log n) rank queries.
///
/// Elements are kept in ascending order, duplicates included. Storage is a sequence of small
/// sorted blocks; a macro index over block boundaries routes value lookups to the right block, and
/// a Fenwick tree over block sizes translates between a global rank and a `(block, offset)` pair.
/// A block that reaches the block capacity is split in half, and a block that falls below a quarter
/// of it is merged with its right neighbor.
///
/// It is a logic error for an element to be modified in such a way that its ordering relative to
/// any other element, as determined by the [`Ord`] trait, changes while it is in the multiset.
/// This is normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe
/// code. The behavior resulting from such a logic error is not specified, but will be encapsulated
/// to the `SortedMultiset` that observed the logic error and not result in undefined behavior.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use ranked_multiset::SortedMultiset;
///
/// let mut scores = SortedMultiset::new();
/// for score in [5, 3, 5, 1, 4, 5] {
///     scores.insert(score);
/// }
///
/// assert_eq!(scores.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 5, 5]);
/// assert_eq!(scores.count(&5), 3);
/// assert_eq!(scores.rank_lower(&5), 3);
/// assert_eq!(scores.get(-1), Ok(&5));
///
/// assert_eq!(scores.remove_at_rank(2), Ok(4));
/// assert_eq!(scores.len(), 5);
/// ```
#[derive(Clone)]
pub struct SortedMultiset<T> {
    store: BlockStore<T>,
    len: usize,
}

/// An iterator over the elements of a `SortedMultiset`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`SortedMultiset`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use ranked_multiset::SortedMultiset;
///
/// let set = SortedMultiset::from([3, 1, 3]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&3));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: SortedMultiset::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    blocks: slice::Iter<'a, Block<T>>,
    front: slice::Iter<'a, T>,
    back: slice::Iter<'a, T>,
    remaining: usize,
}

/// An owning iterator over the elements of a `SortedMultiset`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`SortedMultiset`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use ranked_multiset::SortedMultiset;
///
/// let set = SortedMultiset::from([2, 1, 2]);
/// let mut iter = set.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(2));
/// assert_eq!(iter.next(), Some(2));
/// ```
///
/// [`into_iter`]: SortedMultiset#method.into_iter
pub struct IntoIter<T> {
    blocks: vec::IntoIter<Block<T>>,
    front: vec::IntoIter<T>,
    back: vec::IntoIter<T>,
    remaining: usize,
}

impl<T> SortedMultiset<T> {
    /// Makes a new, empty `SortedMultiset` with [`DEFAULT_BLOCK_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::new();
    ///
    /// // entries can now be inserted into the empty multiset
    /// set.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn new() -> SortedMultiset<T> {
        SortedMultiset {
            store: BlockStore::new(DEFAULT_BLOCK_CAPACITY),
            len: 0,
        }
    }

    /// Returns the number of elements in the multiset, counting duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// set.insert(1);
    /// assert_eq!(set.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the multiset contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::new();
    /// assert!(set.is_empty());
    /// set.insert(1);
    /// assert!(!set.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the multiset, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::from([1, 1, 2]);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.store.clear();
        self.len = 0;
    }

    /// Gets an iterator that visits the elements in ascending order, duplicates included.
    ///
    /// The iterator borrows the multiset; calling `iter` again restarts from the smallest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([3, 1, 2, 1]);
    /// let items: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(items, [1, 1, 2, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; each iteration step is O(1) amortized.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            blocks: self.store.blocks().iter(),
            front: slice::Iter::default(),
            back: slice::Iter::default(),
            remaining: self.len,
        }
    }

    /// Returns a reference to the smallest element, or `None` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.store.blocks().first().and_then(Block::first)
    }

    /// Returns a reference to the largest element, or `None` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([1, 3, 2]);
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.store.blocks().last().and_then(Block::last)
    }
}

impl<T: Clone + Ord> SortedMultiset<T> {
    /// Adds one occurrence of `value`.
    ///
    /// Equal elements keep their insertion order: the new element is placed after every element
    /// that compares equal to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::new();
    /// set.insert(2);
    /// set.insert(2);
    /// assert_eq!(set.count(&2), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to locate the block, O(block capacity) to insert into it, plus an amortized
    /// rebuild when the block splits.
    pub fn insert(&mut self, value: T) {
        self.store.insert(value);
        self.len += 1;
    }

    /// Removes one occurrence of `value`. Returns whether an occurrence was present.
    ///
    /// Removing an absent value leaves the multiset unchanged and is not an error.
    ///
    /// The value may be any borrowed form of the multiset's element type,
    /// but the ordering on the borrowed form *must* match the
    /// ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::from([1, 2, 2]);
    /// assert!(set.remove(&2));
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.take(value).is_some()
    }

    /// Removes one occurrence of `value` if present; does nothing otherwise.
    ///
    /// This is [`remove`](Self::remove) for callers that do not care whether anything was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::from([1, 3, 5]);
    /// set.discard(&100);
    /// assert_eq!(set.len(), 3);
    /// set.discard(&3);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 5]);
    /// ```
    pub fn discard<Q>(&mut self, value: &Q)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.take(value);
    }

    /// Removes and returns one occurrence of `value`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::from([1, 2]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (index, offset) = self.store.find(value)?;
        self.len -= 1;
        Some(self.store.remove_at(index, offset))
    }

    /// Returns the number of occurrences of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([5, 3, 5, 1, 4, 5]);
    /// assert_eq!(set.count(&5), 3);
    /// assert_eq!(set.count(&2), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.rank_upper(value) - self.rank_lower(value)
    }

    /// Returns `true` if the multiset contains at least one occurrence of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.store.find(value).is_some()
    }

    /// Removes and returns the smallest element, or `None` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::from([2, 1, 1]);
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(2));
    /// assert_eq!(set.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.len -= 1;
        Some(self.store.remove_at(0, 0))
    }

    /// Removes and returns the largest element, or `None` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let mut set = SortedMultiset::from([1, 3, 2]);
    /// assert_eq!(set.pop_last(), Some(3));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn pop_last(&mut self) -> Option<T> {
        let index = self.store.block_count() - 1;
        let offset = self.store.blocks()[index].len().checked_sub(1)?;
        self.len -= 1;
        Some(self.store.remove_at(index, offset))
    }
}

impl<T: Hash> Hash for SortedMultiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for SortedMultiset<T> {
    fn eq(&self, other: &SortedMultiset<T>) -> bool {
        self.len == other.len && self.iter().eq(other)
    }
}

impl<T: Eq> Eq for SortedMultiset<T> {}

impl<T: PartialOrd> PartialOrd for SortedMultiset<T> {
    fn partial_cmp(&self, other: &SortedMultiset<T>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for SortedMultiset<T> {
    fn cmp(&self, other: &SortedMultiset<T>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for SortedMultiset<T> {
    /// Creates an empty `SortedMultiset`.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> FromIterator<T> for SortedMultiset<T> {
    /// Sorts the input once and loads it block by block.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_block_capacity(iter, DEFAULT_BLOCK_CAPACITY)
    }
}

impl<T: Clone + Ord> Extend<T> for SortedMultiset<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |elem| {
            self.insert(elem);
        });
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for SortedMultiset<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Clone + Ord, const N: usize> From<[T; N]> for SortedMultiset<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> IntoIterator for SortedMultiset<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `SortedMultiset`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_multiset::SortedMultiset;
    ///
    /// let set = SortedMultiset::from([4, 1, 4]);
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 4, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            remaining: self.len,
            blocks: self.store.into_blocks().into_iter(),
            front: Vec::new().into_iter(),
            back: Vec::new().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a SortedMultiset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(elt) = self.front.next() {
                self.remaining -= 1;
                return Some(elt);
            }
            if let Some(block) = self.blocks.next() {
                self.front = block.as_slice().iter();
            } else {
                let elt = self.back.next();
                if elt.is_some() {
                    self.remaining -= 1;
                }
                return elt;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        loop {
            if let Some(elt) = self.back.next_back() {
                self.remaining -= 1;
                return Some(elt);
            }
            if let Some(block) = self.blocks.next_back() {
                self.back = block.as_slice().iter();
            } else {
                let elt = self.front.next_back();
                if elt.is_some() {
                    self.remaining -= 1;
                }
                return elt;
            }
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            blocks: self.blocks.clone(),
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `ranked_multiset::sorted_multiset::Iter`.
    ///
    /// ```
    /// # use ranked_multiset::sorted_multiset;
    /// let iter: sorted_multiset::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            blocks: slice::Iter::default(),
            front: slice::Iter::default(),
            back: slice::Iter::default(),
            remaining: 0,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if let Some(elt) = self.front.next() {
                self.remaining -= 1;
                return Some(elt);
            }
            if let Some(block) = self.blocks.next() {
                self.front = block.into_vec().into_iter();
            } else {
                let elt = self.back.next();
                if elt.is_some() {
                    self.remaining -= 1;
                }
                return elt;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        loop {
            if let Some(elt) = self.back.next_back() {
                self.remaining -= 1;
                return Some(elt);
            }
            if let Some(block) = self.blocks.next_back() {
                self.back = block.into_vec().into_iter();
            } else {
                let elt = self.front.next_back();
                if elt.is_some() {
                    self.remaining -= 1;
                }
                return elt;
            }
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.remaining).finish_non_exhaustive()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `ranked_multiset::sorted_multiset::IntoIter`.
    ///
    /// ```
    /// # use ranked_multiset::sorted_multiset;
    /// let iter: sorted_multiset::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            blocks: Vec::new().into_iter(),
            front: Vec::new().into_iter(),
            back: Vec::new().into_iter(),
            remaining: 0,
        }
    }
}
