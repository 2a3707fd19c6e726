use core::borrow::Borrow;

use alloc::vec::Vec;

/// A contiguous, ascending run of keys.
///
/// Blocks own their keys exclusively; merging moves keys from one block into another.
#[derive(Clone, Debug, Default)]
pub(crate) struct Block<T> {
    keys: Vec<T>,
}

impl<T> Block<T> {
    /// Creates a new empty block.
    pub(crate) const fn new() -> Self {
        Self {
            keys: Vec::new(),
        }
    }

    /// Wraps keys that are already sorted.
    pub(crate) fn from_sorted(keys: Vec<T>) -> Self {
        Self {
            keys,
        }
    }

    /// Returns the number of keys in this block.
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the block holds no keys.
    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.keys.first()
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.keys.last()
    }

    /// Returns the key at `offset`.
    pub(crate) fn key(&self, offset: usize) -> &T {
        &self.keys[offset]
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.keys
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.keys
    }

    /// Number of keys strictly less than `key`.
    pub(crate) fn lower_offset<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.partition_point(|k| k.borrow() < key)
    }

    /// Number of keys less than or equal to `key`.
    pub(crate) fn upper_offset<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.partition_point(|k| k.borrow() <= key)
    }

    /// Inserts `key` after every equal key already in the block and returns its offset.
    pub(crate) fn insert(&mut self, key: T) -> usize
    where
        T: Ord,
    {
        let offset = self.upper_offset(&key);
        self.keys.insert(offset, key);
        offset
    }

    pub(crate) fn remove(&mut self, offset: usize) -> T {
        self.keys.remove(offset)
    }

    /// Splits the block at its midpoint. `self` keeps the larger half.
    pub(crate) fn split(&mut self) -> Self {
        let mid = self.keys.len().div_ceil(2);
        Self {
            keys: self.keys.split_off(mid),
        }
    }

    /// Moves every key of `other` to the end of this block.
    pub(crate) fn append(&mut self, other: Self) {
        let mut other = other.keys;
        self.keys.append(&mut other);
    }
}
