use core::borrow::Borrow;

use alloc::vec;
use alloc::vec::Vec;
use log::trace;

use super::block::Block;
use super::rank_index::RankIndex;

/// Which side of a run of equal keys a search should land on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Bisect {
    /// Before every key equal to the searched key.
    Left,
    /// After every key equal to the searched key.
    Right,
}

/// The block decomposition backing `SortedMultiset`.
///
/// The derived state follows one rule: it is rebuilt from scratch whenever the number of blocks
/// changes (split, merge, removal of an empty block) and patched in place when only the size or the
/// first key of a single block changes.
#[derive(Clone, Debug)]
pub(crate) struct BlockStore<T> {
    /// Sorted blocks; concatenated in order they form the whole sequence. Never empty: an empty
    /// store is a single empty block.
    blocks: Vec<Block<T>>,
    /// `macro_index[i]` is the first key of `blocks[i + 1]`.
    macro_index: Vec<T>,
    /// Occupancy of every block, for rank translation.
    rank_index: RankIndex,
    /// A block reaching this many keys is split.
    capacity: usize,
}

impl<T> BlockStore<T> {
    /// Creates an empty store.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 2, "`BlockStore::new()` - `capacity` < 2!");
        Self {
            blocks: vec![Block::new()],
            macro_index: Vec::new(),
            rank_index: RankIndex::from_sizes([0]),
            capacity,
        }
    }

    /// Returns the split threshold.
    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the size below which a block is merged with its right neighbor.
    pub(crate) const fn merge_threshold(&self) -> usize {
        self.capacity / 4
    }

    pub(crate) fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn blocks(&self) -> &[Block<T>] {
        &self.blocks
    }

    pub(crate) fn into_blocks(self) -> Vec<Block<T>> {
        self.blocks
    }

    /// Returns the number of keys stored before block `index`.
    fn keys_before(&self, index: usize) -> usize {
        self.rank_index.prefix_sum(index)
    }

    /// Translates a global rank into `(block, offset)`.
    pub(crate) fn locate_by_rank(&self, rank: usize) -> (usize, usize) {
        self.rank_index.find_kth(rank)
    }

    pub(crate) fn get(&self, index: usize, offset: usize) -> &T {
        self.blocks[index].key(offset)
    }

    /// Drops every key, returning to a single empty block.
    pub(crate) fn clear(&mut self) {
        trace!("clearing {} blocks, keeping a single empty block", self.blocks.len());
        self.blocks.clear();
        self.blocks.push(Block::new());
        self.macro_index.clear();
        self.rank_index = RankIndex::from_sizes([0]);
    }
}

impl<T: Clone + Ord> BlockStore<T> {
    /// Builds a store from keys that are already sorted.
    ///
    /// Blocks are loaded with `capacity - 1` keys each.
    pub(crate) fn from_sorted(keys: Vec<T>, capacity: usize) -> Self {
        debug_assert!(capacity >= 2, "`BlockStore::from_sorted()` - `capacity` < 2!");
        debug_assert!(keys.is_sorted(), "`BlockStore::from_sorted()` - `keys` are not sorted!");
        let load = capacity - 1;
        let mut blocks = Vec::with_capacity(keys.len().div_ceil(load).max(1));
        let mut keys = keys.into_iter();
        loop {
            let chunk: Vec<T> = keys.by_ref().take(load).collect();
            if chunk.is_empty() {
                break;
            }
            blocks.push(Block::from_sorted(chunk));
        }
        if blocks.is_empty() {
            blocks.push(Block::new());
        }

        let mut store = Self {
            blocks,
            macro_index: Vec::new(),
            rank_index: RankIndex::default(),
            capacity,
        };
        store.rebuild();
        store
    }

    /// Returns the index of the block a search for `key` should start in.
    ///
    /// With [`Bisect::Left`] every key before the returned block is less than `key`; with
    /// [`Bisect::Right`] every key after it is greater than `key`.
    pub(crate) fn locate_by_key<Q>(&self, key: &Q, bisect: Bisect) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let index = match bisect {
            Bisect::Left => self.macro_index.partition_point(|first| first.borrow() < key),
            Bisect::Right => self.macro_index.partition_point(|first| first.borrow() <= key),
        };
        index.min(self.blocks.len() - 1)
    }

    /// Returns the number of keys strictly less than (`Left`) or not greater than (`Right`) `key`.
    pub(crate) fn rank_by_key<Q>(&self, key: &Q, bisect: Bisect) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let index = self.locate_by_key(key, bisect);
        let block = &self.blocks[index];
        let offset = match bisect {
            Bisect::Left => block.lower_offset(key),
            Bisect::Right => block.upper_offset(key),
        };
        self.keys_before(index) + offset
    }

    /// Finds the position of the first key equal to `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut index = self.locate_by_key(key, Bisect::Left);
        let mut offset = self.blocks[index].lower_offset(key);
        // Every key of the candidate block is less than `key`; the first match, if any, opens the
        // next block.
        if offset == self.blocks[index].len() && index + 1 < self.blocks.len() {
            index += 1;
            offset = 0;
        }

        let block = &self.blocks[index];
        (offset < block.len() && block.key(offset).borrow() == key).then_some((index, offset))
    }

    /// Inserts `key` after every equal key already stored.
    pub(crate) fn insert(&mut self, key: T) {
        let index = self.locate_by_key(&key, Bisect::Right);
        self.insert_into(index, key);
    }

    /// Inserts `key` into block `index`, splitting the block if it reaches capacity.
    fn insert_into(&mut self, index: usize, key: T) {
        let offset = self.blocks[index].insert(key);
        self.rank_index.update(index, 1);

        // Right-bisect routing never lands a key at offset 0 of a block after the first, so only a
        // split can move a block boundary.
        debug_assert!(offset > 0 || index == 0, "`BlockStore::insert_into()` - key routed before a block boundary!");
        if self.blocks[index].len() >= self.capacity {
            self.split(index);
            self.rebuild();
        }
    }

    /// Removes and returns the key at `offset` in block `index`.
    ///
    /// An emptied block is deleted. A block that drops below the merge threshold absorbs its right
    /// neighbor, and the result is split again if it reached capacity.
    pub(crate) fn remove_at(&mut self, index: usize, offset: usize) -> T {
        let key = self.blocks[index].remove(offset);
        self.rank_index.update(index, -1);

        if self.blocks[index].is_empty() {
            self.remove_block(index);
            self.rebuild();
        } else if self.blocks[index].len() < self.merge_threshold() && index + 1 < self.blocks.len() {
            self.merge_with_next(index);
            self.rebuild();
        } else if offset == 0 && index > 0 {
            self.macro_index[index - 1] = self.blocks[index].key(0).clone();
        }

        key
    }

    fn split(&mut self, index: usize) {
        let right = self.blocks[index].split();
        trace!("split block {index} into {} + {} keys", self.blocks[index].len(), right.len());
        self.blocks.insert(index + 1, right);
    }

    fn merge_with_next(&mut self, index: usize) {
        let next = self.blocks.remove(index + 1);
        self.blocks[index].append(next);
        trace!("merged block {} into block {index}, now {} keys", index + 1, self.blocks[index].len());

        if self.blocks[index].len() >= self.capacity {
            self.split(index);
        }
    }

    fn remove_block(&mut self, index: usize) {
        if self.blocks.len() == 1 {
            trace!("store emptied, keeping a single empty block");
            return;
        }
        trace!("removing empty block {index}");
        self.blocks.remove(index);
    }

    /// Recomputes the macro index and the rank index from the blocks.
    fn rebuild(&mut self) {
        self.macro_index.clear();
        self.macro_index.extend(
            self.blocks[1..]
                .iter()
                .map(|block| block.first().expect("`BlockStore::rebuild()` - empty block after the first!").clone()),
        );
        self.rank_index = RankIndex::from_sizes(self.blocks.iter().map(Block::len));
    }
}
