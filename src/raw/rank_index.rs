use alloc::vec::Vec;

/// Fenwick tree over block occupancy counts.
///
/// Slot `i` holds the number of keys in block `i`. The tree is stored 0-indexed: `tree[i]` covers
/// the slots `(i & (i + 1))..=i`.
#[derive(Clone, Debug, Default)]
pub(crate) struct RankIndex {
    tree: Vec<usize>,
}

impl RankIndex {
    /// Builds the index from per-slot counts in O(n).
    pub(crate) fn from_sizes<I>(sizes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut tree: Vec<usize> = sizes.into_iter().collect();
        let len = tree.len();

        for i in 0..len {
            let parent = i | (i + 1);
            if parent < len {
                tree[parent] += tree[i];
            }
        }

        Self {
            tree,
        }
    }

    /// Returns the number of slots.
    pub(crate) fn len(&self) -> usize {
        self.tree.len()
    }

    /// Adds `delta` to slot `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds or if the slot would become negative.
    pub(crate) fn update(&mut self, slot: usize, delta: isize) {
        assert!(slot < self.len(), "`RankIndex::update()` - `slot` out of bounds!");
        let mut i = slot;
        while i < self.tree.len() {
            self.tree[i] = self.tree[i].checked_add_signed(delta).expect("`RankIndex::update()` - slot count underflow!");
            i |= i + 1;
        }
    }

    /// Returns the sum of slots `[0, end)`.
    pub(crate) fn prefix_sum(&self, end: usize) -> usize {
        debug_assert!(end <= self.tree.len(), "`RankIndex::prefix_sum()` - `end` out of bounds!");
        let mut end = end;
        let mut sum = 0;
        while end > 0 {
            sum += self.tree[end - 1];
            end &= end - 1;
        }
        sum
    }

    /// Returns the sum of all slots.
    pub(crate) fn total(&self) -> usize {
        self.prefix_sum(self.tree.len())
    }

    /// Translates a global rank into `(slot, offset)`.
    ///
    /// Descends from the highest power of two not exceeding the slot count, taking a step only when
    /// the covered prefix does not pass `rank`. The result satisfies
    /// `prefix_sum(slot) + offset == rank` and `offset < size(slot)` whenever `rank < total()`.
    pub(crate) fn find_kth(&self, rank: usize) -> (usize, usize) {
        debug_assert!(rank < self.total(), "`RankIndex::find_kth()` - `rank` out of bounds!");
        let len = self.tree.len();
        let mut remaining = rank;
        // Number of slots fully consumed so far.
        let mut pos = 0;

        let mut step = if len == 0 {
            0
        } else {
            1 << len.ilog2()
        };
        while step > 0 {
            let next = pos + step;
            if next <= len && self.tree[next - 1] <= remaining {
                pos = next;
                remaining -= self.tree[next - 1];
            }
            step >>= 1;
        }

        (pos, remaining)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prefix_sums_of_small_index() {
        let index = RankIndex::from_sizes([3, 0, 5, 2]);
        assert_eq!(index.len(), 4);
        assert_eq!(index.prefix_sum(0), 0);
        assert_eq!(index.prefix_sum(1), 3);
        assert_eq!(index.prefix_sum(2), 3);
        assert_eq!(index.prefix_sum(3), 8);
        assert_eq!(index.prefix_sum(4), 10);
        assert_eq!(index.total(), 10);
    }

    #[test]
    fn find_kth_skips_empty_slots() {
        let index = RankIndex::from_sizes([3, 0, 5, 2]);
        assert_eq!(index.find_kth(0), (0, 0));
        assert_eq!(index.find_kth(2), (0, 2));
        assert_eq!(index.find_kth(3), (2, 0));
        assert_eq!(index.find_kth(7), (2, 4));
        assert_eq!(index.find_kth(8), (3, 0));
        assert_eq!(index.find_kth(9), (3, 1));
    }

    #[test]
    fn update_accepts_negative_deltas() {
        let mut index = RankIndex::from_sizes([4, 4, 4]);
        index.update(1, -3);
        assert_eq!(index.prefix_sum(2), 5);
        assert_eq!(index.total(), 9);
        assert_eq!(index.find_kth(4), (1, 0));
        assert_eq!(index.find_kth(5), (2, 0));

        index.update(1, -1);
        assert_eq!(index.find_kth(4), (2, 0));
    }

    #[test]
    #[should_panic(expected = "`RankIndex::update()` - slot count underflow!")]
    fn update_below_zero_panics() {
        let mut index = RankIndex::from_sizes([1, 2]);
        index.update(0, -2);
    }

    #[test]
    fn empty_index_has_zero_total() {
        let index = RankIndex::from_sizes(core::iter::empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
    }

    proptest! {
        #[test]
        fn matches_naive_prefix_sums(
            sizes in prop::collection::vec(0usize..50, 1..200),
            updates in prop::collection::vec((any::<usize>(), 0usize..20), 0..100),
        ) {
            let mut model = sizes.clone();
            let mut index = RankIndex::from_sizes(sizes);

            for (which, value) in updates {
                let slot = which % model.len();
                #[allow(clippy::cast_possible_wrap)]
                let delta = value as isize - model[slot] as isize;
                index.update(slot, delta);
                model[slot] = value;
            }

            let mut running = 0;
            for (slot, &size) in model.iter().enumerate() {
                prop_assert_eq!(index.prefix_sum(slot), running);
                running += size;
            }
            prop_assert_eq!(index.total(), running);

            for rank in 0..running {
                let (slot, offset) = index.find_kth(rank);
                prop_assert_eq!(index.prefix_sum(slot) + offset, rank);
                prop_assert!(offset < model[slot], "offset {} not inside slot {} of size {}", offset, slot, model[slot]);
            }
        }
    }
}
