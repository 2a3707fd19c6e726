/// A zero-based rank into the sorted order of a multiset.
///
/// Indexing with a `Rank` panics when the rank is out of bounds; use
/// [`SortedMultiset::get`](crate::SortedMultiset::get) for a fallible lookup that also accepts
/// negative ranks.
///
/// # Examples
///
/// ```
/// use ranked_multiset::{Rank, SortedMultiset};
///
/// let set = SortedMultiset::from([20, 10, 20]);
///
/// assert_eq!(set[Rank(0)], 10);
/// assert_eq!(set[Rank(2)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
