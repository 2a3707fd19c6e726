use thiserror::Error as ThisError;

/// Errors reported by rank-based accessors of a [`SortedMultiset`](crate::SortedMultiset).
///
/// Value-based removal never fails: removing an absent value is a no-op.
#[derive(ThisError, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// The rank, after normalizing a negative rank against the length, is not in `[0, len)`.
    #[error("rank {rank} is out of range for a multiset of length {len}")]
    OutOfRange {
        /// The rank as passed by the caller.
        rank: isize,
        /// Length of the multiset at the time of the call.
        len: usize,
    },
}

/// A specialized [`Result`](core::result::Result) for multiset operations.
pub type Result<T> = core::result::Result<T, Error>;
