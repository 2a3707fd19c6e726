//! A sorted, rank-indexed multiset for Rust.
//!
//! This crate provides [`SortedMultiset`], a container that keeps a multiset of totally ordered
//! values in ascending order and answers order-statistic queries quickly:
//!
//! - [`get`](SortedMultiset::get) - Get the element at a given sorted position (negative ranks
//!   count from the end)
//! - [`rank_lower`](SortedMultiset::rank_lower) / [`rank_upper`](SortedMultiset::rank_upper) -
//!   Count the elements `<` / `<=` a value
//! - [`count`](SortedMultiset::count) - Count the occurrences of a value
//! - [`remove_at_rank`](SortedMultiset::remove_at_rank) - Remove the element at a sorted position
//! - Indexing by [`Rank`] - e.g., `set[Rank(0)]` for the smallest element
//!
//! # Example
//!
//! ```
//! use ranked_multiset::{Error, Rank, SortedMultiset};
//!
//! let mut latencies = SortedMultiset::new();
//! for ms in [12, 7, 30, 7, 18] {
//!     latencies.insert(ms);
//! }
//!
//! // The median is the element at rank len / 2.
//! assert_eq!(latencies[Rank(latencies.len() / 2)], 12);
//!
//! // How many requests took at most 12ms?
//! assert_eq!(latencies.rank_upper(&12), 3);
//! assert_eq!(latencies.count(&7), 2);
//!
//! // Rank accessors report out-of-range ranks instead of clamping.
//! assert_eq!(latencies.get(-1), Ok(&30));
//! assert_eq!(latencies.get(5), Err(Error::OutOfRange { rank: 5, len: 5 }));
//!
//! // Removing an absent value is a no-op.
//! latencies.discard(&100);
//! assert_eq!(latencies.len(), 5);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) rank operations** - Rank translation through a Fenwick tree over block sizes
//! - **Cache-efficient** - Elements live in contiguous sorted blocks
//!
//! # Implementation
//!
//! The multiset is a two-level block decomposition. Elements are stored in small sorted blocks
//! whose concatenation is the whole sorted sequence. A macro index holding the first element of
//! every block but the first routes value lookups to a block by binary search, and a Fenwick tree
//! over the block sizes converts between a global rank and a `(block, offset)` pair. Blocks are
//! split when they reach the block capacity and merged with their right neighbor when they fall
//! below a quarter of it. Both derived indexes are rebuilt whenever the number of blocks changes
//! and patched in place otherwise.

#![cfg_attr(not(test), no_std)]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod sorted_multiset;

pub use error::{Error, Result};
pub use order_statistic::Rank;
pub use sorted_multiset::SortedMultiset;
