mod block;
mod block_store;
mod rank_index;

pub(crate) use block::Block;
pub(crate) use block_store::{Bisect, BlockStore};
