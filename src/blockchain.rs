//! Chain collaborator contract and block types
//!
//! The RPC layer reads the chain only through [`Blockchain`]. The storage and
//! consensus engine behind it is not this crate's concern; [`MemoryChain`] is a
//! reference implementation used by the node binary and the tests.

pub mod block;
pub mod memory;

pub use block::*;
pub use memory::MemoryChain;

use crate::query::Query;

/// Read access to a chain. Implementations may block.
pub trait Blockchain: Send + Sync {
    /// Bodies of the blocks selected by `query`, in chain order.
    fn block_bodies(&self, query: &Query) -> Vec<BlockBody>;

    /// The chain tip. A chain always holds at least its genesis block.
    fn last_block(&self) -> Block;

    /// Headers of the blocks selected by `query`, in chain order.
    fn block_headers(&self, query: &Query) -> Vec<BlockHeader>;

    fn block_by_hash(&self, hash: &str) -> Option<Block>;

    /// Look up a block by height. The height arrives as text; parsing it is
    /// up to the implementation.
    fn block_by_number(&self, number: &str) -> Option<Block>;
}
