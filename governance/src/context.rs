//! Execution context supplied by the environment for each operation.

use agora_types::BlockHeight;

/// Where in the chain an operation executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockContext {
    /// Height of the block currently being executed.
    pub height: BlockHeight,
}

impl BlockContext {
    pub fn new(height: BlockHeight) -> Self {
        Self { height }
    }

    pub fn at(height: u64) -> Self {
        Self::new(BlockHeight::new(height))
    }

    /// The checkpoint first ballots read stake from: the end of the previous
    /// block. `None` while executing genesis.
    pub fn stake_checkpoint(&self) -> Option<BlockHeight> {
        self.height.previous()
    }
}
