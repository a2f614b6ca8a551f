//! Execution environment for the governance core.
//!
//! A [`Chain`] groups transactions into blocks, executes them strictly in the
//! order given, and advances the block height by one per block. Effects of a
//! transaction are visible to later transactions in the same block, except
//! to stake snapshots, which read the checkpoint of the previous block.

pub mod chain;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod tracing_spans;
pub mod tx;

pub use chain::Chain;
pub use config::{ChainConfig, GenesisBalance, GenesisConfig, GenesisGrant};
pub use error::ChainError;
pub use snapshot::ChainSnapshot;
pub use tx::{Block, Receipt, ReceiptSummary, Tx, TxOutput};
