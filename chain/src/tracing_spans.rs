//! Pre-built [`tracing::Span`] constructors for chain execution.
//!
//! Consistent span names and fields make it easy to filter a run's log by
//! block or by transaction.

use agora_types::BlockHeight;
use tracing::{info_span, Span};

/// Span covering the execution of every transaction in one block.
pub fn block_span(height: BlockHeight, tx_count: usize) -> Span {
    info_span!("block", height = %height, txs = tx_count)
}

/// Span covering a single transaction.
pub fn tx_span(index: usize, op: &str) -> Span {
    info_span!("tx", index, op = %op)
}
