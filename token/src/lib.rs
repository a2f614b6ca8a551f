//! Governance token ledger.
//!
//! Balances are kept as a history of per-block checkpoints so that any
//! component can ask "what did this principal hold at the end of block N"
//! without seeing changes made later, including earlier in the current block.

pub mod checkpoint;
pub mod error;
pub mod event;
pub mod ledger;

pub use checkpoint::{Checkpoint, CheckpointHistory};
pub use error::TokenError;
pub use event::TokenEvent;
pub use ledger::CheckpointedLedger;
