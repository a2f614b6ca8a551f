//! Abstract storage traits for the Agora governance core.
//!
//! Every storage backend (the in-memory one in `agora-nullables`, or a
//! persistent one) implements these traits. The engines depend only on them.

pub mod balance;
pub mod error;
pub mod vote;

pub use balance::BalanceCheckpoints;
pub use error::StoreError;
pub use vote::{Side, TallyDelta, Vote, VoteOp, VoteStore, VoteWriteBatch, VoterRecord};
