//! Token-weighted governance voting.
//!
//! Holders of the governance token approve or reject proposals. A proposal is
//! either general or task-linked (it names a principal whose approval the
//! vote represents). Creating a proposal requires a capability grant on the
//! voting engine; casting a ballot requires a non-zero stake.
//!
//! Key principle: a voter's stake is the checkpointed balance at the end of
//! the block *before* their first ballot, locked in for the life of the vote.
//! Re-voting only moves that stake between sides.

pub mod context;
pub mod engine;
pub mod error;

pub use context::BlockContext;
pub use engine::{VotingEngine, NEW_TASK_VOTE, NEW_VOTE};
pub use error::GovernanceError;
