//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the voting engine (vote storage, capability checks,
//! checkpointed balances) sits behind a trait. This crate provides
//! implementations that:
//! - Live entirely in memory
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! `MemoryVoteStore` is also the store the execution environment runs on.

pub mod balances;
pub mod gate;
pub mod store;

pub use balances::NullBalances;
pub use gate::NullGate;
pub use store::MemoryVoteStore;
