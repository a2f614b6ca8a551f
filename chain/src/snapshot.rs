//! Serializable snapshot of the complete chain state.

use agora_auth::CapabilityRegistry;
use agora_token::CheckpointedLedger;
use agora_types::{BlockHeight, Principal};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ChainError;

/// Everything needed to resume a chain: registry, ledger, vote tables and height.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub deployer: Principal,
    pub height: BlockHeight,
    pub registry: CapabilityRegistry,
    pub ledger: CheckpointedLedger,
    /// Vote tables, as produced by `MemoryVoteStore::save_state`.
    pub votes: Vec<u8>,
}

impl ChainSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChainError> {
        bincode::serialize(self).map_err(|e| ChainError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ChainError> {
        bincode::deserialize(data).map_err(|e| ChainError::Snapshot(e.to_string()))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ChainError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}
