//! Per-principal balance history.

use agora_types::{BlockHeight, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::TokenError;

/// Balance held at the end of block `height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub height: BlockHeight,
    pub balance: TokenAmount,
}

/// Checkpoints sorted by strictly increasing height, at most one per block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHistory {
    entries: Vec<Checkpoint>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent balance.
    pub fn latest(&self) -> TokenAmount {
        self.entries
            .last()
            .map(|c| c.balance)
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Balance at the end of block `height`: the last checkpoint at or below it.
    pub fn at(&self, height: BlockHeight) -> TokenAmount {
        let idx = self.entries.partition_point(|c| c.height <= height);
        idx.checked_sub(1)
            .map(|i| self.entries[i].balance)
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Record `balance` as of block `height`.
    ///
    /// A second write in the same block replaces that block's checkpoint.
    pub fn record(&mut self, height: BlockHeight, balance: TokenAmount) -> Result<(), TokenError> {
        match self.entries.last_mut() {
            Some(last) if last.height == height => last.balance = balance,
            Some(last) if last.height > height => {
                return Err(TokenError::StaleHeight {
                    latest: last.height,
                    attempted: height,
                })
            }
            _ => self.entries.push(Checkpoint { height, balance }),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
