//! Nullable balances: scripted checkpointed balances for testing.

use agora_store::BalanceCheckpoints;
use agora_types::{BlockHeight, Principal, TokenAmount};
use std::collections::HashMap;
use std::sync::Mutex;

/// Checkpointed balances set directly by the test.
///
/// `set(who, height, amount)` means "from the end of block `height` on,
/// `who` holds `amount`". Every query is recorded so tests can assert which
/// heights the code under test asked for.
#[derive(Debug, Default)]
pub struct NullBalances {
    checkpoints: HashMap<Principal, Vec<(BlockHeight, TokenAmount)>>,
    queries: Mutex<Vec<(Principal, BlockHeight)>>,
}

impl NullBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, who: &Principal, height: BlockHeight, amount: TokenAmount) -> &mut Self {
        let entries = self.checkpoints.entry(who.clone()).or_default();
        entries.retain(|(h, _)| *h != height);
        entries.push((height, amount));
        entries.sort_by_key(|(h, _)| *h);
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<(Principal, BlockHeight)> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl BalanceCheckpoints for NullBalances {
    fn checkpointed_balance(&self, who: &Principal, as_of: BlockHeight) -> TokenAmount {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((who.clone(), as_of));
        }
        self.checkpoints
            .get(who)
            .and_then(|entries| entries.iter().rev().find(|(h, _)| *h <= as_of))
            .map(|(_, amount)| *amount)
            .unwrap_or(TokenAmount::ZERO)
    }
}
