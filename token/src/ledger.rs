//! Fungible governance token with checkpointed balances.

use agora_auth::CapabilityGate;
use agora_store::BalanceCheckpoints;
use agora_types::{ActionName, BlockHeight, Principal, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::{CheckpointHistory, TokenError, TokenEvent};

/// Governance token ledger.
///
/// Every balance change is written as a checkpoint for the block it happens
/// in; writes must never go back in height.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckpointedLedger {
    address: Principal,
    balances: BTreeMap<Principal, CheckpointHistory>,
    total_supply: TokenAmount,
    last_write: BlockHeight,
}

impl CheckpointedLedger {
    pub const NAME: &'static str = "token";
    pub const SYMBOL: &'static str = "token";
    pub const DECIMALS: u8 = 0;
    pub const MINT_ACTION: &'static str = "mint";

    /// An empty ledger deployed at `address`.
    pub fn new(address: Principal) -> Self {
        Self {
            address,
            balances: BTreeMap::new(),
            total_supply: TokenAmount::ZERO,
            last_write: BlockHeight::GENESIS,
        }
    }

    pub fn address(&self) -> &Principal {
        &self.address
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn symbol(&self) -> &'static str {
        Self::SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        Self::DECIMALS
    }

    pub fn token_uri(&self) -> Option<&'static str> {
        Some("")
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    /// Live balance, including changes made earlier in the current block.
    pub fn balance_of(&self, who: &Principal) -> TokenAmount {
        self.balances
            .get(who)
            .map(CheckpointHistory::latest)
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Balance at the end of block `height`.
    pub fn balance_at(&self, who: &Principal, height: BlockHeight) -> TokenAmount {
        self.balances
            .get(who)
            .map(|history| history.at(height))
            .unwrap_or(TokenAmount::ZERO)
    }

    pub fn history(&self, who: &Principal) -> Option<&CheckpointHistory> {
        self.balances.get(who)
    }

    /// Mint `amount` to `recipient`. Requires the `mint` capability on this token.
    pub fn mint(
        &mut self,
        gate: &impl CapabilityGate,
        sender: &Principal,
        amount: TokenAmount,
        recipient: &Principal,
        height: BlockHeight,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let action = ActionName::new(Self::MINT_ACTION);
        if let Err(denied) = gate.require(sender, &self.address, &action) {
            debug!(%denied, "mint denied");
            return Err(TokenError::NotAuthorized);
        }
        self.force_mint(amount, recipient, height)
    }

    /// Mint without an authorization check. Used for genesis allocations and tests.
    pub fn force_mint(
        &mut self,
        amount: TokenAmount,
        recipient: &Principal,
        height: BlockHeight,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.ensure_writable(height)?;
        if amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(recipient)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.write(recipient, height, balance)?;
        self.total_supply = supply;
        debug!(%recipient, %amount, %height, "minted");
        Ok(vec![TokenEvent::Mint {
            amount,
            recipient: recipient.clone(),
        }])
    }

    /// Move `amount` from `from` to `to`. Only `from` itself may send.
    pub fn transfer(
        &mut self,
        sender: &Principal,
        amount: TokenAmount,
        from: &Principal,
        to: &Principal,
        memo: Option<Vec<u8>>,
        height: BlockHeight,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        if sender != from {
            return Err(TokenError::NotAuthorized);
        }
        self.ensure_writable(height)?;
        if amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }
        if from == to {
            return Err(TokenError::SelfTransfer);
        }
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.write(from, height, remaining)?;
        self.write(to, height, credited)?;
        debug!(%from, %to, %amount, %height, "transferred");

        let mut events = vec![TokenEvent::Transfer {
            amount,
            sender: from.clone(),
            recipient: to.clone(),
        }];
        if let Some(memo) = memo {
            events.push(TokenEvent::Print {
                contract: self.address.clone(),
                memo,
            });
        }
        Ok(events)
    }

    fn ensure_writable(&self, height: BlockHeight) -> Result<(), TokenError> {
        if height < self.last_write {
            return Err(TokenError::StaleHeight {
                latest: self.last_write,
                attempted: height,
            });
        }
        Ok(())
    }

    fn write(
        &mut self,
        who: &Principal,
        height: BlockHeight,
        balance: TokenAmount,
    ) -> Result<(), TokenError> {
        self.balances
            .entry(who.clone())
            .or_default()
            .record(height, balance)?;
        self.last_write = height;
        Ok(())
    }
}

impl BalanceCheckpoints for CheckpointedLedger {
    fn checkpointed_balance(&self, who: &Principal, as_of: BlockHeight) -> TokenAmount {
        self.balance_at(who, as_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::NullGate;

    fn principal(name: &str) -> Principal {
        Principal::new(name)
    }

    fn ledger() -> CheckpointedLedger {
        CheckpointedLedger::new(principal("deployer.token"))
    }

    fn h(n: u64) -> BlockHeight {
        BlockHeight::new(n)
    }

    fn amt(n: u128) -> TokenAmount {
        TokenAmount::new(n)
    }

    #[test]
    fn metadata_matches_deployment() {
        let ledger = ledger();
        assert_eq!(ledger.name(), "token");
        assert_eq!(ledger.symbol(), "token");
        assert_eq!(ledger.decimals(), 0);
        assert_eq!(ledger.token_uri(), Some(""));
        assert_eq!(ledger.total_supply(), TokenAmount::ZERO);
    }

    #[test]
    fn unknown_principal_has_zero_balance() {
        assert_eq!(ledger().balance_of(&principal("wallet_5")), TokenAmount::ZERO);
    }

    #[test]
    fn force_mint_credits_balance_and_supply() {
        let mut ledger = ledger();
        let wallet = principal("wallet_5");
        let events = ledger.force_mint(amt(200), &wallet, h(1)).unwrap();
        assert_eq!(ledger.balance_of(&wallet), amt(200));
        assert_eq!(ledger.total_supply(), amt(200));
        assert_eq!(events, vec![TokenEvent::Mint { amount: amt(200), recipient: wallet }]);
    }

    #[test]
    fn mint_requires_capability() {
        let mut ledger = ledger();
        let sender = principal("wallet_3");
        let recipient = principal("wallet_5");

        let denied = ledger.mint(&NullGate::deny_all(), &sender, amt(2831), &recipient, h(1));
        assert_eq!(denied, Err(TokenError::NotAuthorized));
        assert_eq!(denied.unwrap_err().code(), 1001);

        let gate = NullGate::deny_all().with(
            &sender,
            &principal("deployer.token"),
            &ActionName::new("mint"),
        );
        let events = ledger.mint(&gate, &sender, amt(2831), &recipient, h(2)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(ledger.balance_of(&recipient), amt(2831));
    }

    #[test]
    fn transfer_by_someone_else_is_not_authorized() {
        let mut ledger = ledger();
        let from = principal("wallet_1");
        let to = principal("wallet_2");
        ledger.force_mint(amt(10), &from, h(1)).unwrap();
        let err = ledger
            .transfer(&principal("deployer"), amt(10), &from, &to, None, h(2))
            .unwrap_err();
        assert_eq!(err.code(), 1001);
    }

    #[test]
    fn transfer_moves_balance_and_prints_memo() {
        let mut ledger = ledger();
        let from = principal("wallet_1");
        let to = principal("wallet_2");
        ledger.force_mint(amt(100), &from, h(1)).unwrap();

        let events = ledger
            .transfer(&from, amt(10), &from, &to, Some(b"hello".to_vec()), h(2))
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            TokenEvent::Print { contract: principal("deployer.token"), memo: b"hello".to_vec() }
        );
        assert_eq!(ledger.balance_of(&from), amt(90));
        assert_eq!(ledger.balance_of(&to), amt(10));
        assert_eq!(ledger.total_supply(), amt(100));
    }

    #[test]
    fn transfer_rejects_overdraft_self_and_zero() {
        let mut ledger = ledger();
        let from = principal("wallet_1");
        ledger.force_mint(amt(5), &from, h(1)).unwrap();
        let to = principal("wallet_2");

        assert!(matches!(
            ledger.transfer(&from, amt(6), &from, &to, None, h(2)),
            Err(TokenError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.transfer(&from, amt(1), &from, &from, None, h(2)), Err(TokenError::SelfTransfer));
        assert_eq!(ledger.transfer(&from, amt(0), &from, &to, None, h(2)), Err(TokenError::ZeroAmount));
        assert_eq!(ledger.balance_of(&from), amt(5));
    }

    #[test]
    fn checkpoints_hide_same_block_changes_from_the_previous_height() {
        let mut ledger = ledger();
        let voter = principal("wallet_4");
        ledger.force_mint(amt(10), &voter, h(3)).unwrap();
        ledger.force_mint(amt(10), &voter, h(4)).unwrap();

        assert_eq!(ledger.balance_of(&voter), amt(20));
        assert_eq!(ledger.checkpointed_balance(&voter, h(3)), amt(10));
        assert_eq!(ledger.checkpointed_balance(&voter, h(2)), amt(0));
        assert_eq!(ledger.history(&voter).map(|h| h.len()), Some(2));
    }

    #[test]
    fn writes_behind_the_current_height_are_rejected() {
        let mut ledger = ledger();
        ledger.force_mint(amt(1), &principal("a"), h(5)).unwrap();
        assert!(matches!(
            ledger.force_mint(amt(1), &principal("b"), h(4)),
            Err(TokenError::StaleHeight { .. })
        ));
        assert_eq!(ledger.total_supply(), amt(1));
    }
}
