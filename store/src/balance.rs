//! Checkpointed balance query consumed by the voting engine.

use agora_types::{BlockHeight, Principal, TokenAmount};

/// Read-only, time-indexed view of governance token balances.
pub trait BalanceCheckpoints {
    /// Balance of `who` as recorded at the end of block `as_of`.
    ///
    /// Changes made in later blocks, including the block currently being
    /// executed when `as_of` precedes it, are not visible.
    fn checkpointed_balance(&self, who: &Principal, as_of: BlockHeight) -> TokenAmount;
}

impl<T: BalanceCheckpoints + ?Sized> BalanceCheckpoints for &T {
    fn checkpointed_balance(&self, who: &Principal, as_of: BlockHeight) -> TokenAmount {
        (**self).checkpointed_balance(who, as_of)
    }
}
