use agora_types::{BlockHeight, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("sender is not authorized")]
    NotAuthorized,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("sender and recipient are the same principal")]
    SelfTransfer,

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("token supply overflow")]
    Overflow,

    #[error("checkpoint at {attempted} precedes latest checkpoint at {latest}")]
    StaleHeight {
        latest: BlockHeight,
        attempted: BlockHeight,
    },
}

impl TokenError {
    /// Numeric error code reported to callers.
    ///
    /// Authorization failures use the contract's own code; the rest mirror
    /// the native fungible-token failure codes.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotAuthorized => 1001,
            Self::InsufficientBalance { .. } | Self::Overflow => 1,
            Self::SelfTransfer => 2,
            Self::ZeroAmount => 3,
            Self::StaleHeight { .. } => 4,
        }
    }
}
