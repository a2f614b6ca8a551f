use agora_store::StoreError;
use agora_types::{Principal, VoteId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("vote {0} not found")]
    UnknownVote(VoteId),

    #[error("{principal} is not authorized: {reason}")]
    NotAuthorized {
        principal: Principal,
        reason: &'static str,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl GovernanceError {
    pub const ERR_UNKNOWN_VOTE: u32 = 2001;
    pub const ERR_NOT_AUTHORIZED: u32 = 2002;

    /// Numeric error code reported to callers, `None` for storage failures.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::UnknownVote(_) => Some(Self::ERR_UNKNOWN_VOTE),
            Self::NotAuthorized { .. } => Some(Self::ERR_NOT_AUTHORIZED),
            Self::Store(_) => None,
        }
    }
}
