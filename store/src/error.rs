use agora_types::VoteId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("vote id out of sequence: expected {expected}, got {got}")]
    OutOfSequence { expected: VoteId, got: VoteId },

    #[error("ballot of {voter} on vote {id} changed concurrently")]
    Conflict { id: VoteId, voter: String },

    #[error("tally out of range: {0}")]
    TallyOutOfRange(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
