use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("auth error: {0}")]
    Auth(#[from] agora_auth::AuthError),

    #[error("token error: {0}")]
    Token(#[from] agora_token::TokenError),

    #[error("governance error: {0}")]
    Governance(#[from] agora_governance::GovernanceError),

    #[error("invalid input: {0}")]
    Types(#[from] agora_types::TypesError),

    #[error("store error: {0}")]
    Store(#[from] agora_store::StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainError {
    /// Numeric error code of a failed transaction, if the failing component defines one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Token(e) => Some(e.code()),
            Self::Governance(e) => e.code(),
            _ => None,
        }
    }
}
