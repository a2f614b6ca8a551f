use agora_types::{ActionName, Principal};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{grantee} may not call {action} on {target}")]
    NotAuthorized {
        grantee: Principal,
        target: Principal,
        action: ActionName,
    },
}
