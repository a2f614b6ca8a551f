//! Errors raised while constructing core types from untrusted input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid principal: {0:?}")]
    InvalidPrincipal(String),

    #[error("invalid action name: {0:?}")]
    InvalidAction(String),
}
