//! Fundamental types for the Agora governance core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! principals, action names, block heights, vote ids and token amounts.

pub mod action;
pub mod amount;
pub mod error;
pub mod height;
pub mod id;
pub mod principal;

pub use action::ActionName;
pub use amount::TokenAmount;
pub use error::TypesError;
pub use height::BlockHeight;
pub use id::VoteId;
pub use principal::Principal;
