//! Events emitted by ledger operations.

use agora_types::{Principal, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenEvent {
    Mint {
        amount: TokenAmount,
        recipient: Principal,
    },
    Transfer {
        amount: TokenAmount,
        sender: Principal,
        recipient: Principal,
    },
    /// A memo attached to a transfer.
    Print { contract: Principal, memo: Vec<u8> },
}
