//! Transactions, receipts and blocks.

use agora_token::TokenEvent;
use agora_types::{ActionName, BlockHeight, Principal, TokenAmount, VoteId};
use serde::{Deserialize, Serialize};

use crate::ChainError;

/// A state-changing call submitted to the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Tx {
    Grant {
        sender: Principal,
        grantee: Principal,
        target: Principal,
        action: ActionName,
    },
    Revoke {
        sender: Principal,
        grantee: Principal,
        target: Principal,
        action: ActionName,
    },
    NewVote {
        sender: Principal,
    },
    NewTaskVote {
        sender: Principal,
        task: Principal,
    },
    VoteYea {
        sender: Principal,
        id: VoteId,
    },
    VoteNay {
        sender: Principal,
        id: VoteId,
    },
    Mint {
        sender: Principal,
        amount: TokenAmount,
        recipient: Principal,
    },
    /// Unchecked mint, for genesis allocations and test setups.
    ForceMint {
        amount: TokenAmount,
        recipient: Principal,
    },
    Transfer {
        sender: Principal,
        amount: TokenAmount,
        from: Principal,
        to: Principal,
        #[serde(default)]
        memo: Option<String>,
    },
}

impl Tx {
    pub fn grant(
        sender: &Principal,
        grantee: &Principal,
        target: &Principal,
        action: &ActionName,
    ) -> Self {
        Self::Grant {
            sender: sender.clone(),
            grantee: grantee.clone(),
            target: target.clone(),
            action: action.clone(),
        }
    }

    pub fn revoke(
        sender: &Principal,
        grantee: &Principal,
        target: &Principal,
        action: &ActionName,
    ) -> Self {
        Self::Revoke {
            sender: sender.clone(),
            grantee: grantee.clone(),
            target: target.clone(),
            action: action.clone(),
        }
    }

    pub fn new_vote(sender: &Principal) -> Self {
        Self::NewVote {
            sender: sender.clone(),
        }
    }

    pub fn new_task_vote(task: &Principal, sender: &Principal) -> Self {
        Self::NewTaskVote {
            sender: sender.clone(),
            task: task.clone(),
        }
    }

    pub fn vote_yea(id: u64, sender: &Principal) -> Self {
        Self::VoteYea {
            sender: sender.clone(),
            id: VoteId::new(id),
        }
    }

    pub fn vote_nay(id: u64, sender: &Principal) -> Self {
        Self::VoteNay {
            sender: sender.clone(),
            id: VoteId::new(id),
        }
    }

    pub fn mint(amount: u128, recipient: &Principal, sender: &Principal) -> Self {
        Self::Mint {
            sender: sender.clone(),
            amount: TokenAmount::new(amount),
            recipient: recipient.clone(),
        }
    }

    pub fn force_mint(amount: u128, recipient: &Principal) -> Self {
        Self::ForceMint {
            amount: TokenAmount::new(amount),
            recipient: recipient.clone(),
        }
    }

    pub fn transfer(
        amount: u128,
        from: &Principal,
        to: &Principal,
        memo: Option<&str>,
        sender: &Principal,
    ) -> Self {
        Self::Transfer {
            sender: sender.clone(),
            amount: TokenAmount::new(amount),
            from: from.clone(),
            to: to.clone(),
            memo: memo.map(str::to_owned),
        }
    }

    /// Operation name, as used in the `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Grant { .. } => "grant",
            Self::Revoke { .. } => "revoke",
            Self::NewVote { .. } => "new-vote",
            Self::NewTaskVote { .. } => "new-task-vote",
            Self::VoteYea { .. } => "vote-yea",
            Self::VoteNay { .. } => "vote-nay",
            Self::Mint { .. } => "mint",
            Self::ForceMint { .. } => "force-mint",
            Self::Transfer { .. } => "transfer",
        }
    }
}

/// Successful result value of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxOutput {
    Bool(bool),
    VoteId(VoteId),
}

/// Outcome of one transaction in a block.
#[derive(Debug)]
pub struct Receipt {
    pub result: Result<TxOutput, ChainError>,
    pub events: Vec<TokenEvent>,
}

impl Receipt {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn output(&self) -> Option<TxOutput> {
        self.result.as_ref().ok().copied()
    }

    /// Error code of a failed transaction.
    pub fn error_code(&self) -> Option<u32> {
        self.result.as_ref().err().and_then(ChainError::code)
    }

    /// Serializable view of this receipt.
    pub fn summary(&self, index: usize) -> ReceiptSummary {
        let (ok, err_code, err_message) = match &self.result {
            Ok(output) => (Some(*output), None, None),
            Err(e) => (None, e.code(), Some(e.to_string())),
        };
        ReceiptSummary {
            index,
            ok,
            err_code,
            err_message,
            events: self.events.clone(),
        }
    }
}

/// JSON-friendly form of a [`Receipt`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<TxOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TokenEvent>,
}

/// A mined block and the receipts of its transactions, in execution order.
#[derive(Debug)]
pub struct Block {
    pub height: BlockHeight,
    pub receipts: Vec<Receipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txs_parse_from_tagged_json() {
        let json = r#"[
            {"op": "grant", "sender": "deployer", "grantee": "wallet_1", "target": "deployer.voting", "action": "new-vote"},
            {"op": "new-vote", "sender": "wallet_1"},
            {"op": "force-mint", "amount": 10, "recipient": "wallet_3"},
            {"op": "vote-yea", "sender": "wallet_3", "id": 1},
            {"op": "transfer", "sender": "wallet_3", "amount": 1, "from": "wallet_3", "to": "wallet_4"}
        ]"#;
        let txs: Vec<Tx> = serde_json::from_str(json).unwrap();
        let wallet_3 = Principal::new("wallet_3");
        assert_eq!(txs[2], Tx::force_mint(10, &wallet_3));
        assert_eq!(txs[3], Tx::vote_yea(1, &wallet_3));
        assert_eq!(
            txs[4],
            Tx::transfer(1, &wallet_3, &Principal::new("wallet_4"), None, &wallet_3)
        );
        let ops: Vec<&str> = txs.iter().map(Tx::op).collect();
        assert_eq!(ops, ["grant", "new-vote", "force-mint", "vote-yea", "transfer"]);
    }

    #[test]
    fn malformed_principals_are_rejected_at_parse_time() {
        let json = r#"{"op": "new-vote", "sender": "not a principal"}"#;
        assert!(serde_json::from_str::<Tx>(json).is_err());
    }

    #[test]
    fn grant_actions_are_validated_before_building_a_tx() {
        assert!(ActionName::parse("not an action").is_err());
        let json = r#"{"op": "revoke", "sender": "deployer", "grantee": "wallet_1", "target": "deployer.voting", "action": ""}"#;
        assert!(serde_json::from_str::<Tx>(json).is_err());

        let deployer = Principal::new("deployer");
        let action = ActionName::parse("new-vote").unwrap();
        let json = r#"{"op": "revoke", "sender": "deployer", "grantee": "wallet_1", "target": "deployer.voting", "action": "new-vote"}"#;
        assert_eq!(
            serde_json::from_str::<Tx>(json).unwrap(),
            Tx::revoke(&deployer, &Principal::new("wallet_1"), &Principal::new("deployer.voting"), &action)
        );
    }

    #[test]
    fn receipt_summary_carries_output_or_error() {
        let ok = Receipt {
            result: Ok(TxOutput::VoteId(VoteId::FIRST)),
            events: Vec::new(),
        };
        let summary = ok.summary(0);
        assert_eq!(summary.ok, Some(TxOutput::VoteId(VoteId::FIRST)));
        assert_eq!(serde_json::to_string(&summary).unwrap(), r#"{"index":0,"ok":1}"#);

        let failed = Receipt {
            result: Err(agora_token::TokenError::NotAuthorized.into()),
            events: Vec::new(),
        };
        assert_eq!(failed.error_code(), Some(1001));
        assert_eq!(failed.summary(3).err_code, Some(1001));
    }
}
