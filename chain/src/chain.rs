//! The chain: block production, in-order execution and read-only queries.

use agora_auth::{CapabilityGate, CapabilityRegistry};
use agora_governance::{BlockContext, VotingEngine};
use agora_nullables::MemoryVoteStore;
use agora_store::{Vote, VoterRecord};
use agora_token::{CheckpointedLedger, TokenEvent};
use agora_types::{ActionName, BlockHeight, Principal, TokenAmount, VoteId};
use tracing::{debug, info};

use crate::tracing_spans::{block_span, tx_span};
use crate::{Block, ChainConfig, ChainError, ChainSnapshot, Receipt, Tx, TxOutput};

/// Capability registry, governance token and voting engine, driven block by block.
pub struct Chain {
    deployer: Principal,
    height: BlockHeight,
    auth_address: Principal,
    registry: CapabilityRegistry,
    ledger: CheckpointedLedger,
    voting: VotingEngine<MemoryVoteStore>,
}

impl Chain {
    pub const AUTH_CONTRACT: &'static str = "auth";
    pub const TOKEN_CONTRACT: &'static str = "token";
    pub const VOTING_CONTRACT: &'static str = "voting";

    /// An empty chain at genesis with contracts deployed by `deployer`.
    pub fn new(deployer: Principal) -> Result<Self, ChainError> {
        Self::assemble(
            deployer,
            BlockHeight::GENESIS,
            CapabilityRegistry::new(),
            None,
            MemoryVoteStore::new(),
        )
    }

    /// A chain at genesis with the configured balances and grants applied.
    pub fn from_config(config: &ChainConfig) -> Result<Self, ChainError> {
        let mut chain = Self::new(config.deployer.clone())?;
        for balance in &config.genesis.balances {
            chain
                .ledger
                .force_mint(balance.amount, &balance.principal, BlockHeight::GENESIS)?;
        }
        for grant in &config.genesis.grants {
            let target = grant.target_principal(&chain.deployer)?;
            chain
                .registry
                .grant(&config.deployer, &grant.grantee, &target, &grant.action)?;
        }
        info!(
            deployer = %chain.deployer,
            balances = config.genesis.balances.len(),
            grants = config.genesis.grants.len(),
            "genesis applied"
        );
        Ok(chain)
    }

    fn assemble(
        deployer: Principal,
        height: BlockHeight,
        registry: CapabilityRegistry,
        ledger: Option<CheckpointedLedger>,
        store: MemoryVoteStore,
    ) -> Result<Self, ChainError> {
        let auth_address = Principal::contract(&deployer, Self::AUTH_CONTRACT)?;
        let ledger = match ledger {
            Some(ledger) => ledger,
            None => CheckpointedLedger::new(Principal::contract(&deployer, Self::TOKEN_CONTRACT)?),
        };
        let voting_address = Principal::contract(&deployer, Self::VOTING_CONTRACT)?;
        Ok(Self {
            deployer,
            height,
            auth_address,
            registry,
            ledger,
            voting: VotingEngine::new(voting_address, store),
        })
    }

    pub fn deployer(&self) -> &Principal {
        &self.deployer
    }

    /// Height of the last mined block (`GENESIS` before the first one).
    pub fn height(&self) -> BlockHeight {
        self.height
    }

    pub fn auth_address(&self) -> &Principal {
        &self.auth_address
    }

    pub fn token_address(&self) -> &Principal {
        self.ledger.address()
    }

    pub fn voting_address(&self) -> &Principal {
        self.voting.address()
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &CheckpointedLedger {
        &self.ledger
    }

    pub fn voting(&self) -> &VotingEngine<MemoryVoteStore> {
        &self.voting
    }

    // ── Block production ────────────────────────────────────────────────

    /// Mine one block containing `txs`, executed in the given order.
    pub fn mine_block(&mut self, txs: Vec<Tx>) -> Block {
        self.height = self.height.next();
        let height = self.height;
        let span = block_span(height, txs.len());
        let _entered = span.enter();

        let ctx = BlockContext::new(height);
        let mut receipts = Vec::with_capacity(txs.len());
        for (index, tx) in txs.iter().enumerate() {
            let _tx = tx_span(index, tx.op()).entered();
            receipts.push(self.execute(tx, ctx));
        }
        let failed = receipts.iter().filter(|r| !r.is_ok()).count();
        debug!(txs = receipts.len(), failed, "block mined");
        Block { height, receipts }
    }

    /// Mine `count` blocks without transactions. Returns the new height.
    pub fn mine_empty_blocks(&mut self, count: u64) -> BlockHeight {
        self.height = BlockHeight::new(self.height.as_u64().saturating_add(count));
        self.height
    }

    fn execute(&mut self, tx: &Tx, ctx: BlockContext) -> Receipt {
        let mut events = Vec::new();
        let result = self.apply(tx, ctx, &mut events);
        if let Err(e) = &result {
            debug!(error = %e, code = ?e.code(), "tx failed");
        }
        Receipt { result, events }
    }

    fn apply(
        &mut self,
        tx: &Tx,
        ctx: BlockContext,
        events: &mut Vec<TokenEvent>,
    ) -> Result<TxOutput, ChainError> {
        let output = match tx {
            Tx::Grant {
                sender,
                grantee,
                target,
                action,
            } => TxOutput::Bool(self.registry.grant(sender, grantee, target, action)?),
            Tx::Revoke {
                sender,
                grantee,
                target,
                action,
            } => TxOutput::Bool(self.registry.revoke(sender, grantee, target, action)?),
            Tx::NewVote { sender } => {
                TxOutput::VoteId(self.voting.new_vote(&self.registry, sender, ctx)?)
            }
            Tx::NewTaskVote { sender, task } => {
                TxOutput::VoteId(self.voting.new_task_vote(&self.registry, sender, task, ctx)?)
            }
            Tx::VoteYea { sender, id } => {
                TxOutput::Bool(self.voting.vote_yea(&self.ledger, *id, sender, ctx)?)
            }
            Tx::VoteNay { sender, id } => {
                TxOutput::Bool(self.voting.vote_nay(&self.ledger, *id, sender, ctx)?)
            }
            Tx::Mint {
                sender,
                amount,
                recipient,
            } => {
                events.extend(
                    self.ledger
                        .mint(&self.registry, sender, *amount, recipient, ctx.height)?,
                );
                TxOutput::Bool(true)
            }
            Tx::ForceMint { amount, recipient } => {
                events.extend(self.ledger.force_mint(*amount, recipient, ctx.height)?);
                TxOutput::Bool(true)
            }
            Tx::Transfer {
                sender,
                amount,
                from,
                to,
                memo,
            } => {
                let memo = memo.as_ref().map(|m| m.as_bytes().to_vec());
                events.extend(self.ledger.transfer(sender, *amount, from, to, memo, ctx.height)?);
                TxOutput::Bool(true)
            }
        };
        Ok(output)
    }

    // ── Read-only queries ───────────────────────────────────────────────

    pub fn get_vote(&self, id: VoteId) -> Result<Option<Vote>, ChainError> {
        Ok(self.voting.get_vote(id)?)
    }

    pub fn get_voter(&self, id: VoteId, voter: &Principal) -> Result<Option<VoterRecord>, ChainError> {
        Ok(self.voting.get_voter(id, voter)?)
    }

    pub fn can_call(&self, who: &Principal, target: &Principal, action: &ActionName) -> bool {
        self.registry.can_call(who, target, action)
    }

    pub fn balance_of(&self, who: &Principal) -> TokenAmount {
        self.ledger.balance_of(who)
    }

    pub fn balance_at(&self, who: &Principal, height: BlockHeight) -> TokenAmount {
        self.ledger.balance_at(who, height)
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.ledger.total_supply()
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Result<ChainSnapshot, ChainError> {
        Ok(ChainSnapshot {
            deployer: self.deployer.clone(),
            height: self.height,
            registry: self.registry.clone(),
            ledger: self.ledger.clone(),
            votes: self.voting.store().save_state()?,
        })
    }

    pub fn restore(snapshot: ChainSnapshot) -> Result<Self, ChainError> {
        let store = MemoryVoteStore::load_state(&snapshot.votes)?;
        Self::assemble(
            snapshot.deployer,
            snapshot.height,
            snapshot.registry,
            Some(snapshot.ledger),
            store,
        )
    }
}
