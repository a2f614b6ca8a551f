//! Voting engine: proposal creation and ballot casting.

use crate::{BlockContext, GovernanceError};
use agora_auth::CapabilityGate;
use agora_store::{
    BalanceCheckpoints, Side, StoreError, TallyDelta, Vote, VoteStore, VoteWriteBatch,
    VoterRecord,
};
use agora_types::{ActionName, Principal, TokenAmount, VoteId};
use tracing::{debug, info};

/// Action required to create a general proposal.
pub const NEW_VOTE: &str = "new-vote";
/// Action required to create a task-linked proposal.
pub const NEW_TASK_VOTE: &str = "new-task-vote";

/// Ballot batches rejected by the store's expectations are rebuilt from a
/// fresh read at most this many times.
const MAX_BALLOT_ATTEMPTS: usize = 3;

/// Orchestrates proposals and ballots on top of a [`VoteStore`].
///
/// The engine keeps no state besides its own identity (the target of the
/// creation capabilities) and the store handle. Capability checks and stake
/// lookups go through collaborators passed per call.
///
/// Every operation checks all preconditions, then writes a single
/// [`VoteWriteBatch`]. Ballot batches carry the voter state they were built
/// from, so a batch that lost a race is rejected by the store and rebuilt.
pub struct VotingEngine<S> {
    address: Principal,
    store: S,
}

impl<S: VoteStore> VotingEngine<S> {
    pub fn new(address: Principal, store: S) -> Self {
        Self { address, store }
    }

    /// The principal capabilities must target to create votes.
    pub fn address(&self) -> &Principal {
        &self.address
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a general proposal. Requires `(creator, engine, "new-vote")`.
    pub fn new_vote(
        &self,
        gate: &impl CapabilityGate,
        creator: &Principal,
        ctx: BlockContext,
    ) -> Result<VoteId, GovernanceError> {
        self.create_vote(gate, creator, None, ctx)
    }

    /// Create a proposal approving `task`. Requires `(creator, engine, "new-task-vote")`.
    pub fn new_task_vote(
        &self,
        gate: &impl CapabilityGate,
        creator: &Principal,
        task: &Principal,
        ctx: BlockContext,
    ) -> Result<VoteId, GovernanceError> {
        self.create_vote(gate, creator, Some(task), ctx)
    }

    /// Allocate the next id and open a vote starting at the current height.
    pub fn create_vote(
        &self,
        gate: &impl CapabilityGate,
        creator: &Principal,
        task: Option<&Principal>,
        ctx: BlockContext,
    ) -> Result<VoteId, GovernanceError> {
        let action = ActionName::new(if task.is_some() {
            NEW_TASK_VOTE
        } else {
            NEW_VOTE
        });
        if let Err(denied) = gate.require(creator, &self.address, &action) {
            debug!(%denied, "vote creation denied");
            return Err(GovernanceError::NotAuthorized {
                principal: creator.clone(),
                reason: "missing capability to create votes",
            });
        }

        let id = self.store.next_vote_id()?;
        let mut batch = VoteWriteBatch::new();
        batch.insert_vote(Vote::open(id, ctx.height, task.cloned()));
        self.store.commit(batch)?;

        info!(%id, %creator, task = ?task.map(Principal::as_str), height = %ctx.height, "vote created");
        Ok(id)
    }

    /// Cast (or repeat) a ballot in favour.
    pub fn vote_yea(
        &self,
        balances: &impl BalanceCheckpoints,
        id: VoteId,
        voter: &Principal,
        ctx: BlockContext,
    ) -> Result<bool, GovernanceError> {
        self.cast_ballot(balances, id, voter, Side::Yea, ctx)
    }

    /// Cast (or repeat) a ballot against.
    pub fn vote_nay(
        &self,
        balances: &impl BalanceCheckpoints,
        id: VoteId,
        voter: &Principal,
        ctx: BlockContext,
    ) -> Result<bool, GovernanceError> {
        self.cast_ballot(balances, id, voter, Side::Nay, ctx)
    }

    /// Record `voter`'s ballot for `side` on vote `id`.
    ///
    /// - First ballot: stake is read from the checkpoint before the current
    ///   block; zero stake is rejected.
    /// - Same side again: succeeds without touching tallies.
    /// - Other side: the recorded stake moves from the old side to the new one.
    pub fn cast_ballot(
        &self,
        balances: &impl BalanceCheckpoints,
        id: VoteId,
        voter: &Principal,
        side: Side,
        ctx: BlockContext,
    ) -> Result<bool, GovernanceError> {
        if self.store.get_vote(id)?.is_none() {
            return Err(GovernanceError::UnknownVote(id));
        }

        let mut attempt = 1;
        loop {
            let Some(batch) = self.ballot_batch(balances, id, voter, side, ctx)? else {
                return Ok(true);
            };
            match self.store.commit(batch) {
                Ok(()) => return Ok(true),
                Err(e @ (StoreError::Duplicate(_) | StoreError::Conflict { .. }))
                    if attempt < MAX_BALLOT_ATTEMPTS =>
                {
                    debug!(%id, %voter, attempt, error = %e, "ballot raced, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// The writes `voter`'s ballot needs given the current store state,
    /// `None` if it already stands on `side`.
    fn ballot_batch(
        &self,
        balances: &impl BalanceCheckpoints,
        id: VoteId,
        voter: &Principal,
        side: Side,
        ctx: BlockContext,
    ) -> Result<Option<VoteWriteBatch>, GovernanceError> {
        let mut batch = VoteWriteBatch::new();
        match self.store.get_voter(id, voter)? {
            Some(record) if record.side() == side => {
                debug!(%id, %voter, ?side, "repeat ballot, tallies unchanged");
                return Ok(None);
            }
            Some(record) => {
                batch
                    .flip_voter(id, voter.clone(), record.side())
                    .adjust_tally(id, record.side(), TallyDelta::Sub(record.stake))
                    .adjust_tally(id, side, TallyDelta::Add(record.stake));
                info!(%id, %voter, from = ?record.side(), to = ?side, stake = %record.stake, "ballot flipped");
            }
            None => {
                let stake = self.stake_of(balances, voter, ctx);
                if stake.is_zero() {
                    debug!(%id, %voter, height = %ctx.height, "no stake at checkpoint");
                    return Err(GovernanceError::NotAuthorized {
                        principal: voter.clone(),
                        reason: "no governance token balance at the stake checkpoint",
                    });
                }
                batch
                    .insert_voter(
                        id,
                        voter.clone(),
                        VoterRecord {
                            support: side.support(),
                            stake,
                        },
                    )
                    .adjust_tally(id, side, TallyDelta::Add(stake));
                info!(%id, %voter, ?side, %stake, "ballot cast");
            }
        }
        Ok(Some(batch))
    }

    /// The stake a first ballot in `ctx` would lock in for `voter`.
    pub fn stake_of(
        &self,
        balances: &impl BalanceCheckpoints,
        voter: &Principal,
        ctx: BlockContext,
    ) -> TokenAmount {
        ctx.stake_checkpoint()
            .map(|as_of| balances.checkpointed_balance(voter, as_of))
            .unwrap_or(TokenAmount::ZERO)
    }

    pub fn get_vote(&self, id: VoteId) -> Result<Option<Vote>, GovernanceError> {
        Ok(self.store.get_vote(id)?)
    }

    pub fn get_voter(
        &self,
        id: VoteId,
        voter: &Principal,
    ) -> Result<Option<VoterRecord>, GovernanceError> {
        Ok(self.store.get_voter(id, voter)?)
    }

    /// Whether the tallies of vote `id` equal the summed stakes of its ballots.
    ///
    /// `None` if the vote does not exist.
    pub fn tally_matches_ballots(&self, id: VoteId) -> Result<Option<bool>, GovernanceError> {
        let Some(vote) = self.store.get_vote(id)? else {
            return Ok(None);
        };
        let ballots = self.store.voters(id)?;
        let sum = |side: Side| {
            TokenAmount::checked_sum(
                ballots
                    .iter()
                    .filter(|(_, record)| record.side() == side)
                    .map(|(_, record)| record.stake),
            )
        };
        Ok(Some(
            [Side::Yea, Side::Nay]
                .into_iter()
                .all(|side| sum(side) == Some(vote.tally(side))),
        ))
    }
}
