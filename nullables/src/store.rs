//! In-memory vote store, thread-safe and snapshot-able.

use agora_store::{StoreError, Vote, VoteOp, VoteStore, VoteWriteBatch, VoterRecord};
use agora_types::{Principal, VoteId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct VoteTables {
    votes: BTreeMap<VoteId, Vote>,
    voters: BTreeMap<(VoteId, Principal), VoterRecord>,
    next_id: VoteId,
}

impl Default for VoteTables {
    fn default() -> Self {
        Self {
            votes: BTreeMap::new(),
            voters: BTreeMap::new(),
            next_id: VoteId::FIRST,
        }
    }
}

/// Rows touched by a batch that has not been committed yet.
struct Staged<'a> {
    base: &'a VoteTables,
    votes: HashMap<VoteId, Vote>,
    voters: HashMap<(VoteId, Principal), VoterRecord>,
    next_id: VoteId,
}

impl<'a> Staged<'a> {
    fn new(base: &'a VoteTables) -> Self {
        Self {
            base,
            votes: HashMap::new(),
            voters: HashMap::new(),
            next_id: base.next_id,
        }
    }

    fn vote(&self, id: VoteId) -> Option<&Vote> {
        self.votes.get(&id).or_else(|| self.base.votes.get(&id))
    }

    fn voter(&self, key: &(VoteId, Principal)) -> Option<&VoterRecord> {
        self.voters.get(key).or_else(|| self.base.voters.get(key))
    }

    fn apply(&mut self, op: VoteOp) -> Result<(), StoreError> {
        match op {
            VoteOp::InsertVote(vote) => {
                if vote.id != self.next_id {
                    return Err(StoreError::OutOfSequence {
                        expected: self.next_id,
                        got: vote.id,
                    });
                }
                self.next_id = vote
                    .id
                    .next()
                    .ok_or_else(|| StoreError::Backend("vote id space exhausted".into()))?;
                self.votes.insert(vote.id, vote);
            }
            VoteOp::InsertVoter { id, voter, record } => {
                if self.vote(id).is_none() {
                    return Err(StoreError::NotFound(format!("vote {id}")));
                }
                let key = (id, voter);
                if self.voter(&key).is_some() {
                    return Err(StoreError::Duplicate(format!("ballot of {} on vote {id}", key.1)));
                }
                self.voters.insert(key, record);
            }
            VoteOp::FlipVoter { id, voter, from } => {
                let key = (id, voter);
                let mut record = *self
                    .voter(&key)
                    .ok_or_else(|| StoreError::NotFound(format!("ballot of {} on vote {id}", key.1)))?;
                if record.side() != from {
                    return Err(StoreError::Conflict {
                        id,
                        voter: key.1.to_string(),
                    });
                }
                record.support = from.opposite().support();
                self.voters.insert(key, record);
            }
            VoteOp::AdjustTally { id, side, delta } => {
                let mut vote = self
                    .vote(id)
                    .cloned()
                    .ok_or_else(|| StoreError::NotFound(format!("vote {id}")))?;
                let tally = vote.tally_mut(side);
                *tally = delta.apply(*tally).ok_or_else(|| {
                    StoreError::TallyOutOfRange(format!("{side:?} tally of vote {id} by {delta:?}"))
                })?;
                self.votes.insert(id, vote);
            }
        }
        Ok(())
    }

    fn finish(self) -> (HashMap<VoteId, Vote>, HashMap<(VoteId, Principal), VoterRecord>, VoteId) {
        (self.votes, self.voters, self.next_id)
    }
}

/// An in-memory [`VoteStore`].
///
/// A single mutex guards all tables, so every commit is atomic with respect
/// to every other read and write.
#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    tables: Mutex<VoteTables>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, VoteTables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("vote store lock poisoned".into()))
    }

    /// Serialize all tables to bytes for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, StoreError> {
        let tables = self.tables()?;
        bincode::serialize(&*tables).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Restore a store from bytes produced by [`MemoryVoteStore::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, StoreError> {
        let tables: VoteTables =
            bincode::deserialize(data).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Self {
            tables: Mutex::new(tables),
        })
    }
}

impl VoteStore for MemoryVoteStore {
    fn get_vote(&self, id: VoteId) -> Result<Option<Vote>, StoreError> {
        Ok(self.tables()?.votes.get(&id).cloned())
    }

    fn get_voter(&self, id: VoteId, voter: &Principal) -> Result<Option<VoterRecord>, StoreError> {
        Ok(self.tables()?.voters.get(&(id, voter.clone())).copied())
    }

    fn next_vote_id(&self) -> Result<VoteId, StoreError> {
        Ok(self.tables()?.next_id)
    }

    fn vote_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.votes.len() as u64)
    }

    fn voters(&self, id: VoteId) -> Result<Vec<(Principal, VoterRecord)>, StoreError> {
        Ok(self
            .tables()?
            .voters
            .iter()
            .filter(|((vote_id, _), _)| *vote_id == id)
            .map(|((_, voter), record)| (voter.clone(), *record))
            .collect())
    }

    fn commit(&self, batch: VoteWriteBatch) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let mut staged = Staged::new(&tables);
        for op in batch.into_ops() {
            staged.apply(op)?;
        }
        let (votes, voters, next_id) = staged.finish();
        tables.votes.extend(votes);
        tables.voters.extend(voters);
        tables.next_id = next_id;
        Ok(())
    }
}
