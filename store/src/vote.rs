//! Vote storage trait.
//!
//! A backend owns two logical tables: `Vote` rows keyed by a monotonically
//! increasing [`VoteId`], and [`VoterRecord`] rows keyed by `(VoteId, Principal)`.
//! Mutations are grouped in a [`VoteWriteBatch`] and applied all-or-nothing.

use crate::StoreError;
use agora_types::{BlockHeight, Principal, TokenAmount, VoteId};
use serde::{Deserialize, Serialize};

/// Which side of a vote a ballot supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yea,
    Nay,
}

impl Side {
    pub fn from_support(support: bool) -> Self {
        if support {
            Self::Yea
        } else {
            Self::Nay
        }
    }

    pub fn support(self) -> bool {
        matches!(self, Self::Yea)
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Yea => Self::Nay,
            Self::Nay => Self::Yea,
        }
    }
}

/// A proposal and its running tallies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    /// Sum of stake over ballots supporting the proposal.
    pub yea: TokenAmount,
    /// Sum of stake over ballots rejecting the proposal.
    pub nay: TokenAmount,
    /// Height of the block the vote was created in.
    pub start_at: BlockHeight,
    /// Reserved for execution logic that lives outside this core; always false.
    pub executed: bool,
    /// Principal this vote approves, for task-linked proposals.
    pub task: Option<Principal>,
}

impl Vote {
    /// A fresh vote with zeroed tallies.
    pub fn open(id: VoteId, start_at: BlockHeight, task: Option<Principal>) -> Self {
        Self {
            id,
            yea: TokenAmount::ZERO,
            nay: TokenAmount::ZERO,
            start_at,
            executed: false,
            task,
        }
    }

    pub fn tally(&self, side: Side) -> TokenAmount {
        match side {
            Side::Yea => self.yea,
            Side::Nay => self.nay,
        }
    }

    pub fn tally_mut(&mut self, side: Side) -> &mut TokenAmount {
        match side {
            Side::Yea => &mut self.yea,
            Side::Nay => &mut self.nay,
        }
    }
}

/// One voter's ballot on one vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub support: bool,
    /// Locked in on the voter's first ballot and never changed afterwards.
    pub stake: TokenAmount,
}

impl VoterRecord {
    pub fn side(&self) -> Side {
        Side::from_support(self.support)
    }
}

/// A signed change to one tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyDelta {
    Add(TokenAmount),
    Sub(TokenAmount),
}

impl TallyDelta {
    /// Apply the delta, `None` on underflow or overflow.
    pub fn apply(self, tally: TokenAmount) -> Option<TokenAmount> {
        match self {
            Self::Add(amount) => tally.checked_add(amount),
            Self::Sub(amount) => tally.checked_sub(amount),
        }
    }
}

/// A single mutation inside a [`VoteWriteBatch`].
///
/// Voter ops are compare-and-swap: each states what it expects to find, and
/// the commit fails if another writer got there first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOp {
    /// Insert a new vote. Its id must equal the store's next id; the counter
    /// advances as part of the same commit.
    InsertVote(Vote),
    /// Record a first ballot. Fails with `Duplicate` if the voter already has one.
    InsertVoter {
        id: VoteId,
        voter: Principal,
        record: VoterRecord,
    },
    /// Move an existing ballot off `from` to the other side, keeping its stake.
    /// Fails with `Conflict` if the ballot is no longer on `from`.
    FlipVoter {
        id: VoteId,
        voter: Principal,
        from: Side,
    },
    AdjustTally {
        id: VoteId,
        side: Side,
        delta: TallyDelta,
    },
}

/// Ordered group of vote-store mutations committed atomically.
///
/// Operations see the effects of earlier operations in the same batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteWriteBatch {
    ops: Vec<VoteOp>,
}

impl VoteWriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_vote(&mut self, vote: Vote) -> &mut Self {
        self.ops.push(VoteOp::InsertVote(vote));
        self
    }

    pub fn insert_voter(&mut self, id: VoteId, voter: Principal, record: VoterRecord) -> &mut Self {
        self.ops.push(VoteOp::InsertVoter { id, voter, record });
        self
    }

    pub fn flip_voter(&mut self, id: VoteId, voter: Principal, from: Side) -> &mut Self {
        self.ops.push(VoteOp::FlipVoter { id, voter, from });
        self
    }

    pub fn adjust_tally(&mut self, id: VoteId, side: Side, delta: TallyDelta) -> &mut Self {
        self.ops.push(VoteOp::AdjustTally { id, side, delta });
        self
    }

    pub fn ops(&self) -> &[VoteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<VoteOp> {
        self.ops
    }
}

/// Trait for vote and ballot storage.
pub trait VoteStore {
    /// Get a vote by id. `None` if it was never created.
    fn get_vote(&self, id: VoteId) -> Result<Option<Vote>, StoreError>;

    /// Get a voter's ballot on a vote.
    fn get_voter(&self, id: VoteId, voter: &Principal) -> Result<Option<VoterRecord>, StoreError>;

    /// The id the next inserted vote must carry.
    fn next_vote_id(&self) -> Result<VoteId, StoreError>;

    /// Number of votes created so far.
    fn vote_count(&self) -> Result<u64, StoreError>;

    /// All ballots cast on a vote.
    fn voters(&self, id: VoteId) -> Result<Vec<(Principal, VoterRecord)>, StoreError>;

    /// Apply every operation of the batch, or none of them.
    ///
    /// The batch's expectations are checked and its writes applied as one
    /// indivisible step with respect to every other commit.
    fn commit(&self, batch: VoteWriteBatch) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_round_trips_support_flag() {
        assert_eq!(Side::from_support(true), Side::Yea);
        assert_eq!(Side::from_support(false), Side::Nay);
        assert!(Side::Yea.support());
        assert_eq!(Side::Yea.opposite(), Side::Nay);
    }

    #[test]
    fn open_vote_has_zero_tallies() {
        let vote = Vote::open(VoteId::FIRST, BlockHeight::new(7), None);
        assert_eq!(vote.yea, TokenAmount::ZERO);
        assert_eq!(vote.nay, TokenAmount::ZERO);
        assert!(!vote.executed);
        assert_eq!(vote.tally(Side::Nay), TokenAmount::ZERO);
    }

    #[test]
    fn tally_delta_rejects_underflow() {
        let ten = TokenAmount::new(10);
        assert_eq!(TallyDelta::Sub(ten).apply(TokenAmount::new(3)), None);
        assert_eq!(TallyDelta::Add(ten).apply(TokenAmount::new(3)), Some(TokenAmount::new(13)));
    }

    #[test]
    fn batch_preserves_operation_order() {
        let voter = Principal::new("wallet_1");
        let mut batch = VoteWriteBatch::new();
        batch
            .insert_voter(VoteId::FIRST, voter.clone(), VoterRecord { support: true, stake: TokenAmount::new(5) })
            .adjust_tally(VoteId::FIRST, Side::Yea, TallyDelta::Add(TokenAmount::new(5)))
            .flip_voter(VoteId::FIRST, voter, Side::Yea);
        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], VoteOp::InsertVoter { .. }));
        assert!(matches!(batch.ops()[1], VoteOp::AdjustTally { .. }));
        assert!(matches!(batch.ops()[2], VoteOp::FlipVoter { from: Side::Yea, .. }));
    }
}
