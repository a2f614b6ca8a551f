use agora_chain::{Chain, Tx, TxOutput};
use agora_types::{ActionName, Principal, TokenAmount, VoteId};
use proptest::prelude::*;

fn voter(i: usize) -> Principal {
    Principal::new(format!("voter_{i}"))
}

/// Chain with vote #1 open and `balances[i]` minted to `voter_i` in an earlier block.
fn seeded_chain(balances: &[u64]) -> Chain {
    let deployer = Principal::new("deployer");
    let mut chain = Chain::new(deployer.clone()).unwrap();
    let voting = chain.voting_address().clone();
    let mut txs = vec![
        Tx::grant(&deployer, &deployer, &voting, &ActionName::new("new-vote")),
        Tx::new_vote(&deployer),
    ];
    for (i, amount) in balances.iter().enumerate() {
        if *amount > 0 {
            txs.push(Tx::force_mint(u128::from(*amount), &voter(i)));
        }
    }
    chain.mine_block(txs);
    chain
}

fn ballot(i: usize, yea: bool) -> Tx {
    if yea {
        Tx::vote_yea(1, &voter(i))
    } else {
        Tx::vote_nay(1, &voter(i))
    }
}

fn scenario() -> impl Strategy<Value = (Vec<u64>, Vec<Vec<(usize, bool)>>)> {
    prop::collection::vec(0u64..1_000, 1..6).prop_flat_map(|balances| {
        let n = balances.len();
        let blocks = prop::collection::vec(
            prop::collection::vec((0..n, any::<bool>()), 0..6),
            1..6,
        );
        (Just(balances), blocks)
    })
}

proptest! {
    #[test]
    fn tallies_always_equal_recorded_ballots((balances, blocks) in scenario()) {
        let mut chain = seeded_chain(&balances);
        for block in blocks {
            chain.mine_block(block.into_iter().map(|(i, yea)| ballot(i, yea)).collect());
            prop_assert_eq!(
                chain.voting().tally_matches_ballots(VoteId::FIRST).unwrap(),
                Some(true)
            );
        }
    }

    #[test]
    fn final_tally_follows_last_ballot_of_each_voter((balances, blocks) in scenario()) {
        let mut chain = seeded_chain(&balances);
        let mut last_side = vec![None; balances.len()];
        for block in blocks {
            let receipts = chain
                .mine_block(block.iter().map(|&(i, yea)| ballot(i, yea)).collect())
                .receipts;
            for (&(i, yea), receipt) in block.iter().zip(&receipts) {
                if receipt.is_ok() {
                    last_side[i] = Some(yea);
                }
            }
        }

        let (mut yea, mut nay) = (0u128, 0u128);
        for (i, side) in last_side.iter().enumerate() {
            match side {
                Some(true) => yea += u128::from(balances[i]),
                Some(false) => nay += u128::from(balances[i]),
                None => {}
            }
        }
        let vote = chain.get_vote(VoteId::FIRST).unwrap().unwrap();
        prop_assert_eq!(vote.yea, TokenAmount::new(yea));
        prop_assert_eq!(vote.nay, TokenAmount::new(nay));
    }

    #[test]
    fn ballots_succeed_exactly_when_stake_is_positive(
        balance in 0u64..100,
        sides in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let mut chain = seeded_chain(&[balance]);
        for yea in sides {
            let block = chain.mine_block(vec![ballot(0, yea)]);
            prop_assert_eq!(block.receipts[0].is_ok(), balance > 0);
            if balance > 0 {
                prop_assert_eq!(block.receipts[0].output(), Some(TxOutput::Bool(true)));
            }
        }
    }

    #[test]
    fn stake_never_changes_after_first_ballot(
        balance in 1u64..100,
        top_ups in prop::collection::vec(1u64..100, 1..5),
    ) {
        let mut chain = seeded_chain(&[balance]);
        chain.mine_block(vec![ballot(0, true)]);
        for (round, top_up) in top_ups.into_iter().enumerate() {
            chain.mine_block(vec![Tx::force_mint(u128::from(top_up), &voter(0))]);
            chain.mine_block(vec![ballot(0, round % 2 == 0)]);
            let record = chain.get_voter(VoteId::FIRST, &voter(0)).unwrap().unwrap();
            prop_assert_eq!(record.stake, TokenAmount::new(u128::from(balance)));
        }
    }

    #[test]
    fn repeating_a_ballot_is_idempotent(balance in 1u64..1_000, yea in any::<bool>(), repeats in 1usize..5) {
        let mut chain = seeded_chain(&[balance]);
        chain.mine_block(vec![ballot(0, yea)]);
        let before = chain.get_vote(VoteId::FIRST).unwrap();
        for _ in 0..repeats {
            chain.mine_block(vec![ballot(0, yea)]);
        }
        prop_assert_eq!(chain.get_vote(VoteId::FIRST).unwrap(), before);
    }
}
