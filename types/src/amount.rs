//! Governance token amounts.
//!
//! Amounts are whole units (the token has zero decimals) held as `u128`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Sum of `amounts`, `None` on overflow.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for TokenAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_math_reports_out_of_range() {
        let max = TokenAmount::new(u128::MAX);
        assert_eq!(max.checked_add(TokenAmount::new(1)), None);
        assert_eq!(TokenAmount::ZERO.checked_sub(TokenAmount::new(1)), None);
        assert_eq!(
            TokenAmount::new(7).checked_sub(TokenAmount::new(3)),
            Some(TokenAmount::new(4))
        );
    }

    #[test]
    fn checked_sum_adds_or_detects_overflow() {
        let amounts = [1, 2, 3].map(TokenAmount::new);
        assert_eq!(TokenAmount::checked_sum(amounts), Some(TokenAmount::new(6)));
        assert_eq!(TokenAmount::checked_sum(Vec::new()), Some(TokenAmount::ZERO));
        assert_eq!(
            TokenAmount::checked_sum([TokenAmount::new(u128::MAX), TokenAmount::new(1)]),
            None
        );
    }
}
