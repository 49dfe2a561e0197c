use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};

/// An amount of Scrooge coins, counted in indivisible units.
/// The amount is signed so that a malformed output with a negative value can still be
/// represented, and then rejected by the validation.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coin(i64);

impl Coin {
    pub const fn new(amount: i64) -> Self {
        Coin(amount)
    }

    pub const fn zero() -> Self {
        Self::new(0)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for Coin {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Coin {
    fn from(value: i32) -> Self {
        Self(value as i64)
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SCR", self.0)
    }
}

/// A sum of coin amounts. It is wider than `Coin`, so adding up any number of outputs that
/// fit in memory can't overflow.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct CoinTotal(i128);

impl CoinTotal {
    pub const fn new(amount: i128) -> Self {
        CoinTotal(amount)
    }

    pub const fn zero() -> Self {
        Self::new(0)
    }

    pub fn value(&self) -> i128 {
        self.0
    }
}

impl From<Coin> for CoinTotal {
    fn from(coin: Coin) -> Self {
        Self(coin.0 as i128)
    }
}

impl Add for CoinTotal {
    type Output = CoinTotal;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<Coin> for CoinTotal {
    type Output = CoinTotal;

    fn add(self, rhs: Coin) -> Self::Output {
        self + CoinTotal::from(rhs)
    }
}

impl Sub for CoinTotal {
    type Output = CoinTotal;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum<Coin> for CoinTotal {
    fn sum<I: Iterator<Item = Coin>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Sum<CoinTotal> for CoinTotal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Display for CoinTotal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SCR", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_and_displays() {
        let total: CoinTotal = vec![Coin::new(6), Coin::new(4), Coin::zero()]
            .into_iter()
            .sum();
        assert_eq!(total, CoinTotal::new(10));
        assert_eq!(total.to_string(), "10 SCR");
        assert_eq!((total - CoinTotal::new(11)).value(), -1);
        assert_eq!(Coin::new(-3).to_string(), "-3 SCR");
    }

    #[test]
    fn total_goes_past_the_coin_range() {
        let total: CoinTotal = vec![Coin::new(i64::MAX), Coin::new(i64::MAX), Coin::new(1)]
            .into_iter()
            .sum();
        assert_eq!(total.value(), 2 * (i64::MAX as i128) + 1);
        assert_eq!(
            total - CoinTotal::from(Coin::new(i64::MAX)),
            CoinTotal::new(i64::MAX as i128 + 1)
        );
    }

    #[test]
    fn zero_is_not_negative() {
        assert!(!Coin::zero().is_negative());
        assert!(Coin::from(-1).is_negative());
    }
}
