use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Number of fractional digits kept by every aggregate.
pub const CURRENCY_DP: u32 = 2;

/// Signed money amount backed by a fixed-point decimal.
///
/// Use this type for **all** monetary values in the engine (transaction
/// amounts, budget limits, goal targets) to avoid binary floating-point drift.
/// Inputs keep whatever precision they were given; aggregates call
/// [`Money::round_currency`] exactly once, after summing.
///
/// The value is signed:
/// - positive = income
/// - negative = expense
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::from_minor(12_34);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10,5".parse::<Money>().unwrap(), Money::from_minor(1050));
/// assert!("ten".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Largest magnitude accepted from input (10^15). Keeps every sum the
    /// engine computes far from `Decimal` overflow.
    pub const MAX_ABS: Money = Money(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

    /// Wraps a decimal value as-is.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates an amount from integer minor units (cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, CURRENCY_DP))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// `|self| <= MAX_ABS`.
    #[must_use]
    pub fn is_within_bounds(self) -> bool {
        self.abs() <= Self::MAX_ABS
    }

    /// Rounds to cents with round-half-to-even and normalizes the scale to
    /// exactly two fractional digits.
    #[must_use]
    pub fn round_currency(self) -> Self {
        let mut value = self
            .0
            .round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointNearestEven);
        value.rescale(CURRENCY_DP);
        Self(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.round_currency().0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Rejects empty strings, grouping separators and exponents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        let mut parts = rest.split('.');
        let units = parts.next().ok_or_else(invalid)?;
        let fraction = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }
        if units.is_empty() || !units.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if let Some(fraction) = fraction
            && !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let value = Decimal::from_str(rest.trim_end_matches('.')).map_err(|_| invalid())?;
        Ok(Money(if negative { -value } else { value }))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn display_always_has_two_decimals() {
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(Money::new(dec!(150)).to_string(), "150.00");
        assert_eq!(Money::from_minor(-1050).to_string(), "-10.50");
        assert_eq!(Money::new(dec!(0.125)).to_string(), "0.12");
    }

    #[test]
    fn round_currency_is_half_even() {
        assert_eq!(Money::new(dec!(0.125)).round_currency(), Money::new(dec!(0.12)));
        assert_eq!(Money::new(dec!(0.135)).round_currency(), Money::new(dec!(0.14)));
        assert_eq!(Money::new(dec!(-0.125)).round_currency(), Money::new(dec!(-0.12)));
        assert_eq!(Money::new(dec!(7)).round_currency().amount().scale(), 2);
    }

    #[test]
    fn bounds_are_symmetric_and_inclusive() {
        assert_eq!(Money::MAX_ABS.amount(), dec!(1000000000000000));
        assert!(Money::MAX_ABS.is_within_bounds());
        assert!((-Money::MAX_ABS).is_within_bounds());
        assert!(!(Money::MAX_ABS + Money::from_minor(1)).is_within_bounds());
        assert!(!Money::new(Decimal::MIN).is_within_bounds());
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap(), Money::from_minor(1000));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::from_minor(1050));
        assert_eq!("10,50".parse::<Money>().unwrap(), Money::from_minor(1050));
        assert_eq!("-0.01".parse::<Money>().unwrap(), Money::from_minor(-1));
        assert_eq!("+1.00".parse::<Money>().unwrap(), Money::from_minor(100));
        assert_eq!("  2.30 ".parse::<Money>().unwrap(), Money::from_minor(230));
        assert_eq!("1.005".parse::<Money>().unwrap(), Money::new(dec!(1.005)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("1,000.00".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
    }

    #[test]
    fn sum_of_references() {
        let amounts = [Money::from_minor(100), Money::from_minor(-30)];
        assert_eq!(amounts.iter().sum::<Money>(), Money::from_minor(70));
    }
}
