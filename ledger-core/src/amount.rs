//! Exact money amounts
//!
//! Amounts are arbitrary-precision reduced fractions counted in the smallest
//! currency unit. Proportional splits stay exact: `100 / 3` is stored as
//! `100/3`, and three such shares add back to exactly `100`. Denominators
//! grow with every distinct share total a ledger folds in, so numerator and
//! denominator are unbounded integers and no operation can overflow.
//! Nothing that feeds netting or settlement ever goes through floating point.
//!
//! `rust_decimal::Decimal` is only used at the edges: decimal input converts
//! exactly (mantissa over `10^scale`), decimal output is rounded for display.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Largest scale a `Decimal` can carry
const MAX_DECIMAL_SCALE: u32 = 28;

/// Exact rational amount of money in minor units.
///
/// Always kept in lowest terms with a positive denominator, so two amounts
/// are equal exactly when their parts are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigRational);

impl Amount {
    /// The zero amount
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    /// Build `numer / denom`. Returns `None` for a zero denominator.
    pub fn new(numer: i128, denom: i128) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Self(BigRational::new(numer.into(), denom.into())))
    }

    /// Whole number of minor units
    pub fn from_minor_units(units: i64) -> Self {
        Self(BigRational::from_integer(units.into()))
    }

    /// Exact conversion from a decimal (`mantissa / 10^scale`)
    pub fn from_decimal(value: Decimal) -> Self {
        Self(BigRational::new(
            value.mantissa().into(),
            power_of_ten(value.scale()),
        ))
    }

    /// Numerator of the reduced fraction
    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    /// Denominator of the reduced fraction (always positive)
    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    /// Integer part, truncated toward zero
    pub fn to_minor_units(&self) -> BigInt {
        self.0.to_integer()
    }

    /// Exact decimal value.
    ///
    /// `None` if the fraction has no terminating expansion within 28 places
    /// (thirds, for instance) or does not fit a `Decimal`.
    pub fn to_decimal(&self) -> Option<Decimal> {
        (0..=MAX_DECIMAL_SCALE).find_map(|scale| {
            let scaled = &self.0 * BigRational::from_integer(power_of_ten(scale));
            if !scaled.is_integer() {
                return None;
            }
            let mantissa = scaled.to_integer().to_i128()?;
            Decimal::try_from_i128_with_scale(mantissa, scale).ok()
        })
    }

    /// Decimal rounded to `dp` places (half away from zero) for display.
    /// `None` if the result does not fit a `Decimal`.
    pub fn round_dp(&self, dp: u32) -> Option<Decimal> {
        if dp > MAX_DECIMAL_SCALE {
            return None;
        }
        let scaled = (&self.0 * BigRational::from_integer(power_of_ten(dp))).round();
        let mantissa = scaled.to_integer().to_i128()?;
        Decimal::try_from_i128_with_scale(mantissa, dp).ok()
    }

    /// True if the amount has no fractional part
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// True for zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for amounts strictly above zero
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// True for amounts strictly below zero
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divide by an integer, `None` when `divisor` is zero
    pub fn checked_div(&self, divisor: i64) -> Option<Self> {
        if divisor == 0 {
            return None;
        }
        Some(Self(&self.0 / BigRational::from_integer(divisor.into())))
    }
}

fn power_of_ten(exponent: u32) -> BigInt {
    num_traits::pow(BigInt::from(10), exponent as usize)
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Amount {
    fn from(units: i64) -> Self {
        Self::from_minor_units(units)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Add<&Amount> for Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(self.0 + &rhs.0)
    }
}

impl Add for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        self.0 += &rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl Sub<&Amount> for Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        Amount(self.0 - &rhs.0)
    }
}

impl Sub for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        Amount(&self.0 - &rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl SubAssign<&Amount> for Amount {
    fn sub_assign(&mut self, rhs: &Amount) {
        self.0 -= &rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-&self.0)
    }
}

impl Mul<i64> for Amount {
    type Output = Amount;

    fn mul(self, rhs: i64) -> Amount {
        Amount(self.0 * BigRational::from_integer(rhs.into()))
    }
}

impl Mul<i64> for &Amount {
    type Output = Amount;

    fn mul(self, rhs: i64) -> Amount {
        Amount(&self.0 * BigRational::from_integer(rhs.into()))
    }
}

impl Div<i64> for Amount {
    type Output = Amount;

    /// # Panics
    ///
    /// Panics if `rhs` is zero, like integer division.
    fn div(self, rhs: i64) -> Amount {
        match self.checked_div(rhs) {
            Some(amount) => amount,
            None => panic!("attempt to divide an amount by zero"),
        }
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl FromStr for Amount {
    type Err = crate::Error;

    /// Accepts `"n"`, `"n/d"` and decimal literals such as `"12.50"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || crate::Error::InvalidAmount(s.to_string());

        if let Some((numer, denom)) = s.split_once('/') {
            let numer: BigInt = numer.trim().parse().map_err(|_| invalid())?;
            let denom: BigInt = denom.trim().parse().map_err(|_| invalid())?;
            if denom.is_zero() {
                return Err(invalid());
            }
            return Ok(Amount(BigRational::new(numer, denom)));
        }

        s.parse::<Decimal>()
            .map(Amount::from_decimal)
            .map_err(|_| invalid())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Units(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Units(units) => Ok(Amount::from_minor_units(units)),
            AmountRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
