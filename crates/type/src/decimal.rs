// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// An opaque arbitrary-precision decimal.
///
/// The expression engine treats decimals as a black box with a fixed
/// capability set: construction from integers, floats and decimal text,
/// narrowing to the primitive numerics, textual form, absolute value,
/// the four arithmetic operations and a total order. Equality is numeric:
/// `1.0 == 1.00`, and the hash agrees.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// Parses decimal text like `-123.123`. Scale is preserved, so the
    /// textual form round-trips.
    pub fn parse(text: &str) -> Option<Decimal> {
        BigDecimal::from_str(text).ok().map(Decimal)
    }

    pub fn zero() -> Decimal {
        Decimal(BigDecimal::zero())
    }

    /// Exact binary expansion of the float; NaN and infinities have no
    /// decimal form.
    pub fn from_f64(v: f64) -> Option<Decimal> {
        BigDecimal::try_from(v).ok().map(Decimal)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(&self) -> Decimal {
        Decimal(self.0.abs())
    }

    /// Truncates toward zero; `None` when the integer part does not fit.
    pub fn to_i32(&self) -> Option<i32> {
        self.trunc().to_i32()
    }

    /// Truncates toward zero; `None` when the integer part does not fit.
    pub fn to_i64(&self) -> Option<i64> {
        self.trunc().to_i64()
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }

    fn trunc(&self) -> BigDecimal {
        self.0.with_scale_round(0, RoundingMode::Down)
    }
}

impl From<i32> for Decimal {
    fn from(v: i32) -> Self {
        Decimal(BigDecimal::from(v))
    }
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Decimal(BigDecimal::from(v))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

// Numerically equal decimals can differ in scale, so the hash goes through
// the normalized textual form rather than the raw digits.
impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.normalized().to_string().hash(state);
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 + &rhs.0)
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 - &rhs.0)
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 * &rhs.0)
    }
}

impl Div<&Decimal> for &Decimal {
    type Output = Decimal;

    /// Division to the crate's default precision. Callers guard against a
    /// zero divisor before dividing.
    fn div(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 / &rhs.0)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    fn dec(text: &str) -> Decimal {
        Decimal::parse(text).unwrap()
    }

    #[test]
    fn test_text_round_trip() {
        assert_eq!(dec("123.123").to_string(), "123.123");
        assert_eq!(dec("-123.123").to_string(), "-123.123");
        assert_eq!(dec("0").to_string(), "0");
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        assert_eq!((&dec("123.123") + &dec("456.456")).to_string(), "579.579");
        assert_eq!((&dec("1.5") * &dec("2")).to_string(), "3.0");
        assert_eq!((-&dec("123.123")).to_string(), "-123.123");
    }

    #[test]
    fn test_numeric_equality_and_hash() {
        assert_eq!(dec("1.0"), dec("1.00"));
        let mut set = HashSet::new();
        set.insert(dec("1.0"));
        assert!(set.contains(&dec("1.00")));
    }

    #[test]
    fn test_truncates_toward_zero() {
        assert_eq!(dec("123.9").to_i32(), Some(123));
        assert_eq!(dec("-123.9").to_i32(), Some(-123));
        assert_eq!(dec("3000000000").to_i32(), None);
        assert_eq!(dec("3000000000").to_i64(), Some(3_000_000_000));
    }

    #[test]
    fn test_ordering() {
        assert!(dec("-1") < dec("0.5"));
        assert!(dec("123.123") < dec("456.456"));
    }

    #[test]
    fn test_parse_failure() {
        assert!(Decimal::parse("abc").is_none());
        assert!(Decimal::parse("").is_none());
    }
}
