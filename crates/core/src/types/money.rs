//! Monetary amounts in Bangladeshi taka.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in Bangladeshi taka (BDT).
///
/// Backed by a [`Decimal`], so arithmetic is exact. The catalog API is not
/// consistent about number encoding (prices arrive both as JSON numbers and
/// as numeric strings), and the default `Decimal` deserializer accepts both,
/// so this type does too. Serializes as a numeric string.
///
/// ## Examples
///
/// ```
/// use rupshari_core::Taka;
///
/// let unit = Taka::from_whole(1250);
/// let line = unit * 2;
/// assert_eq!(line, Taka::from_whole(2500));
/// assert_eq!(line.to_string(), "৳2500");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Taka(Decimal);

impl Taka {
    /// Zero taka.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of taka.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::new(amount, 0))
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Taka {
    /// Formats as `৳`-prefixed amount: whole amounts without decimals,
    /// fractional amounts with two.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = self.0.normalize();
        if normalized.fract().is_zero() {
            write!(f, "৳{normalized}")
        } else {
            write!(f, "৳{:.2}", self.0)
        }
    }
}

impl std::str::FromStr for Taka {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Add for Taka {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Taka {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Taka {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_amount() {
        assert_eq!(Taka::from_whole(60).to_string(), "৳60");
        assert_eq!(Taka::ZERO.to_string(), "৳0");
    }

    #[test]
    fn test_display_fractional_amount() {
        let amount: Taka = "1234.5".parse().unwrap();
        assert_eq!(amount.to_string(), "৳1234.50");
    }

    #[test]
    fn test_display_strips_trailing_zeros() {
        let amount: Taka = "1200.00".parse().unwrap();
        assert_eq!(amount.to_string(), "৳1200");
    }

    #[test]
    fn test_deserialize_from_number() {
        let amount: Taka = serde_json::from_str("1250").unwrap();
        assert_eq!(amount, Taka::from_whole(1250));

        let amount: Taka = serde_json::from_str("99.5").unwrap();
        assert_eq!(amount, "99.5".parse().unwrap());
    }

    #[test]
    fn test_deserialize_from_string() {
        let amount: Taka = serde_json::from_str("\"1250.00\"").unwrap();
        assert_eq!(amount, "1250.00".parse().unwrap());
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&Taka::from_whole(60)).unwrap();
        assert_eq!(json, "\"60\"");
    }

    #[test]
    fn test_multiply_by_quantity() {
        assert_eq!(Taka::from_whole(100) * 3, Taka::from_whole(300));
        assert_eq!(Taka::ZERO * 7, Taka::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Taka = [Taka::from_whole(100), Taka::from_whole(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Taka::from_whole(350));
    }

    #[test]
    fn test_is_zero() {
        assert!(Taka::ZERO.is_zero());
        assert!("0.00".parse::<Taka>().unwrap().is_zero());
        assert!(!Taka::from_whole(1).is_zero());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<Taka>().is_err());
        assert!("".parse::<Taka>().is_err());
    }
}
