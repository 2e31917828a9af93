//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog sends prices as plain JSON numbers in the store currency's
//! standard unit (e.g. `89000` for 89,000 KRW). [`Price`] keeps the same wire
//! shape while refusing negative amounts.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative price in the store currency.
///
/// # Examples
///
/// ```
/// use fitting_room_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::from(89_000)).unwrap();
/// assert_eq!(price.to_string(), "89,000");
///
/// assert!(Price::new(Decimal::from(-1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Formats with comma thousands separators, dropping trailing zero decimals.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = self.0.normalize().to_string();
        let (whole, fraction) = normalized
            .split_once('.')
            .map_or((normalized.as_str(), None), |(w, frac)| (w, Some(frac)));

        let len = whole.len();
        let mut grouped = String::with_capacity(len + len / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        match fraction {
            Some(frac) => write!(f, "{grouped}.{frac}"),
            None => f.write_str(&grouped),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
