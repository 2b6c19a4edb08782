//! Type-safe product price using decimal arithmetic.
//!
//! A [`Price`] is always strictly positive and carries at most two decimal
//! places, matching the `NUMERIC(12, 2)` column it is stored in. Zero is
//! treated the same as a missing price by the catalog forms, so it never makes
//! it into this type.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero.
    #[error("price cannot be zero")]
    Zero,
    /// The amount is below zero.
    #[error("price must be greater than zero")]
    Negative,
    /// The amount does not fit in ten integer digits.
    #[error("price is too large")]
    TooLarge,
}

/// Decimal places kept on a price.
const PRICE_SCALE: u32 = 2;

/// Smallest amount that no longer fits (`10^10`).
const PRICE_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// A product price in the store's currency unit (dollars, not cents).
///
/// Serialized as a decimal string (`"19.99"`) so no precision is lost in
/// transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount, rounded half away from zero to
    /// two decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Zero`] for amounts that round to zero,
    /// [`PriceError::Negative`] for amounts below zero and
    /// [`PriceError::TooLarge`] for amounts of `10^10` or more.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let amount =
            amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if amount.is_zero() {
            return Err(PriceError::Zero);
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        if amount >= PRICE_LIMIT {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Same as [`Price::new`].
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero() {
        assert_eq!(Price::new(Decimal::ZERO), Err(PriceError::Zero));
    }

    #[test]
    fn test_rejects_negative() {
        assert_eq!(Price::new(Decimal::new(-1, 0)), Err(PriceError::Negative));
    }

    #[test]
    fn test_rounds_to_cents() {
        let price = Price::new(Decimal::new(12_345, 3)).unwrap();
        assert_eq!(price.amount(), Decimal::new(1235, 2));
        assert_eq!(Price::new(Decimal::new(4, 3)), Err(PriceError::Zero));
        assert_eq!(Price::new(Decimal::new(-4, 3)), Err(PriceError::Zero));
    }

    #[test]
    fn test_rejects_too_large() {
        assert_eq!(PRICE_LIMIT, Decimal::new(10_000_000_000, 0));
        assert_eq!(
            Price::new(Decimal::new(123_456_789_012_345, 3)),
            Err(PriceError::TooLarge)
        );
        assert_eq!(
            Price::new(Decimal::new(10_000_000_000, 0)),
            Err(PriceError::TooLarge)
        );
        assert!(Price::new(Decimal::new(999_999_999_999, 2)).is_ok());
    }

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(1999).unwrap();
        assert_eq!(price.amount(), Decimal::new(1999, 2));
        assert_eq!(price.to_string(), "$19.99");
    }

    #[test]
    fn test_deserialize_validates() {
        let price: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(1250, 2));
        assert!(serde_json::from_str::<Price>("\"0\"").is_err());
    }
}
