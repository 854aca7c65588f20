//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are fixed-point decimals that are never negative. On the wire they
//! are plain JSON numbers (`19.99`), and input accepts either a number or a
//! numeric string. A unit price fits a `NUMERIC(10, 2)` column: at most
//! [`Price::MAX`] and no fraction of a cent.

use std::iter::Sum;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};

/// Error returned when constructing an invalid [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),

    /// The amount is above [`Price::MAX`].
    #[error("price cannot exceed 99999999.99 (got {0})")]
    TooLarge(Decimal),

    /// The amount has more than two decimal places.
    #[error("price cannot have more than 2 decimal places (got {0})")]
    TooPrecise(Decimal),
}

/// A non-negative monetary amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest unit price, 99,999,999.99.
    pub const MAX: Self = Self(Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, 2));

    /// Create a unit price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount < 0`, `PriceError::TooLarge`
    /// if it is above [`Price::MAX`], and `PriceError::TooPrecise` if it has
    /// fractions of a cent.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge(amount));
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise(amount));
        }
        Ok(Self(amount))
    }

    /// A price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Totals are not bounded by [`Price::MAX`]; arithmetic saturates instead
    /// of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(Decimal::ZERO, |acc, p| {
            acc.checked_add(p.0).unwrap_or(Decimal::MAX)
        }))
    }
}

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
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rejects_negative() {
        assert_eq!(
            Price::new(dec("-0.01")),
            Err(PriceError::Negative(dec("-0.01")))
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(Price::MAX.amount(), dec("99999999.99"));
        assert!(Price::new(dec("99999999.99")).is_ok());
        assert_eq!(
            Price::new(dec("100000000")),
            Err(PriceError::TooLarge(dec("100000000")))
        );
        assert!(Price::new(Decimal::MAX).is_err());
    }

    #[test]
    fn test_rejects_fractions_of_a_cent() {
        assert_eq!(
            Price::new(dec("1.005")),
            Err(PriceError::TooPrecise(dec("1.005")))
        );
        // Trailing zeros are not extra precision.
        assert_eq!(Price::new(dec("1.500")).unwrap().to_string(), "1.50");
    }

    #[test]
    fn test_largest_total_does_not_overflow() {
        let total: Price = [Price::MAX.times(u32::MAX), Price::MAX.times(u32::MAX)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec("99999999.99") * dec("4294967295") * dec("2"));
        assert!(total > Price::MAX);
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(2_999).amount(), dec("29.99"));
        assert_eq!(Price::from_cents(0), Price::ZERO);
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::new(dec("19.99")).unwrap();
        let total: Price = [unit.times(2), Price::new(dec("0.02")).unwrap()]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec("40.00"));
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::new(dec("999.99")).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "999.99");
    }

    #[test]
    fn test_deserializes_number_or_string() {
        let from_number: Price = serde_json::from_str("12.5").unwrap();
        let from_string: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("-1").is_err());
        assert!(serde_json::from_str::<Price>("\"79228162514264337593543950335\"").is_err());
        assert!(serde_json::from_str::<Price>("0.001").is_err());
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::new(dec("5")).unwrap().to_string(), "5.00");
    }
}
