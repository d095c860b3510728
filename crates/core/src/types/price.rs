//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are Vietnamese đồng, which has no minor unit, but they are kept as
//! [`Decimal`] so that arithmetic is exact and the database text form
//! round-trips.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Label shown instead of an amount when a price is zero.
pub const CONTACT_LABEL: &str = "Liên hệ";

/// Currency symbol appended to formatted amounts.
pub const CURRENCY_SYMBOL: &str = "₫";

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// A listed price above [`Price::MAX_LISTED`].
    #[error("price cannot exceed {}", Price::MAX_LISTED)]
    TooLarge,
}

/// A non-negative amount of money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount a product may be listed at: one trillion đồng.
    pub const MAX_LISTED: i64 = 1_000_000_000_000;

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of đồng.
    #[must_use]
    pub fn from_dong(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Parse a price from user or database input.
    ///
    /// Blank input parses as zero, matching an empty form field.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` for non-numeric input and
    /// `PriceError::Negative` for amounts below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::ZERO);
        }
        let amount = Decimal::from_str(s).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount.normalize()))
    }

    /// Parse a price typed into the product form.
    ///
    /// # Errors
    ///
    /// As [`Price::parse`], plus `PriceError::TooLarge` above
    /// [`Price::MAX_LISTED`].
    pub fn parse_listed(s: &str) -> Result<Self, PriceError> {
        let price = Self::parse(s)?;
        if price.0 > Decimal::from(Self::MAX_LISTED) {
            return Err(PriceError::TooLarge);
        }
        Ok(price)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whole đồng, truncated; saturates outside the `i64` range.
    #[must_use]
    pub fn whole_dong(&self) -> i64 {
        self.0.trunc().to_i64().unwrap_or(if self.0.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// The price a customer pays: the sale price when positive, else the original.
    #[must_use]
    pub fn effective(original: Self, sale: Self) -> Self {
        if sale.is_positive() { sale } else { original }
    }

    /// Discount of `sale` against `original` in whole percent, truncated.
    ///
    /// Zero when either price is non-positive or the sale price is not
    /// strictly below the original.
    #[must_use]
    pub fn discount_percent(original: Self, sale: Self) -> u32 {
        discount_ratio(original, sale)
            .and_then(|ratio| ratio.trunc().to_u32())
            .unwrap_or(0)
    }

    /// Discount percent rounded to the nearest whole number, for badges.
    #[must_use]
    pub fn discount_percent_rounded(original: Self, sale: Self) -> u32 {
        discount_ratio(original, sale)
            .and_then(|ratio| {
                ratio
                    .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
                    .to_u32()
            })
            .unwrap_or(0)
    }

    /// Format as `1.990.000₫`, or the contact label for a zero price.
    #[must_use]
    pub fn display_vnd(&self) -> String {
        if self.0.is_zero() {
            return CONTACT_LABEL.to_owned();
        }

        let whole = self.0.trunc();
        let digits = whole.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if whole.is_sign_negative() && !whole.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{grouped}{CURRENCY_SYMBOL}")
    }
}

fn discount_ratio(original: Price, sale: Price) -> Option<Decimal> {
    if !original.is_positive() || !sale.is_positive() || sale >= original {
        return None;
    }
    (original.0 - sale.0)
        .checked_div(original.0)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_vnd())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at `Decimal::MAX`.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(n: i64) -> Price {
        Price::from_dong(n)
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(p(1_990_000).display_vnd(), "1.990.000₫");
        assert_eq!(p(1000).display_vnd(), "1.000₫");
        assert_eq!(p(500).display_vnd(), "500₫");
        assert_eq!(p(100).display_vnd(), "100₫");
    }

    #[test]
    fn test_display_zero_is_contact_label() {
        assert_eq!(Price::ZERO.to_string(), "Liên hệ");
    }

    #[test]
    fn test_effective_price_prefers_positive_sale() {
        assert_eq!(Price::effective(p(2_500_000), p(1_990_000)), p(1_990_000));
        assert_eq!(Price::effective(p(150_000), Price::ZERO), p(150_000));
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(Price::discount_percent(p(100_000), p(80_000)), 20);
        // 2_500_000 -> 1_990_000 is 20.4%, truncated
        assert_eq!(Price::discount_percent(p(2_500_000), p(1_990_000)), 20);
    }

    #[test]
    fn test_discount_percent_zero_cases() {
        assert_eq!(Price::discount_percent(p(100_000), Price::ZERO), 0);
        assert_eq!(Price::discount_percent(Price::ZERO, p(80_000)), 0);
        assert_eq!(Price::discount_percent(p(100_000), p(100_000)), 0);
        assert_eq!(Price::discount_percent(p(100_000), p(120_000)), 0);
    }

    #[test]
    fn test_discount_percent_rounded() {
        // 3_000_000 -> 2_450_000 is 18.33%
        assert_eq!(Price::discount_percent_rounded(p(3_000_000), p(2_450_000)), 18);
        // 200 -> 199 is 0.5%, rounds up
        assert_eq!(Price::discount_percent_rounded(p(200), p(199)), 1);
        assert_eq!(Price::discount_percent(p(200), p(199)), 0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Price::parse("1990000").unwrap(), p(1_990_000));
        assert_eq!(Price::parse("  ").unwrap(), Price::ZERO);
        assert_eq!(Price::parse("-5"), Err(PriceError::Negative));
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_whole_dong() {
        assert_eq!(p(1_990_000).whole_dong(), 1_990_000);
        assert_eq!(Price::parse("1500.75").unwrap().whole_dong(), 1500);
    }

    #[test]
    fn test_parse_listed_bounds() {
        assert_eq!(Price::parse_listed("1000000000000").unwrap(), p(Price::MAX_LISTED));
        assert_eq!(Price::parse_listed("1000000000001"), Err(PriceError::TooLarge));
        assert_eq!(
            Price::parse_listed("50000000000000000000000000000"),
            Err(PriceError::TooLarge)
        );
        assert_eq!(Price::parse_listed(""), Ok(Price::ZERO));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price::parse("50000000000000000000000000000").unwrap();
        assert_eq!(huge.times(2).amount(), Decimal::MAX);
        assert_eq!((huge + huge).amount(), Decimal::MAX);

        let total: Price = [huge, huge, p(1)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);

        // Largest listed price times the largest quantity still fits.
        let line = p(Price::MAX_LISTED).times(u32::MAX);
        assert_eq!(line.amount(), Decimal::from(Price::MAX_LISTED) * Decimal::from(u32::MAX));
    }

    #[test]
    fn test_sum_and_times() {
        let total: Price = [p(1000).times(2), p(500)].into_iter().sum();
        assert_eq!(total, p(2500));
    }
}
