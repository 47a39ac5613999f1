//! Money type for representing monetary values.
//!
//! Amounts are integers in the smallest currency unit. Catalog prices arrive
//! from the backend as decimal numbers and are converted once, at the edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    PKR,
    USD,
    EUR,
    GBP,
    INR,
    AED,
    SAR,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "PKR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::PKR => "PKR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
            Currency::JPY => "JPY",
        }
    }

    /// Get the display prefix (e.g., "Rs. ").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::PKR => "Rs. ",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::INR => "\u{20b9}",
            Currency::AED => "AED ",
            Currency::SAR => "SAR ",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "PKR" => Some(Currency::PKR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            "AED" => Some(Currency::AED),
            "SAR" => Some(Currency::SAR),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// `amount_cents` is in the smallest unit of the currency (paisa for PKR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use storefront_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::PKR);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / self.currency.minor_per_major() as f64
    }

    /// Format as a display string (e.g., "Rs. 49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Try to add another Money value, returning None if currencies don't match.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_cents.saturating_add(other.amount_cents),
            self.currency,
        ))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_cents.saturating_sub(other.amount_cents),
            self.currency,
        ))
    }

    /// Multiply by a quantity, saturating at the numeric bounds.
    pub fn times(&self, factor: i64) -> Money {
        Money::new(self.amount_cents.saturating_mul(factor), self.currency)
    }

    /// Calculate a percentage of this amount, rounded half away from zero.
    pub fn percentage(&self, percent: f64) -> Money {
        let amount = (self.amount_cents as f64 * percent / 100.0).round() as i64;
        Money::new(amount, self.currency)
    }

    /// Smaller of two amounts of the same currency.
    pub fn min(self, other: Money) -> Money {
        if other.amount_cents < self.amount_cents {
            other
        } else {
            self
        }
    }

    /// Sum an iterator of Money values, skipping values in another currency.
    pub fn sum<'a>(iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Money {
        iter.filter(|m| m.currency == currency)
            .fold(Money::zero(currency), |acc, m| {
                Money::new(acc.amount_cents.saturating_add(m.amount_cents), currency)
            })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::PKR);
        assert_eq!(m.amount_cents, 4999);

        let m = Money::from_decimal(100.0, Currency::JPY);
        assert_eq!(m.amount_cents, 100);
    }

    #[test]
    fn test_money_to_decimal() {
        let m = Money::new(4999, Currency::PKR);
        assert!((m.to_decimal() - 49.99).abs() < 0.001);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(200000, Currency::PKR).display(), "Rs. 2000.00");
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_money_times_saturates() {
        let m = Money::new(i64::MAX / 2, Currency::PKR);
        assert_eq!(m.times(3).amount_cents, i64::MAX);
        assert_eq!(Money::new(1000, Currency::PKR).times(2).amount_cents, 2000);
    }

    #[test]
    fn test_money_percentage_rounds() {
        assert_eq!(Money::new(10000, Currency::PKR).percentage(20.0).amount_cents, 2000);
        assert_eq!(Money::new(333, Currency::PKR).percentage(20.0).amount_cents, 67);
    }

    #[test]
    fn test_try_add_currency_mismatch() {
        let pkr = Money::new(1000, Currency::PKR);
        let usd = Money::new(1000, Currency::USD);
        assert!(pkr.try_add(&usd).is_none());
        assert_eq!(pkr.try_add(&pkr).unwrap().amount_cents, 2000);
    }

    #[test]
    fn test_sum() {
        let values = [
            Money::new(100, Currency::PKR),
            Money::new(250, Currency::PKR),
        ];
        assert_eq!(Money::sum(values.iter(), Currency::PKR).amount_cents, 350);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("PKR"), Some(Currency::PKR));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
