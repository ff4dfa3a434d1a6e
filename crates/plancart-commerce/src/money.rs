//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. A storefront prices
//! everything in a single currency, so [`Money`] carries no currency of its
//! own; [`Currency`] only decides how amounts are displayed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Thousands and decimal separators.
    fn separators(&self) -> (char, char) {
        match self {
            Currency::BRL | Currency::EUR => ('.', ','),
            Currency::USD | Currency::GBP => (',', '.'),
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "BRL" => Some(Currency::BRL),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }

    /// Format an amount (e.g., "R$ 1.470,00" or "$1,470.00").
    pub fn format(&self, money: Money) -> String {
        let (thousands, decimal) = self.separators();
        let cents = money.amount_cents.unsigned_abs();
        let units = (cents / 100).to_string();

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(thousands);
            }
            grouped.push(digit);
        }

        let sign = if money.is_negative() { "-" } else { "" };
        let gap = if *self == Currency::BRL { " " } else { "" };
        format!(
            "{}{}{}{}{}{:02}",
            sign,
            self.symbol(),
            gap,
            grouped,
            decimal,
            cents % 100
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Largest cent amount an `f64` represents exactly (2^53).
const MAX_EXACT_CENTS: f64 = 9_007_199_254_740_992.0;

/// A monetary amount in cents.
///
/// Arithmetic saturates at the `i64` bounds instead of overflowing.
///
/// Serializes as a bare integer number of cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use plancart_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::new((amount * 100.0).round() as i64)
    }

    /// Like [`Money::from_decimal`], but `None` for amounts that are not
    /// finite or too large to hold exact cents.
    pub fn try_from_decimal(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        (cents.is_finite() && cents.abs() <= MAX_EXACT_CENTS).then(|| Self::new(cents as i64))
    }

    /// Zero.
    pub const fn zero() -> Self {
        Self::new(0)
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
        self.amount_cents as f64 / 100.0
    }

    /// Calculate a percentage of this amount, rounded to the nearest cent.
    pub fn percentage(&self, percent: u32) -> Money {
        let scaled = self.amount_cents as i128 * percent as i128;
        let half = if scaled < 0 { -50 } else { 50 };
        Money::new(((scaled + half) / 100) as i64)
    }

    /// Format in the given currency.
    pub fn display(&self, currency: Currency) -> String {
        currency.format(*self)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_add(other.amount_cents))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.amount_cents = self.amount_cents.saturating_add(other.amount_cents);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_sub(other.amount_cents))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.amount_cents = self.amount_cents.saturating_sub(other.amount_cents);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_cents, 4999);
        assert_eq!(Money::from_decimal(1000.0).amount_cents, 100_000);
        assert_eq!(Money::from_decimal(0.1 + 0.2).amount_cents, 30);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1000);
        let b = Money::new(300);
        assert_eq!((a + b).amount_cents, 1300);
        assert_eq!((a - b).amount_cents, 700);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.amount_cents, 1600);
    }

    #[test]
    fn test_money_arithmetic_saturates() {
        let max = Money::new(i64::MAX);
        assert_eq!(max + Money::new(20_000), max);
        assert_eq!(Money::new(i64::MIN) - Money::new(1), Money::new(i64::MIN));

        let mut total = Money::from_decimal(1e30);
        total += Money::new(1);
        assert_eq!(total, max);
        assert_eq!(vec![max, max].into_iter().sum::<Money>(), max);
    }

    #[test]
    fn test_try_from_decimal_rejects_unrepresentable() {
        assert_eq!(Money::try_from_decimal(1470.5), Some(Money::new(147_050)));
        assert_eq!(Money::try_from_decimal(-3.0), Some(Money::new(-300)));
        assert_eq!(Money::try_from_decimal(1e30), None);
        assert_eq!(Money::try_from_decimal(f64::NAN), None);
        assert_eq!(Money::try_from_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_money_percentage() {
        assert_eq!(Money::new(147_000).percentage(15).amount_cents, 22_050);
        // 0.15 * 333 = 49.95 cents, rounds half away from zero
        assert_eq!(Money::new(333).percentage(15).amount_cents, 50);
        assert_eq!(Money::new(10_000).percentage(0).amount_cents, 0);
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(147_000);
        assert_eq!(m.display(Currency::BRL), "R$ 1.470,00");
        assert_eq!(m.display(Currency::USD), "$1,470.00");
        assert_eq!(Money::new(124_950).display(Currency::BRL), "R$ 1.249,50");
        assert_eq!(Money::new(5).display(Currency::USD), "$0.05");
        assert_eq!(Money::new(-2_050).display(Currency::GBP), "-\u{00a3}20.50");
        assert_eq!(Money::new(123_456_789).display(Currency::USD), "$1,234,567.89");
        assert_eq!(format!("{}", Money::new(22_050)), "220.50");
    }

    #[test]
    fn test_money_serializes_as_cents() {
        let json = serde_json::to_string(&Money::new(1200)).unwrap();
        assert_eq!(json, "1200");
        let back: Money = serde_json::from_str("1200").unwrap();
        assert_eq!(back, Money::new(1200));
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("BRL"), Some(Currency::BRL));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
