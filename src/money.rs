//! Money

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// Errors raised while parsing price strings.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The string was not in `AMOUNT CURRENCY` form.
    #[error("expected format 'AMOUNT CURRENCY', got: {0}")]
    InvalidFormat(String),

    /// The amount could not be parsed as a non-negative decimal.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not a known ISO code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up an ISO currency by its alphabetic code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    Currency::find(code)
}

/// Parse a price string (e.g. `"19.99 USD"`) into a major-unit amount and currency.
///
/// # Errors
///
/// Returns a [`PriceError`] if the string is malformed, the amount is negative or not a
/// number, or the currency code is unknown.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidFormat(s.to_string()));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidAmount(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(PriceError::InvalidAmount(s.to_string()));
    }

    let currency =
        currency_from_code(code).ok_or_else(|| PriceError::UnknownCurrency(code.to_string()))?;

    Ok((amount, currency))
}

/// Round a full-precision amount to cents for display.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Wrap a major-unit amount as [`Money`], rounded to cents.
pub fn to_money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_decimal(round_cents(amount), currency)
}

/// Serde adapter storing a currency as its ISO alphabetic code.
pub(crate) mod currency_code {
    use rusty_money::iso::Currency;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::currency_from_code;

    pub(crate) fn serialize<S: Serializer>(
        currency: &&'static Currency,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(currency.iso_alpha_code)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<&'static Currency, D::Error> {
        let code = String::deserialize(deserializer)?;

        currency_from_code(&code)
            .ok_or_else(|| D::Error::custom(format!("unknown currency code: {code}")))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_amount_and_currency() -> TestResult {
        let (amount, currency) = parse_price("19.99 USD")?;

        assert_eq!(amount, Decimal::new(1999, 2));
        assert_eq!(currency, USD);

        Ok(())
    }

    #[test]
    fn rejects_missing_currency() {
        assert!(matches!(
            parse_price("19.99"),
            Err(PriceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_negative_amount() {
        assert!(matches!(
            parse_price("-1.00 GBP"),
            Err(PriceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_unknown_currency() {
        assert_eq!(
            parse_price("1.00 XYZ"),
            Err(PriceError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn rounds_half_cents_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(12_345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_cents(Decimal::new(12_344, 3)), Decimal::new(1234, 2));
    }

    #[test]
    fn to_money_uses_currency() {
        let money = to_money(Decimal::new(500, 2), GBP);

        assert_eq!(money, Money::from_minor(500, GBP));
    }
}
