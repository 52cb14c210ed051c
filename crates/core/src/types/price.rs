//! Display prices as the storefront renders them (`Rs. 500`).

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text does not start with a known currency symbol.
    #[error("unknown currency in price {0:?}")]
    UnknownCurrency(String),
    /// The amount after the symbol is not a decimal number.
    #[error("invalid amount in price {0:?}")]
    InvalidAmount(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a storefront price label such as `Rs. 500`.
    ///
    /// Surrounding whitespace is ignored, and so is whitespace between the
    /// symbol and the amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the symbol is unknown or the amount does
    /// not parse.
    pub fn parse(text: &str) -> Result<Self, PriceError> {
        let currency_code = CurrencyCode::INR;
        let rest = text
            .trim()
            .strip_prefix(currency_code.symbol())
            .ok_or_else(|| PriceError::UnknownCurrency(text.to_string()))?;

        let amount = Decimal::from_str(rest.trim())
            .map_err(|_| PriceError::InvalidAmount(text.to_string()))?;

        Ok(Self::new(amount, currency_code))
    }

    /// The line total for `quantity` units at this price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency_code.symbol(), self.amount.normalize())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Indian rupee, the only currency the demo store lists.
    #[default]
    INR,
}

impl CurrencyCode {
    /// The symbol printed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "Rs.",
        }
    }
}
