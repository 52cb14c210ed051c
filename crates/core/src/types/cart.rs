//! Items captured while shopping.

use serde::{Deserialize, Serialize};

use super::id::CartPosition;
use super::price::{Price, PriceError};

/// A product as it looked on the listing when it was added to the cart.
///
/// `price` is kept verbatim (`"Rs. 500"`) because the cart table is checked
/// against the exact label, not against a re-rendered amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub position: CartPosition,
    pub name: String,
    pub price: String,
}

impl CartItem {
    #[must_use]
    pub fn new(position: CartPosition, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into().trim().to_string(),
            price: price.into().trim().to_string(),
        }
    }

    /// The captured price label parsed into an amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the label is not a storefront price.
    pub fn parsed_price(&self) -> Result<Price, PriceError> {
        Price::parse(&self.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_captured_text() {
        let item = CartItem::new(CartPosition::from_index(1), "  Men Tshirt\n", " Rs. 400 ");
        assert_eq!(item.position.get(), 2);
        assert_eq!(item.name, "Men Tshirt");
        assert_eq!(item.price, "Rs. 400");
        assert_eq!(item.parsed_price().unwrap().to_string(), "Rs. 400");
    }
}
