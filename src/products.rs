//! Products
//!
//! Read model of catalog products. The engine never mutates a product; cart lines hold a
//! shared reference to the product they were added from.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{ids::typed_id, money::currency_code};

typed_id! {
    /// Product identifier
    ProductId
}

typed_id! {
    /// Product variant identifier
    VariantId
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in major units
    pub price: Decimal,

    /// Price currency
    #[serde(with = "currency_code")]
    pub currency: &'static Currency,

    /// Purchasable variants
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Find a variant of this product by id.
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|variant| variant.id == id)
    }
}

/// A purchasable variant of a product (size, colour, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant identifier
    pub id: VariantId,

    /// Variant name
    pub name: String,

    /// Whether the variant can currently be purchased
    pub in_stock: bool,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn finds_variant_by_id() {
        let small = ProductVariant {
            id: VariantId::new(),
            name: "S".to_string(),
            in_stock: true,
        };
        let large = ProductVariant {
            id: VariantId::new(),
            name: "L".to_string(),
            in_stock: false,
        };

        let product = Product {
            id: ProductId::new(),
            name: "Tee".to_string(),
            price: Decimal::new(2000, 2),
            currency: USD,
            variants: vec![small.clone(), large.clone()],
        };

        assert_eq!(product.variant(large.id), Some(&large));
        assert_eq!(product.variant(small.id), Some(&small));
        assert_eq!(product.variant(VariantId::new()), None);
    }
}
