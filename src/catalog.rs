//! Catalog
//!
//! Products available to play for, loaded from YAML:
//!
//! ```yaml
//! products:
//!   classic-tee:
//!     id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e01
//!     name: Classic Tee
//!     price: 20.00 USD
//!     variants:
//!       - id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e02
//!         name: M
//!         inStock: true
//! ```

use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use rustc_hash::FxHashSet;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    money::{PriceError, parse_price},
    products::{Product, ProductId, ProductVariant},
};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog is not valid YAML.
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A product price could not be parsed.
    #[error("invalid price for product {key}")]
    Price {
        /// Catalog key of the product
        key: String,

        /// Underlying parse error
        #[source]
        source: PriceError,
    },

    /// Products are priced in more than one currency.
    #[error("currency mismatch: expected {expected}, found {found} for product {key}")]
    CurrencyMismatch {
        /// Catalog key of the product
        key: String,

        /// Currency of the products seen so far
        expected: String,

        /// Currency of this product
        found: String,
    },

    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// The catalog lists no products.
    #[error("catalog contains no products")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: BTreeMap<String, ProductFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: ProductId,
    name: String,
    price: String,
    #[serde(default)]
    variants: Vec<ProductVariant>,
}

/// A set of products priced in one currency.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<(String, Arc<Product>)>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or is not a valid catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed, a price is invalid, products mix
    /// currencies, ids repeat or there are no products.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut products = Vec::with_capacity(fixture.products.len());
        let mut ids = FxHashSet::default();
        let mut currency: Option<&'static Currency> = None;

        for (key, product) in fixture.products {
            let (price, product_currency) = parse_price(&product.price).map_err(|source| {
                CatalogError::Price {
                    key: key.clone(),
                    source,
                }
            })?;

            match currency {
                Some(expected) if expected != product_currency => {
                    return Err(CatalogError::CurrencyMismatch {
                        key,
                        expected: expected.iso_alpha_code.to_string(),
                        found: product_currency.iso_alpha_code.to_string(),
                    });
                }
                Some(_) => {}
                None => currency = Some(product_currency),
            }

            if !ids.insert(product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            products.push((
                key,
                Arc::new(Product {
                    id: product.id,
                    name: product.name,
                    price,
                    currency: product_currency,
                    variants: product.variants,
                }),
            ));
        }

        let currency = currency.ok_or(CatalogError::Empty)?;

        tracing::debug!(products = products.len(), currency = currency.iso_alpha_code, "loaded catalog");

        Ok(Self { products, currency })
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Look up a product by catalog key.
    pub fn get(&self, key: &str) -> Option<&Arc<Product>> {
        self.products
            .iter()
            .find(|(product_key, _)| product_key == key)
            .map(|(_, product)| product)
    }

    /// Look up a product by id.
    pub fn by_id(&self, id: ProductId) -> Option<&Arc<Product>> {
        self.iter().find(|product| product.id == id)
    }

    /// Find a product by catalog key, id or case-insensitive name.
    pub fn find(&self, query: &str) -> Option<&Arc<Product>> {
        self.get(query)
            .or_else(|| query.parse().ok().and_then(|id| self.by_id(id)))
            .or_else(|| self.iter().find(|product| product.name.eq_ignore_ascii_case(query)))
    }

    /// Products ordered by catalog key.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.iter().map(|(_, product)| product)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = "
products:
  classic-tee:
    id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e01
    name: Classic Tee
    price: 20.00 USD
    variants:
      - id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e02
        name: M
        inStock: true
      - id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e03
        name: XL
        inStock: false
  enamel-mug:
    id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e11
    name: Enamel Mug
    price: 12.50 USD
";

    #[test]
    fn loads_products_in_key_order() -> TestResult {
        let catalog = Catalog::from_yaml(CATALOG)?;

        let names: Vec<&str> = catalog.iter().map(|product| product.name.as_str()).collect();

        assert_eq!(names, vec!["Classic Tee", "Enamel Mug"]);
        assert_eq!(catalog.currency(), USD);

        let tee = catalog.get("classic-tee").ok_or("missing tee")?;

        assert_eq!(tee.price, Decimal::new(2000, 2));
        assert_eq!(tee.variants.len(), 2);
        assert!(catalog.get("enamel-mug").ok_or("missing mug")?.variants.is_empty());

        Ok(())
    }

    #[test]
    fn finds_by_key_id_or_name() -> TestResult {
        let catalog = Catalog::from_yaml(CATALOG)?;
        let tee = catalog.get("classic-tee").ok_or("missing tee")?;

        assert_eq!(catalog.find("classic-tee"), Some(tee));
        assert_eq!(catalog.find(&tee.id.to_string()), Some(tee));
        assert_eq!(catalog.find("CLASSIC TEE"), Some(tee));
        assert_eq!(catalog.find("hoodie"), None);

        Ok(())
    }

    #[test]
    fn rejects_mixed_currencies() {
        let yaml = "
products:
  a:
    id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e21
    name: A
    price: 1.00 USD
  b:
    id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e22
    name: B
    price: 1.00 GBP
";

        assert!(matches!(
            Catalog::from_yaml(yaml),
            Err(CatalogError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let yaml = "
products:
  a:
    id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e21
    name: A
    price: 1.00 USD
  b:
    id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e21
    name: B
    price: 2.00 USD
";

        assert!(matches!(
            Catalog::from_yaml(yaml),
            Err(CatalogError::DuplicateProduct(_))
        ));
    }

    #[test]
    fn rejects_bad_prices() {
        let yaml = "
products:
  a:
    id: 0190f0c4-5e2b-7c1a-9d3e-2a7b6c8d9e21
    name: A
    price: free
";

        assert!(matches!(
            Catalog::from_yaml(yaml),
            Err(CatalogError::Price { .. })
        ));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            Catalog::from_yaml("products: {}"),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn reads_from_disk() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("catalog.yml");

        fs::write(&path, CATALOG)?;

        assert_eq!(Catalog::load(&path)?.len(), 2);

        Ok(())
    }
}
