//! Catalog product type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog entry. Immutable once defined.
///
/// The same shape is persisted inside cart lines and wishlist entries, so
/// optional fields are skipped when absent to keep stored documents small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier, unique within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Category label, e.g. "Evening Wear".
    pub category: String,
    /// Image path under the public assets directory.
    pub image: String,
    /// Free-text description.
    pub description: String,
    /// Specification key to value, e.g. `material -> 100% Pure Silk`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<BTreeMap<String, String>>,
    /// Ordered feature bullet points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl Product {
    /// URL-safe category key used by the shop filter.
    ///
    /// ```
    /// # use luxe_core::{Price, Product, ProductId};
    /// let product = Product {
    ///     id: ProductId::new(1),
    ///     name: "Silk Evening Gown".into(),
    ///     price: Price::from_major(599),
    ///     category: "Evening Wear".into(),
    ///     image: String::new(),
    ///     description: String::new(),
    ///     specifications: None,
    ///     details: None,
    /// };
    /// assert_eq!(product.category_slug(), "evening-wear");
    /// ```
    #[must_use]
    pub fn category_slug(&self) -> String {
        slugify(&self.category)
    }
}

/// Lowercase a label and join its words with hyphens.
#[must_use]
pub fn slugify(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Winter Collection"), "winter-collection");
        assert_eq!(slugify("  Outerwear "), "outerwear");
        assert_eq!(slugify("Evening   Wear"), "evening-wear");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_optional_fields_default_when_missing() {
        let json = r#"{
            "id": 2,
            "name": "Cashmere Sweater",
            "price": 299,
            "category": "Winter Collection",
            "image": "/assets/CashmereSweater.jpg",
            "description": "Luxurious cashmere sweater."
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(2));
        assert_eq!(product.price, Price::from_major(299));
        assert!(product.specifications.is_none());
        assert!(product.details.is_none());

        let out = serde_json::to_value(&product).unwrap();
        assert!(out.get("specifications").is_none());
    }
}
