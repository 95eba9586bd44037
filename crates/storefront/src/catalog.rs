//! Static product catalog.
//!
//! The storefront sells a fixed collection. Products are defined in code and
//! loaded once at startup; the catalog trusts its own id uniqueness (checked
//! by a test below) and offers a literal category filter, nothing more.

use std::collections::BTreeMap;

use luxe_core::{Price, Product, ProductId};

/// A category with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// Display label, e.g. "Evening Wear".
    pub name: String,
    /// Filter key, e.g. "evening-wear".
    pub slug: String,
    /// Products in this category.
    pub product_count: usize,
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::luxe_collection()
    }
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products whose category slug equals `slug` exactly.
    #[must_use]
    pub fn by_category(&self, slug: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category_slug() == slug)
            .collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<CategorySummary> {
        let mut categories: Vec<CategorySummary> = Vec::new();
        for product in &self.products {
            let slug = product.category_slug();
            match categories.iter_mut().find(|c| c.slug == slug) {
                Some(category) => category.product_count += 1,
                None => categories.push(CategorySummary {
                    name: product.category.clone(),
                    slug,
                    product_count: 1,
                }),
            }
        }
        categories
    }

    /// Display label for a category slug, if any product uses it.
    #[must_use]
    pub fn category_name(&self, slug: &str) -> Option<&str> {
        self.products
            .iter()
            .find(|p| p.category_slug() == slug)
            .map(|p| p.category.as_str())
    }

    /// The first `count` products.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Product] {
        self.products
            .get(..count.min(self.products.len()))
            .unwrap_or_default()
    }

    /// Up to `count` other products from the same category as `id`.
    #[must_use]
    pub fn related(&self, id: ProductId, count: usize) -> Vec<&Product> {
        let Some(product) = self.get(id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| p.id != id && p.category == product.category)
            .take(count)
            .collect()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The house collection.
    #[must_use]
    pub fn luxe_collection() -> Self {
        Self::new(vec![
            item(ItemSpec {
                id: 1,
                name: "Silk Evening Gown",
                price: 599,
                category: "Evening Wear",
                image: "/assets/SilkEvening Gown.jpg",
                description: "An elegant silk evening gown perfect for formal events. This \
                    luxurious piece combines timeless design with modern comfort, featuring \
                    delicate beadwork and a flowing silhouette that moves gracefully with every \
                    step.",
                specifications: &[
                    ("material", "100% Pure Silk"),
                    ("color", "Deep Black"),
                    ("size", "S, M, L, XL"),
                    ("care", "Dry Clean Only"),
                    ("countryOfOrigin", "Italy"),
                    ("closure", "Zipper"),
                    ("lining", "Silk Lining"),
                    ("sleeveLength", "Off-Shoulder"),
                ],
                details: &[
                    "Handcrafted with premium materials",
                    "Elegant silhouette for all body types",
                    "Perfect for weddings, galas, and formal events",
                    "Comes with a luxury dust bag for storage",
                    "Limited edition piece",
                ],
            }),
            item(ItemSpec {
                id: 2,
                name: "Cashmere Sweater",
                price: 299,
                category: "Winter Collection",
                image: "/assets/CashmereSweater.jpg",
                description: "Luxurious cashmere sweater for cold winter days. Made from the \
                    finest Mongolian cashmere, this sweater offers unparalleled softness and \
                    warmth while maintaining a sleek, sophisticated look.",
                specifications: &[
                    ("material", "100% Cashmere"),
                    ("color", "Slate Gray"),
                    ("size", "S, M, L"),
                    ("care", "Hand Wash Cold"),
                    ("countryOfOrigin", "Scotland"),
                    ("neck", "Round Neck"),
                    ("fit", "Regular Fit"),
                    ("sleeveLength", "Long Sleeve"),
                ],
                details: &[
                    "Made from premium Mongolian cashmere",
                    "Breathable fabric keeps you comfortable",
                    "Versatile design pairs with any outfit",
                    "Machine washable on gentle cycle",
                    "Designed for durability and lasting quality",
                ],
            }),
            item(ItemSpec {
                id: 3,
                name: "Leather Jacket",
                price: 499,
                category: "Outerwear",
                image: "/assets/LeatherJacket.webp",
                description: "Stylish leather jacket with premium finish. Crafted from genuine \
                    leather with attention to detail, this jacket combines classic design with \
                    contemporary style for a timeless look.",
                specifications: &[
                    ("material", "Genuine Leather"),
                    ("color", "Black"),
                    ("size", "S, M, L, XL"),
                    ("care", "Professional Leather Cleaning"),
                    ("countryOfOrigin", "Spain"),
                    ("closure", "Zipper"),
                    ("pockets", "Multiple Interior and Exterior Pockets"),
                    ("lining", "Polyester Lining"),
                ],
                details: &[
                    "Crafted from premium Italian leather",
                    "Removable belt for versatile styling",
                    "Multiple interior and exterior pockets",
                    "Water-resistant coating",
                    "Seasonless design suitable for year-round wear",
                ],
            }),
            item(ItemSpec {
                id: 4,
                name: "Linen Suit",
                price: 799,
                category: "Business",
                image: "/assets/LinenSuit.jpg",
                description: "Elegant linen suit for business meetings. Perfectly tailored for a \
                    sophisticated professional look, this suit offers breathability and comfort \
                    while maintaining a sharp appearance.",
                specifications: &[
                    ("material", "100% Linen"),
                    ("color", "Navy Blue"),
                    ("size", "38, 40, 42, 44"),
                    ("care", "Dry Clean Only"),
                    ("countryOfOrigin", "Portugal"),
                    ("jacket", "Single Breasted"),
                    ("pants", "Flat Front"),
                    ("closure", "Hook & Eye Closure"),
                ],
                details: &[
                    "Lightweight and breathable linen fabric",
                    "Perfect for summer events and business meetings",
                    "Tailored for a modern, slim fit",
                    "Includes matching blazer and trousers",
                    "Easy to dress up or down",
                ],
            }),
            item(ItemSpec {
                id: 5,
                name: "Velvet Blazer",
                price: 649,
                category: "Business",
                image: "/assets/VelvetBlazer.jpg",
                description: "Luxurious velvet blazer for special occasions. Made with premium \
                    velvet fabric, this blazer adds a touch of elegance and sophistication to \
                    any outfit.",
                specifications: &[
                    ("material", "Premium Velvet"),
                    ("color", "Burgundy"),
                    ("size", "36, 38, 40, 42"),
                    ("care", "Dry Clean Only"),
                    ("countryOfOrigin", "France"),
                    ("closure", "Double Button Closure"),
                    ("pockets", "Flap Pockets"),
                    ("lining", "Silk Lining"),
                ],
                details: &[
                    "Luxurious velvet fabric with subtle sheen",
                    "Perfect for evening events and special occasions",
                    "Fully lined for comfort and durability",
                    "Features classic lapel design",
                    "Comes with luxury garment bag",
                ],
            }),
            item(ItemSpec {
                id: 6,
                name: "Wool Coat",
                price: 899,
                category: "Outerwear",
                image: "/assets/WoolCoat.webp",
                description: "Warm wool coat for winter season. Expertly crafted from premium \
                    merino wool, this coat provides excellent insulation while maintaining a \
                    sleek silhouette.",
                specifications: &[
                    ("material", "100% Merino Wool"),
                    ("color", "Charcoal"),
                    ("size", "S, M, L, XL"),
                    ("care", "Dry Clean Only"),
                    ("countryOfOrigin", "Australia"),
                    ("closure", "Double Breasted"),
                    ("pockets", "Interior and Exterior Pockets"),
                    ("hood", "Detachable Hood"),
                ],
                details: &[
                    "Made from premium Australian merino wool",
                    "Water-resistant finish for light rain",
                    "Insulated for maximum warmth",
                    "Detachable hood for versatility",
                    "Perfect for harsh winter conditions",
                ],
            }),
        ])
    }
}

/// Literal product definition.
struct ItemSpec {
    id: u32,
    name: &'static str,
    price: u64,
    category: &'static str,
    image: &'static str,
    description: &'static str,
    specifications: &'static [(&'static str, &'static str)],
    details: &'static [&'static str],
}

fn item(spec: ItemSpec) -> Product {
    let specifications: BTreeMap<String, String> = spec
        .specifications
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();

    Product {
        id: ProductId::new(spec.id),
        name: spec.name.to_string(),
        price: Price::from_major(spec.price),
        category: spec.category.to_string(),
        image: spec.image.to_string(),
        description: spec.description.to_string(),
        specifications: (!specifications.is_empty()).then_some(specifications),
        details: (!spec.details.is_empty())
            .then(|| spec.details.iter().map(|d| (*d).to_string()).collect()),
    }
}

/// Turn a slug back into a title for headings when no product matches it.
#[must_use]
pub fn humanize_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_product_ids_are_unique() {
        let catalog = Catalog::default();
        let ids: HashSet<_> = catalog.all().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_get() {
        let catalog = Catalog::default();
        let coat = catalog.get(ProductId::new(6)).unwrap();
        assert_eq!(coat.name, "Wool Coat");
        assert_eq!(coat.price, Price::from_major(899));
        assert_eq!(coat.details.as_ref().unwrap().len(), 5);
        assert_eq!(
            coat.specifications.as_ref().unwrap().get("hood").map(String::as_str),
            Some("Detachable Hood")
        );
        assert!(catalog.get(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_by_category_is_literal_equality() {
        let catalog = Catalog::default();

        let business: Vec<_> = catalog
            .by_category("business")
            .iter()
            .map(|p| p.id.as_u32())
            .collect();
        assert_eq!(business, vec![4, 5]);

        assert!(catalog.by_category("Business").is_empty());
        assert!(catalog.by_category("busi").is_empty());
        assert_eq!(catalog.by_category("evening-wear").len(), 1);
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        let categories = Catalog::default().categories();
        let slugs: Vec<_> = categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec!["evening-wear", "winter-collection", "outerwear", "business"]
        );
        assert_eq!(categories[2].product_count, 2);
        assert_eq!(categories[2].name, "Outerwear");
    }

    #[test]
    fn test_featured_and_related() {
        let catalog = Catalog::default();
        assert_eq!(catalog.featured(3).len(), 3);
        assert_eq!(catalog.featured(100).len(), 6);

        let related: Vec<_> = catalog
            .related(ProductId::new(3), 4)
            .iter()
            .map(|p| p.id.as_u32())
            .collect();
        assert_eq!(related, vec![6]);
        assert!(catalog.related(ProductId::new(99), 4).is_empty());
    }

    #[test]
    fn test_category_name_and_humanize() {
        let catalog = Catalog::default();
        assert_eq!(catalog.category_name("winter-collection"), Some("Winter Collection"));
        assert_eq!(catalog.category_name("swimwear"), None);
        assert_eq!(humanize_slug("resort-wear"), "Resort Wear");
        assert_eq!(humanize_slug(""), "");
    }
}
