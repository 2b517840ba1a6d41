//! Plant catalog.
//!
//! The catalog is a fixed, ordered list of products seeded once at startup.
//! Nothing creates, edits or deletes products at runtime; the shop page only
//! ever narrows the list with a [`CategoryFilter`].

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Error returned when a category or filter name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Plant category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Anubias,
    Fern,
    Crypt,
    Stem,
    Decorative,
}

impl Category {
    /// Every category, in the order the shop lists them.
    pub const ALL: [Self; 5] = [
        Self::Anubias,
        Self::Fern,
        Self::Crypt,
        Self::Stem,
        Self::Decorative,
    ];

    /// Display name, also used as the query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anubias => "Anubias",
            Self::Fern => "Fern",
            Self::Crypt => "Crypt",
            Self::Stem => "Stem",
            Self::Decorative => "Decorative",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// How much attention a plant needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareLevel {
    Easy,
    Moderate,
    Advanced,
}

impl CareLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Moderate => "Moderate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for CareLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light a plant needs to thrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightRequirement {
    Low,
    Medium,
    High,
}

impl LightRequirement {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for LightRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plant for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Unit price in the store currency. Never negative.
    pub price: Decimal,
    /// Image URLs in carousel order.
    pub images: Vec<String>,
    pub care_level: CareLevel,
    pub light: LightRequirement,
}

impl Product {
    /// Unit price for display.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::store(self.price)
    }

    /// First image, used for thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Category selector for the shop page.
///
/// Deserializes from the same strings the filter buttons send (`All`,
/// `Anubias`, `Fern`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Filter buttons in display order.
    #[must_use]
    pub fn choices() -> Vec<Self> {
        core::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }

    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == category,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_owned()
    }
}

/// Keep the products that pass `filter`, preserving their relative order.
#[must_use]
pub fn filter_by_category(products: &[Product], filter: CategoryFilter) -> Vec<&Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

/// The store's product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The catalog the store opens with.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_products())
    }

    /// Every product, in seed order.
    #[must_use]
    pub fn list_all(&self) -> &[Product] {
        &self.products
    }

    /// Products passing `filter`, in seed order.
    #[must_use]
    pub fn filtered(&self, filter: CategoryFilter) -> Vec<&Product> {
        filter_by_category(&self.products, filter)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// The first `n` products, shown as staff favorites on the home page.
    #[must_use]
    pub fn featured(&self, n: usize) -> &[Product] {
        let end = n.min(self.products.len());
        self.products.get(..end).unwrap_or_default()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    category: Category,
    description: &str,
    price: Decimal,
    images: &[&str],
    care_level: CareLevel,
    light: LightRequirement,
) -> Product {
    Product {
        // Seed ids are literals and always valid.
        id: ProductId::parse(id).unwrap_or_else(|_| unreachable!("invalid seed id {id}")),
        name: name.to_owned(),
        category,
        description: description.to_owned(),
        price,
        images: images.iter().map(|s| (*s).to_owned()).collect(),
        care_level,
        light,
    }
}

#[allow(clippy::too_many_lines)]
fn seed_products() -> Vec<Product> {
    vec![
        product(
            "1",
            "Anubias Nana",
            Category::Anubias,
            "A miniature version of Anubias Nana, perfect for nano tanks and foreground detail. Extremely hardy.",
            Decimal::new(120, 0),
            &[
                "https://buceplant.com/cdn/shop/products/anubias-nana-30660796612808_800x533.jpg?v=1628343226&auto=format&fit=crop",
                "https://i.postimg.cc/fTCmR9nL/Whats-App-Image-2026-01-05-at-16-37-57.jpg&auto=format&fit=extend",
            ],
            CareLevel::Easy,
            LightRequirement::Low,
        ),
        product(
            "2",
            "Java Fern",
            Category::Fern,
            "Elegant, multi-lobed leaves that create a lush, textured background. Great for low-tech setups.",
            Decimal::new(50, 0),
            &[
                "https://images.unsplash.com/photo-1599423230689-d12df718e24c?q=80&w=800&auto=format&fit=crop",
                "https://images.unsplash.com/photo-1463936575829-25148e1db1b8?q=80&w=800&auto=format&fit=crop",
            ],
            CareLevel::Easy,
            LightRequirement::Low,
        ),
        product(
            "3",
            "Cryptocoryne Wendtii Brown",
            Category::Crypt,
            "A classic foreground or midground plant with beautiful bronzed-brown foliage.",
            Decimal::new(40, 0),
            &[
                "https://images.unsplash.com/photo-1463936575829-25148e1db1b8?q=80&w=800&auto=format&fit=crop",
                "https://images.unsplash.com/photo-1416870230247-3b4a33c47353?q=80&w=800&auto=format&fit=crop",
            ],
            CareLevel::Moderate,
            LightRequirement::Medium,
        ),
        product(
            "4",
            "Bucephalandra Brownie Ghost",
            Category::Decorative,
            "Rare and sought after for its metallic purple and green hues. Slow growing but stunning.",
            Decimal::new(2400, 2),
            &[
                "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?q=80&w=800&auto=format&fit=crop",
                "https://images.unsplash.com/photo-1614594975525-e45190c55d0b?q=80&w=800&auto=format&fit=crop",
            ],
            CareLevel::Moderate,
            LightRequirement::Medium,
        ),
        product(
            "5",
            "Amazon Sword",
            Category::Stem,
            "A centerpiece plant that grows large, providing ample cover for fish. Needs nutritious substrate.",
            Decimal::new(1800, 2),
            &[
                "https://images.unsplash.com/photo-1416870230247-3b4a33c47353?q=80&w=800&auto=format&fit=crop",
                "https://images.unsplash.com/photo-1463936575829-25148e1db1b8?q=80&w=800&auto=format&fit=crop",
            ],
            CareLevel::Moderate,
            LightRequirement::Medium,
        ),
        product(
            "6",
            "Silver Pothos",
            Category::Decorative,
            "Excellent for riparian growth (roots in water, leaves out). Natural nitrate filter.",
            Decimal::new(40, 0),
            &[
                "https://images.unsplash.com/photo-1614594975525-e45190c55d0b?q=80&w=800&auto=format&fit=crop",
                "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?q=80&w=800&auto=format&fit=crop",
            ],
            CareLevel::Easy,
            LightRequirement::Low,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_seed_order_and_size() {
        let catalog = Catalog::seeded();
        let all: Vec<&Product> = catalog.list_all().iter().collect();
        assert_eq!(ids(&all), ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let catalog = Catalog::seeded();
        let mut seen: Vec<&ProductId> = catalog.list_all().iter().map(|p| &p.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), catalog.list_all().len());
    }

    #[test]
    fn test_seed_prices_non_negative() {
        assert!(
            Catalog::seeded()
                .list_all()
                .iter()
                .all(|p| p.price >= Decimal::ZERO)
        );
    }

    #[test]
    fn test_filter_all_is_identity() {
        let catalog = Catalog::seeded();
        let filtered = filter_by_category(catalog.list_all(), CategoryFilter::All);
        assert_eq!(filtered.len(), catalog.list_all().len());
        assert!(
            filtered
                .iter()
                .zip(catalog.list_all())
                .all(|(a, b)| *a == b)
        );
    }

    #[test]
    fn test_filter_fern() {
        let catalog = Catalog::seeded();
        let ferns = catalog.filtered(CategoryFilter::Only(Category::Fern));
        assert_eq!(ids(&ferns), ["2"]);
        assert!(ferns.iter().all(|p| p.category == Category::Fern));
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let catalog = Catalog::seeded();
        let decorative = catalog.filtered(CategoryFilter::Only(Category::Decorative));
        assert_eq!(ids(&decorative), ["4", "6"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = Catalog::seeded();
        let filter = CategoryFilter::Only(Category::Decorative);
        let once: Vec<Product> = catalog.filtered(filter).into_iter().cloned().collect();
        let twice = filter_by_category(&once, filter);
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn test_filter_category_without_products() {
        let catalog = Catalog::new(vec![catalog_head()]);
        assert!(
            catalog
                .filtered(CategoryFilter::Only(Category::Stem))
                .is_empty()
        );
    }

    fn catalog_head() -> Product {
        Catalog::seeded().list_all()[0].clone()
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::seeded();
        let id = ProductId::parse("5").unwrap();
        assert_eq!(catalog.find(&id).unwrap().name, "Amazon Sword");
        assert!(catalog.find(&ProductId::parse("99").unwrap()).is_none());
    }

    #[test]
    fn test_featured() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.featured(3).len(), 3);
        assert_eq!(catalog.featured(3)[0].name, "Anubias Nana");
        assert_eq!(catalog.featured(50).len(), 6);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "fern".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Fern)
        );
        assert!("Cactus".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_filter_choices_order() {
        let names: Vec<&str> = CategoryFilter::choices()
            .into_iter()
            .map(CategoryFilter::as_str)
            .collect();
        assert_eq!(
            names,
            ["All", "Anubias", "Fern", "Crypt", "Stem", "Decorative"]
        );
    }

    #[test]
    fn test_filter_serde_uses_names() {
        let json = serde_json::to_string(&CategoryFilter::Only(Category::Crypt)).unwrap();
        assert_eq!(json, "\"Crypt\"");
        let back: CategoryFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CategoryFilter::Only(Category::Crypt));
    }
}
