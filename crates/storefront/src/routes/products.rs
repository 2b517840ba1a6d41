//! Product card route handlers.
//!
//! Cards are rendered server-side. The carousel arrows re-request the card
//! with a different image index and HTMX swaps it in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use aquacafe_core::{Carousel, Product, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;

const DOT: &str = "carousel-dot";
const DOT_ACTIVE: &str = "carousel-dot is-active";

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub description: String,
    pub price: String,
    /// URL of the image currently showing.
    pub image: Option<String>,
    /// 1-based position of the image, for alt text.
    pub position: usize,
    pub prev: usize,
    pub next: usize,
    pub has_controls: bool,
    /// CSS class per image; the showing one is marked active.
    pub dots: Vec<&'static str>,
    pub light: &'static str,
    pub care_level: &'static str,
}

impl ProductCardView {
    /// Card for `product` showing image `index` (clamped into range).
    #[must_use]
    pub fn new(product: &Product, index: usize) -> Self {
        let carousel = Carousel::new(product.images.len(), index);
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.as_str(),
            description: product.description.clone(),
            price: product.unit_price().display(),
            image: product.images.get(carousel.index()).cloned(),
            position: carousel.index() + 1,
            prev: carousel.prev(),
            next: carousel.next(),
            has_controls: carousel.has_controls(),
            dots: (0..carousel.len())
                .map(|i| if i == carousel.index() { DOT_ACTIVE } else { DOT })
                .collect(),
            light: product.light.as_str(),
            care_level: product.care_level.as_str(),
        }
    }
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self::new(product, 0)
    }
}

/// Product card fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_card.html")]
pub struct ProductCardTemplate {
    pub card: ProductCardView,
}

/// Query parameters for the card fragment.
#[derive(Debug, Deserialize)]
pub struct CardQuery {
    #[serde(default)]
    pub image: usize,
}

/// Render a product card showing the requested image.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state))]
pub async fn card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CardQuery>,
) -> Result<ProductCardTemplate> {
    let product = ProductId::parse(&id)
        .ok()
        .and_then(|id| state.catalog().find(&id))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductCardTemplate {
        card: ProductCardView::new(product, query.image),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aquacafe_core::Catalog;

    use super::*;

    fn product(id: &str) -> Product {
        Catalog::seeded()
            .find(&ProductId::parse(id).unwrap())
            .unwrap()
            .clone()
    }

    #[test]
    fn test_card_view_wraps_controls() {
        let mut plant = product("1");
        plant.images = vec!["a".into(), "b".into(), "c".into()];

        let first = ProductCardView::new(&plant, 0);
        assert_eq!(first.image.as_deref(), Some("a"));
        assert_eq!(first.prev, 2);
        assert_eq!(first.next, 1);
        assert!(first.has_controls);
        assert_eq!(first.dots, vec![DOT_ACTIVE, DOT, DOT]);

        let last = ProductCardView::new(&plant, 2);
        assert_eq!(last.next, 0);
        assert_eq!(last.position, 3);
    }

    #[test]
    fn test_card_view_clamps_index() {
        let mut plant = product("2");
        plant.images = vec!["only".into()];
        let card = ProductCardView::new(&plant, 7);
        assert_eq!(card.image.as_deref(), Some("only"));
        assert!(!card.has_controls);
    }

    #[test]
    fn test_card_view_price_in_rupees() {
        let card = ProductCardView::from(&product("1"));
        assert_eq!(card.price, "Rs. 120.00");
        assert_eq!(card.category, "Anubias");
    }
}
