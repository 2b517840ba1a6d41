//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (hero + staff favorites)
//! GET  /shop?category=<filter> - Plant library with category filter
//! GET  /about                  - Our story
//! GET  /health                 - Health check
//!
//! # Products (HTMX fragments)
//! GET  /products/{id}/card?image=N - Product card showing image N
//!
//! # Cart
//! GET  /cart                   - Cart page
//! GET  /cart/drawer            - Open cart drawer (fragment)
//! POST /cart/add               - Add one (returns drawer, triggers cart-updated)
//! POST /cart/update            - Change quantity by delta (returns drawer)
//! POST /cart/remove            - Remove line (returns drawer)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # AquaBot consultant (HTMX fragments)
//! GET  /consultant             - Consultant panel
//! POST /consultant             - Ask (multipart prompt + image), returns messages
//! ```

pub mod cart;
pub mod consultant;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use aquacafe_core::View;

use crate::error::Result;
use crate::models::StorefrontSession;
use crate::state::AppState;

/// HTMX event fired whenever the session cart changes.
pub const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// One entry in the top navigation.
#[derive(Clone)]
pub struct NavLink {
    pub path: &'static str,
    pub title: &'static str,
    pub active: bool,
}

/// Data every full page needs for its header.
#[derive(Clone)]
pub struct NavContext {
    pub links: Vec<NavLink>,
    pub cart_count: u32,
}

impl NavContext {
    /// Build the header for a page, marking `active` as the current view.
    #[must_use]
    pub fn new(active: Option<View>, cart_count: u32) -> Self {
        Self {
            links: View::ALL
                .into_iter()
                .map(|view| NavLink {
                    path: view.path(),
                    title: view.title(),
                    active: Some(view) == active,
                })
                .collect(),
            cart_count,
        }
    }

    /// Build the header using the session's cart count.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(active: Option<View>, session: &StorefrontSession) -> Result<Self> {
        let cart_count = session.cart().await?.item_count();
        Ok(Self::new(active, cart_count))
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{id}/card", get(products::card))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/drawer", get(cart::drawer))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/shop", get(pages::shop))
        .route("/about", get(pages::about))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/consultant", get(consultant::panel).post(consultant::ask))
}
