//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Mutations answer with the open
//! drawer fragment and fire `cart-updated` so the header badge refreshes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aquacafe_core::{Cart, CartLine, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::StorefrontSession;
use crate::state::AppState;

use super::{CART_UPDATED_TRIGGER, NavContext};

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub quantity: u32,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Whether there is anything to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id.to_string(),
            name: line.product.name.clone(),
            category: line.product.category.as_str(),
            quantity: line.quantity,
            line_price: line.line_price().display(),
            image: line.product.primary_image().map(str::to_owned),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal_price().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavContext,
    pub cart: CartView,
}

/// Open cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Store `cart` and answer with the drawer plus the `cart-updated` trigger.
async fn save_and_render(session: &StorefrontSession, cart: &Cart) -> Result<Response> {
    session.set_cart(cart).await?;
    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartDrawerTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response())
}

/// Display cart page.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn show(session: StorefrontSession) -> Result<CartShowTemplate> {
    let cart = session.cart().await?;
    Ok(CartShowTemplate {
        nav: NavContext::new(None, cart.item_count()),
        cart: CartView::from(&cart),
    })
}

/// Open the cart drawer (HTMX).
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn drawer(session: StorefrontSession) -> Result<CartDrawerTemplate> {
    let cart = session.cart().await?;
    Ok(CartDrawerTemplate {
        cart: CartView::from(&cart),
    })
}

/// Add one of a product to the cart (HTMX).
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: StorefrontSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = ProductId::parse(&form.product_id)
        .ok()
        .and_then(|id| state.catalog().find(&id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );

    let cart = session.cart().await?.add_item(product);
    tracing::info!(product_id = %product.id, item_count = cart.item_count(), "Added to cart");
    save_and_render(&session, &cart).await
}

/// Change a line's quantity by `delta`, never below one (HTMX).
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn update(
    session: StorefrontSession,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = session.cart().await?;
    if let Ok(id) = ProductId::parse(&form.product_id) {
        cart = cart.update_quantity(&id, form.delta);
    }
    save_and_render(&session, &cart).await
}

/// Remove a line from the cart (HTMX).
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn remove(
    session: StorefrontSession,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = session.cart().await?;
    if let Ok(id) = ProductId::parse(&form.product_id) {
        add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));
        cart = cart.remove_item(&id);
    }
    save_and_render(&session, &cart).await
}

/// Get cart count badge (HTMX).
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn count(session: StorefrontSession) -> Result<CartCountTemplate> {
    Ok(CartCountTemplate {
        count: session.cart().await?.item_count(),
    })
}
