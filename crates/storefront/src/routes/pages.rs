//! Top-level page route handlers: home, shop and about.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use aquacafe_core::{CategoryFilter, View};

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::StorefrontSession;
use crate::state::AppState;

use super::NavContext;
use super::products::ProductCardView;

/// Number of products in the home page's "Staff Favorites" row.
pub const FEATURED_COUNT: usize = 3;

/// A category filter button.
#[derive(Clone)]
pub struct FilterButton {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

impl FilterButton {
    fn new(filter: CategoryFilter, selected: CategoryFilter) -> Self {
        Self {
            label: filter.as_str(),
            href: format!("{}?category={}", View::Shop.path(), filter.as_str()),
            active: filter == selected,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub nav: NavContext,
    pub featured: Vec<ProductCardView>,
}

/// Plant library template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/shop.html")]
pub struct ShopTemplate {
    pub nav: NavContext,
    pub category_filters: Vec<FilterButton>,
    pub products: Vec<ProductCardView>,
}

/// Our story template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub nav: NavContext,
}

/// Query parameters for the plant library.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

/// Display the home page.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: StorefrontSession,
) -> Result<HomeTemplate> {
    Ok(HomeTemplate {
        nav: NavContext::load(Some(View::Home), &session).await?,
        featured: state
            .catalog()
            .featured(FEATURED_COUNT)
            .iter()
            .map(ProductCardView::from)
            .collect(),
    })
}

/// Display the plant library.
///
/// An explicit `category` is remembered in the session; without one the
/// remembered filter applies.
///
/// # Errors
///
/// Returns 400 for an unknown category.
#[instrument(skip(state, session))]
pub async fn shop(
    State(state): State<AppState>,
    session: StorefrontSession,
    Query(query): Query<ShopQuery>,
) -> Result<ShopTemplate> {
    let selected = match query.category.as_deref() {
        Some(raw) => {
            let filter = raw
                .parse::<CategoryFilter>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            session.set_category(filter).await?;
            filter
        }
        None => session.category().await?,
    };

    let products = state
        .catalog()
        .filtered(selected)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    Ok(ShopTemplate {
        nav: NavContext::load(Some(View::Shop), &session).await?,
        category_filters: CategoryFilter::choices()
            .into_iter()
            .map(|filter| FilterButton::new(filter, selected))
            .collect(),
        products,
    })
}

/// Display the about page.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn about(session: StorefrontSession) -> Result<AboutTemplate> {
    Ok(AboutTemplate {
        nav: NavContext::load(Some(View::About), &session).await?,
    })
}
