//! Application state shared across handlers.

use std::sync::Arc;

use aquacafe_core::Catalog;

use crate::config::StorefrontConfig;
use crate::services::ConsultationService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds the read-only
/// resources every request may need: configuration, the product catalog and
/// the consultation service. Per-visitor state lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    consultant: ConsultationService,
}

impl AppState {
    /// Create application state with the seeded catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let consultant = ConsultationService::new(&config.gemini);
        Self::with_parts(config, Catalog::seeded(), consultant)
    }

    /// Create application state from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        catalog: Catalog,
        consultant: ConsultationService,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                consultant,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the AquaBot consultation service.
    #[must_use]
    pub fn consultant(&self) -> &ConsultationService {
        &self.inner.consultant
    }
}
