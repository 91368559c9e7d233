//! State

use std::sync::Arc;

use pillbox_app::{
    auth::AuthService,
    context::AppContext,
    domain::{
        carts::CartsService, catalog::CatalogService, orders::OrdersService,
        promo_codes::PromoCodesService,
    },
};

/// Services shared by every handler.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) catalog: Arc<dyn CatalogService>,
    pub(crate) promo_codes: Arc<dyn PromoCodesService>,
    pub(crate) carts: Arc<dyn CartsService>,
    pub(crate) orders: Arc<dyn OrdersService>,
    pub(crate) auth: Arc<dyn AuthService>,
}

impl State {
    #[must_use]
    pub(crate) fn new(
        catalog: Arc<dyn CatalogService>,
        promo_codes: Arc<dyn PromoCodesService>,
        carts: Arc<dyn CartsService>,
        orders: Arc<dyn OrdersService>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            catalog,
            promo_codes,
            carts,
            orders,
            auth,
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: &AppContext) -> Arc<Self> {
        Arc::new(Self::new(
            Arc::clone(&app.catalog),
            Arc::clone(&app.promo_codes),
            Arc::clone(&app.carts),
            Arc::clone(&app.orders),
            Arc::clone(&app.auth),
        ))
    }
}
