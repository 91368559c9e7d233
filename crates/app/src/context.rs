//! App Context

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Notify;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        orders::{OrdersService, PgOrdersService},
        promo_codes::{PgPromoCodesService, PromoCodesService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Services shared by request handlers.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub promo_codes: Arc<dyn PromoCodesService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,

    /// Handle for background work such as the order event dispatcher.
    pub db: Db,

    /// Notified after every placed order.
    pub order_events: Arc<Notify>,
}

impl AppContext {
    /// Build application context from a database URL, applying pending migrations when asked.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(url: &str, migrate: bool) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if migrate {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let db = Db::new(pool.clone());
        let order_events = Arc::new(Notify::new());

        Ok(Self {
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            promo_codes: Arc::new(PgPromoCodesService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), Arc::clone(&order_events))),
            auth: Arc::new(PgAuthService::new(pool)),
            db,
            order_events,
        })
    }
}
