//! Test context for service-level integration tests.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        carts::PgCartsService, catalog::PgCatalogService, customers::PgCustomersService,
        orders::PgOrdersService, promo_codes::PgPromoCodesService,
    },
};

use super::db::TestDb;

/// Every service wired to one freshly migrated database.
pub struct TestContext {
    pub db: TestDb,
    pub wake: Arc<Notify>,
    pub catalog: PgCatalogService,
    pub promo_codes: PgPromoCodesService,
    pub carts: PgCartsService,
    pub orders: PgOrdersService,
    pub customers: PgCustomersService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());
        let wake = Arc::new(Notify::new());

        Self {
            catalog: PgCatalogService::new(db.clone()),
            promo_codes: PgPromoCodesService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            orders: PgOrdersService::new(db.clone(), Arc::clone(&wake)),
            customers: PgCustomersService::new(db),
            auth: PgAuthService::new(test_db.pool().clone()),
            wake,
            db: test_db,
        }
    }

    /// A handle for code that is built from a [`Db`] rather than a service.
    pub fn database(&self) -> Db {
        Db::new(self.db.pool().clone())
    }
}
