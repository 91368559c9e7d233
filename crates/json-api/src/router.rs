//! App Router

use salvo::Router;

use crate::{auth, carts, healthcheck, orders, products, promo_codes};

/// Every public route, without docs or metrics.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("products/{product}").get(products::get::handler))
        .push(Router::with_path("promo-codes/{code}").get(promo_codes::get::handler))
        .push(
            Router::with_path("cart")
                .hoop(auth::middleware::optional)
                .get(carts::get::handler)
                .put(carts::update::handler)
                .delete(carts::delete::handler)
                .push(
                    Router::with_path("items/{product}/{pack_size}")
                        .delete(carts::items::delete::handler),
                )
                .push(
                    Router::with_path("promo-code")
                        .put(carts::promo_code::update::handler)
                        .delete(carts::promo_code::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .hoop(auth::middleware::handler)
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("checkout").post(orders::checkout::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .patch(orders::update::handler),
                ),
        )
}
