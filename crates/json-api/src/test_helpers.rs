//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use pillbox::{
    discounts::DiscountRule,
    pricing::{LinePrice, Quantity, price_line},
    totals::{ShippingPolicy, aggregate},
};
use pillbox_app::{
    auth::MockAuthService,
    domain::{
        carts::{
            MockCartsService,
            models::{CartContact, CartUuid, PricedCart, PricedCartItem},
        },
        catalog::{
            MockCatalogService,
            models::{PackSizeUuid, ProductUuid},
        },
        customers::models::CustomerUuid,
        orders::{
            MockOrdersService,
            models::{ContactDetails, Order, OrderItem, OrderStatus, OrderUuid, PaymentStatus},
        },
        promo_codes::MockPromoCodesService,
    },
};
use rust_decimal_macros::dec;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER_UUID: CustomerUuid = CustomerUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_CLIENT_IP: &str = "203.0.113.7";

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_customer_uuid(TEST_CUSTOMER_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_catalog_mock() -> MockCatalogService {
    let mut catalog = MockCatalogService::new();

    catalog.expect_create_offer_plan().never();
    catalog.expect_set_offer_plan_status().never();
    catalog.expect_create_product().never();
    catalog.expect_get_product().never();
    catalog.expect_set_product_offer_plan().never();
    catalog.expect_create_pack_size().never();
    catalog.expect_update_pack_size_price().never();
    catalog.expect_delete_pack_size().never();

    catalog
}

fn strict_promo_codes_mock() -> MockPromoCodesService {
    let mut promo_codes = MockPromoCodesService::new();

    promo_codes.expect_create_promo_code().never();
    promo_codes.expect_update_promo_code().never();
    promo_codes.expect_toggle_promo_code_status().never();
    promo_codes.expect_delete_promo_code().never();
    promo_codes.expect_find_by_code().never();
    promo_codes.expect_list_promo_codes().never();

    promo_codes
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_upsert_cart().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();
    carts.expect_apply_promo_code().never();
    carts.expect_remove_promo_code().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_checkout_cart().never();
    orders.expect_get_order().never();
    orders.expect_list_orders().never();
    orders.expect_update_order().never();

    orders
}

pub(crate) fn state_with_catalog(catalog: MockCatalogService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(catalog),
        Arc::new(strict_promo_codes_mock()),
        Arc::new(strict_carts_mock()),
        Arc::new(strict_orders_mock()),
        Arc::new(strict_auth_mock()),
    ))
}

pub(crate) fn state_with_promo_codes(promo_codes: MockPromoCodesService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(strict_catalog_mock()),
        Arc::new(promo_codes),
        Arc::new(strict_carts_mock()),
        Arc::new(strict_orders_mock()),
        Arc::new(strict_auth_mock()),
    ))
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(strict_catalog_mock()),
        Arc::new(strict_promo_codes_mock()),
        Arc::new(carts),
        Arc::new(strict_orders_mock()),
        Arc::new(strict_auth_mock()),
    ))
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(strict_catalog_mock()),
        Arc::new(strict_promo_codes_mock()),
        Arc::new(strict_carts_mock()),
        Arc::new(orders),
        Arc::new(strict_auth_mock()),
    ))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(strict_catalog_mock()),
        Arc::new(strict_promo_codes_mock()),
        Arc::new(strict_carts_mock()),
        Arc::new(strict_orders_mock()),
        Arc::new(auth),
    ))
}

/// Public catalog routes.
pub(crate) fn catalog_service(catalog: MockCatalogService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_catalog(catalog)))
            .push(route),
    )
}

/// Public promo code routes.
pub(crate) fn promo_codes_service(promo_codes: MockPromoCodesService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_promo_codes(promo_codes)))
            .push(route),
    )
}

/// Cart routes called by [`TEST_CUSTOMER_UUID`].
pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Cart routes called without a bearer token.
pub(crate) fn anonymous_carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .push(route),
    )
}

/// Order routes called by [`TEST_CUSTOMER_UUID`].
pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Order routes called without a bearer token.
pub(crate) fn anonymous_orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .push(route),
    )
}

/// Two lines: 2 x 50.00 at 10% off and 3 x 25.00 at 5.00 off each.
fn make_lines() -> Vec<(String, String, LinePrice)> {
    vec![
        (
            "Vitamin D3".to_string(),
            "60 capsules".to_string(),
            price_line(
                dec!(50),
                Quantity::new(2).unwrap_or(Quantity::ONE),
                DiscountRule::percentage(10).ok().as_ref(),
            ),
        ),
        (
            "Magnesium".to_string(),
            "120 tablets".to_string(),
            price_line(
                dec!(25),
                Quantity::new(3).unwrap_or(Quantity::ONE),
                DiscountRule::fixed_amount(5).ok().as_ref(),
            ),
        ),
    ]
}

/// A cart with a 175.00 subtotal and a 150.00 total.
pub(crate) fn make_cart(customer: Option<CustomerUuid>) -> PricedCart {
    let items: Vec<PricedCartItem> = make_lines()
        .into_iter()
        .map(|(product_title, size, price)| PricedCartItem {
            uuid: Uuid::now_v7().into(),
            product: ProductUuid::new(),
            product_title,
            pack_size: PackSizeUuid::new(),
            size,
            price,
        })
        .collect();

    let totals = aggregate(
        items.iter().map(|item| &item.price),
        None,
        ShippingPolicy::Excluded,
    );

    PricedCart {
        uuid: CartUuid::new(),
        customer,
        ip_address: customer.is_none().then(|| TEST_CLIENT_IP.to_string()),
        contact: CartContact::default(),
        items,
        promo_code: None,
        totals,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A pending order for [`make_cart`]'s lines with the flat shipping charge applied.
pub(crate) fn make_order() -> Order {
    let uuid = OrderUuid::new();
    let lines = make_lines();

    let totals = aggregate(
        lines.iter().map(|(_, _, price)| price),
        None,
        ShippingPolicy::checkout(),
    );

    let items = lines
        .into_iter()
        .zip(1..)
        .map(|((product_title, size, price), position)| OrderItem {
            uuid: Uuid::now_v7().into(),
            order: uuid,
            product: ProductUuid::new(),
            pack_size: PackSizeUuid::new(),
            product_title,
            size,
            quantity: price.quantity,
            unit_price: price.unit_price,
            unit_discount: price.unit_discount(),
            line_subtotal: price.original_subtotal,
            line_discount: price.discount,
            line_total: price.total,
            position,
        })
        .collect();

    Order {
        uuid,
        customer: TEST_CUSTOMER_UUID,
        contact: ContactDetails {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "5551234567".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            country: "US".to_string(),
            zip_code: "62701".to_string(),
        },
        items,
        promo_code: None,
        totals,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_detail: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
