//! Orders service.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pillbox::{
    promo_codes,
    totals::{ShippingPolicy, aggregate},
};
use sqlx::{Postgres, Transaction};
use tokio::sync::Notify;
use tracing::info;

use crate::{
    database::Db,
    dispatch::models::OrderEventKind,
    domain::{
        carts::{
            models::{CartContact, CartIdentity},
            repositories::{CartLine, PgCartItemsRepository, PgCartsRepository},
        },
        catalog::{
            models::{PackSizeQuote, PackSizeUuid},
            repository::PgCatalogRepository,
        },
        customers::models::CustomerUuid,
        orders::{
            errors::OrdersServiceError,
            models::{
                AppliedPromoCode, ContactDetails, NewOrder, Order, OrderStatus, OrderUpdate,
                OrderUuid,
            },
            repository::{NewOrderHeader, NewOrderLine, PgOrdersRepository},
        },
        promo_codes::{models::PromoCode, repository::PgPromoCodesRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    wake: Arc<Notify>,
    orders_repository: PgOrdersRepository,
    catalog_repository: PgCatalogRepository,
    promo_codes_repository: PgPromoCodesRepository,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
}

impl PgOrdersService {
    /// `wake` is notified after every committed order so the event dispatcher can pick it up.
    #[must_use]
    pub fn new(db: Db, wake: Arc<Notify>) -> Self {
        Self {
            db,
            wake,
            orders_repository: PgOrdersRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
            promo_codes_repository: PgPromoCodesRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
        }
    }

    /// Price the lines with checkout shipping and write the header, lines and the
    /// `order.created` event.
    async fn place_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        contact: &ContactDetails,
        lines: Vec<NewOrderLine>,
        promo_code: Option<AppliedPromoCode>,
    ) -> Result<Order, OrdersServiceError> {
        let totals = aggregate(
            lines.iter().map(|line| &line.price),
            promo_code.as_ref().map(|promo| &promo.rule),
            ShippingPolicy::checkout(),
        );

        let mut order = self
            .orders_repository
            .create_order(
                tx,
                &NewOrderHeader {
                    uuid: OrderUuid::new(),
                    customer,
                    contact,
                    totals: &totals,
                    promo_code: promo_code.as_ref(),
                },
            )
            .await?;

        for (position, line) in (0_i32..).zip(&lines) {
            let item = self
                .orders_repository
                .create_order_item(tx, order.uuid, position, line)
                .await?;

            order.items.push(item);
        }

        self.orders_repository
            .create_order_event(tx, order.uuid, OrderEventKind::OrderCreated)
            .await?;

        Ok(order)
    }

    fn order_placed(&self, order: &Order) {
        self.wake.notify_one();

        info!(
            order_uuid = %order.uuid,
            customer_uuid = %order.customer,
            grand_total = %order.totals.grand_total,
            items = order.items.len(),
            "placed order"
        );
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [Order],
    ) -> Result<(), OrdersServiceError> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items_by_order: HashMap<OrderUuid, Vec<_>> = HashMap::new();

        for item in self.orders_repository.get_order_items(tx, &uuids).await? {
            items_by_order.entry(item.order).or_default().push(item);
        }

        for order in orders {
            order.items = items_by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }
}

fn snapshot(quote: PackSizeQuote, price: pillbox::pricing::LinePrice) -> NewOrderLine {
    NewOrderLine {
        product: quote.product,
        pack_size: quote.pack_size,
        product_title: quote.product_title,
        size: quote.size,
        price,
    }
}

fn applied(promo_code: PromoCode) -> AppliedPromoCode {
    AppliedPromoCode {
        uuid: Some(promo_code.uuid),
        code: promo_code.terms.code,
        rule: promo_code.terms.rule,
    }
}

/// Supplied fields win over the ones saved on the cart.
fn merge_contact(supplied: CartContact, saved: CartContact) -> CartContact {
    CartContact {
        name: supplied.name.or(saved.name),
        email: supplied.email.or(saved.email),
        phone: supplied.phone.or(saved.phone),
        address: supplied.address.or(saved.address),
        city: supplied.city.or(saved.city),
        state: supplied.state.or(saved.state),
        country: supplied.country.or(saved.country),
        zip_code: supplied.zip_code.or(saved.zip_code),
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(customer_uuid = %customer, item_count = order.items.len()),
        err
    )]
    async fn create_order(
        &self,
        customer: CustomerUuid,
        order: NewOrder,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let contact = order.contact.validated()?;

        if order.items.is_empty() {
            return Err(OrdersServiceError::Validation(
                "an order needs at least one item".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let requested: Vec<PackSizeUuid> = order.items.iter().map(|item| item.pack_size).collect();

        let quotes: HashMap<PackSizeUuid, PackSizeQuote> = self
            .catalog_repository
            .quote_pack_sizes(&mut tx, &requested)
            .await?
            .into_iter()
            .map(|quote| (quote.pack_size, quote))
            .collect();

        let invalid: Vec<PackSizeUuid> = order
            .items
            .iter()
            .filter(|item| {
                quotes
                    .get(&item.pack_size)
                    .is_none_or(|quote| quote.product != item.product)
            })
            .map(|item| item.pack_size)
            .collect();

        if !invalid.is_empty() {
            return Err(OrdersServiceError::InvalidPackSizes(invalid));
        }

        let lines: Vec<NewOrderLine> = order
            .items
            .iter()
            .filter_map(|item| {
                let quote = quotes.get(&item.pack_size)?.clone();
                let price = quote.price_line(item.quantity);

                Some(snapshot(quote, price))
            })
            .collect();

        let promo_code = match order
            .promo_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
        {
            Some(code) => {
                let found = self
                    .promo_codes_repository
                    .find_by_code(&mut tx, code)
                    .await?;

                let subtotal =
                    aggregate(lines.iter().map(|line| &line.price), None, ShippingPolicy::Excluded)
                        .subtotal;

                promo_codes::validate(found.as_ref().map(|promo| &promo.terms), now, subtotal)?;

                found.map(applied)
            }
            None => None,
        };

        let created = self
            .place_order(&mut tx, customer, &contact, lines, promo_code)
            .await?;

        tx.commit().await?;

        self.order_placed(&created);

        Ok(created)
    }

    #[tracing::instrument(name = "orders.service.checkout_cart", skip(self, contact), err)]
    async fn checkout_cart(
        &self,
        identity: CartIdentity,
        contact: CartContact,
    ) -> Result<Order, OrdersServiceError> {
        let customer = identity
            .customer
            .ok_or(OrdersServiceError::CustomerRequired)?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_cart(&mut tx, &identity)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let contact = ContactDetails::try_from(merge_contact(contact, cart.contact.clone()))?;

        let lines: Vec<NewOrderLine> = self
            .cart_items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?
            .into_iter()
            .map(|CartLine { quantity, quote, .. }| {
                let price = quote.price_line(quantity);

                snapshot(quote, price)
            })
            .collect();

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let promo_code = match cart.promo_code {
            Some(uuid) => self
                .promo_codes_repository
                .find_by_uuid(&mut tx, uuid)
                .await?
                .map(applied),
            None => None,
        };

        let created = self
            .place_order(&mut tx, customer, &contact, lines, promo_code)
            .await?;

        self.carts_repository.delete_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        self.order_placed(&created);

        Ok(created)
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(customer_uuid = %customer, order_uuid = %order),
        err
    )]
    async fn get_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = [self
            .orders_repository
            .get_order(&mut tx, customer, order)
            .await?];

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        let [order] = orders;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self),
        fields(customer_uuid = %customer),
        err
    )]
    async fn list_orders(&self, customer: CustomerUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders_repository.list_orders(&mut tx, customer).await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_order",
        skip(self, update),
        fields(customer_uuid = %customer, order_uuid = %order, cancel = update.cancel),
        err
    )]
    async fn update_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders_repository
            .lock_order(&mut tx, customer, order)
            .await?;

        let status = if update.cancel {
            if !current.status.is_cancellable() {
                return Err(OrdersServiceError::NotCancellable);
            }

            OrderStatus::Cancelled
        } else {
            current.status
        };

        let updated = self
            .orders_repository
            .update_order(
                &mut tx,
                order,
                status,
                update.payment_status,
                update.payment_detail,
            )
            .await?;

        let mut orders = [updated];

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        let [updated] = orders;

        if updated.status != current.status {
            info!(order_uuid = %order, status = updated.status.as_str(), "order status changed");
        }

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order for explicit lines, priced from the live catalog.
    async fn create_order(
        &self,
        customer: CustomerUuid,
        order: NewOrder,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError>;

    /// Turn the identity's cart into an order and delete the cart.
    async fn checkout_cart(
        &self,
        identity: CartIdentity,
        contact: CartContact,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve one of the customer's orders.
    async fn get_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// The customer's orders, newest first.
    async fn list_orders(&self, customer: CustomerUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Cancel an order or record payment details.
    async fn update_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<Order, OrdersServiceError>;
}
