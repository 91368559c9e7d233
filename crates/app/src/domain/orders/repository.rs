//! Orders Repository

use pillbox::{
    pricing::{LinePrice, Quantity},
    totals::Totals,
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{
        column_decode, column_encode, try_get_optional_discount_rule, try_get_parsed,
        try_get_timestamp,
    },
    dispatch::models::{OrderEventKind, OrderEventUuid},
    domain::{
        catalog::models::{PackSizeUuid, ProductUuid},
        customers::models::CustomerUuid,
        orders::models::{
            AppliedPromoCode, ContactDetails, Order, OrderItem, OrderItemUuid, OrderStatus,
            OrderUuid, PaymentStatus,
        },
        promo_codes::models::PromoCodeUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const CREATE_ORDER_EVENT_SQL: &str = include_str!("sql/create_order_event.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const UPDATE_ORDER_SQL: &str = include_str!("sql/update_order.sql");

/// Order header ready to insert.
#[derive(Debug)]
pub(crate) struct NewOrderHeader<'a> {
    pub uuid: OrderUuid,
    pub customer: CustomerUuid,
    pub contact: &'a ContactDetails,
    pub totals: &'a Totals,
    pub promo_code: Option<&'a AppliedPromoCode>,
}

/// A priced line ready to snapshot.
#[derive(Debug, Clone)]
pub(crate) struct NewOrderLine {
    pub product: ProductUuid,
    pub pack_size: PackSizeUuid,
    pub product_title: String,
    pub size: String,
    pub price: LinePrice,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        header: &NewOrderHeader<'_>,
    ) -> Result<Order, sqlx::Error> {
        let contact = header.contact;
        let promo_code = header.promo_code;

        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(header.uuid.into_uuid())
            .bind(header.customer.into_uuid())
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.address)
            .bind(&contact.city)
            .bind(&contact.state)
            .bind(&contact.country)
            .bind(&contact.zip_code)
            .bind(header.totals.subtotal)
            .bind(header.totals.total)
            .bind(header.totals.promo_discount)
            .bind(header.totals.shipping_charge)
            .bind(header.totals.grand_total)
            .bind(promo_code.and_then(|promo| promo.uuid.map(PromoCodeUuid::into_uuid)))
            .bind(promo_code.map(|promo| promo.code.as_str()))
            .bind(promo_code.map(|promo| promo.rule.kind().as_str()))
            .bind(promo_code.map(|promo| promo.rule.amount()))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: i32,
        line: &NewOrderLine,
    ) -> Result<OrderItem, sqlx::Error> {
        query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(line.product.into_uuid())
            .bind(line.pack_size.into_uuid())
            .bind(&line.product_title)
            .bind(&line.size)
            .bind(i32::try_from(line.price.quantity).map_err(column_encode)?)
            .bind(line.price.unit_price)
            .bind(line.price.unit_discount())
            .bind(line.price.original_subtotal)
            .bind(line.price.discount)
            .bind(line.price.total)
            .bind(position)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        kind: OrderEventKind,
    ) -> Result<OrderEventUuid, sqlx::Error> {
        let uuid = OrderEventUuid::new();

        query(CREATE_ORDER_EVENT_SQL)
            .bind(uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(kind.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(uuid)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Items of several orders, grouped by order and in position order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        payment_status: Option<PaymentStatus>,
        payment_detail: Option<serde_json::Value>,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(payment_status.as_ref().map(PaymentStatus::as_str))
            .bind(payment_detail)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let promo_code = match (
            row.try_get::<Option<String>, _>("promo_code")?,
            try_get_optional_discount_rule(row, "promo_discount_type", "promo_discount_amount")?,
        ) {
            (Some(code), Some(rule)) => Some(AppliedPromoCode {
                uuid: row
                    .try_get::<Option<Uuid>, _>("promo_code_uuid")?
                    .map(PromoCodeUuid::from_uuid),
                code,
                rule,
            }),
            _ => None,
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            contact: ContactDetails {
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
                address: row.try_get("address")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                country: row.try_get("country")?,
                zip_code: row.try_get("zip_code")?,
            },
            items: Vec::new(),
            promo_code,
            totals: Totals {
                subtotal: row.try_get("subtotal")?,
                total: row.try_get("total")?,
                promo_discount: row.try_get("promo_discount")?,
                shipping_charge: row.try_get("shipping_charge")?,
                grand_total: row.try_get("grand_total")?,
            },
            status: try_get_parsed(row, "status")?,
            payment_status: try_get_parsed(row, "payment_status")?,
            payment_detail: row.try_get("payment_detail")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            pack_size: PackSizeUuid::from_uuid(row.try_get("pack_size_uuid")?),
            product_title: row.try_get("product_title")?,
            size: row.try_get("pack_size")?,
            quantity: Quantity::try_from(quantity)
                .map_err(|error| column_decode("quantity", error))?,
            unit_price: row.try_get("unit_price")?,
            unit_discount: row.try_get("unit_discount")?,
            line_subtotal: row.try_get("line_subtotal")?,
            line_discount: row.try_get("line_discount")?,
            line_total: row.try_get("line_total")?,
            position: row.try_get("position")?,
        })
    }
}
