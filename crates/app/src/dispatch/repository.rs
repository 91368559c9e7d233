//! Order Events Repository

use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{try_get_parsed, try_get_timestamp},
    dispatch::models::{OrderEvent, OrderEventUuid},
    domain::orders::models::{Order, OrderUuid},
};

const CLAIM_ORDER_EVENT_SQL: &str = include_str!("sql/claim_order_event.sql");
const MARK_ORDER_EVENT_PROCESSED_SQL: &str = include_str!("sql/mark_order_event_processed.sql");
const RECORD_ORDER_EVENT_FAILURE_SQL: &str = include_str!("sql/record_order_event_failure.sql");
const GET_EVENT_ORDER_SQL: &str = include_str!("sql/get_event_order.sql");
const SET_ORDER_PAYMENT_DETAIL_SQL: &str = include_str!("sql/set_order_payment_detail.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderEventsRepository;

impl PgOrderEventsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the oldest pending event that has attempts left, skipping rows other workers hold
    /// and the ones already tried in this pass.
    pub(crate) async fn claim_order_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        max_attempts: i32,
        skip: &[OrderEventUuid],
    ) -> Result<Option<OrderEvent>, sqlx::Error> {
        let skip: Vec<Uuid> = skip.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, OrderEvent>(CLAIM_ORDER_EVENT_SQL)
            .bind(max_attempts)
            .bind(skip)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_processed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: OrderEventUuid,
    ) -> Result<(), sqlx::Error> {
        query(MARK_ORDER_EVENT_PROCESSED_SQL)
            .bind(event.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Returns the attempt count after this failure.
    pub(crate) async fn record_failure(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: OrderEventUuid,
        error: &str,
    ) -> Result<i32, sqlx::Error> {
        query_scalar::<Postgres, i32>(RECORD_ORDER_EVENT_FAILURE_SQL)
            .bind(event.into_uuid())
            .bind(error)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(GET_EVENT_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn set_payment_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        detail: Value,
    ) -> Result<(), sqlx::Error> {
        query(SET_ORDER_PAYMENT_DETAIL_SQL)
            .bind(order.into_uuid())
            .bind(detail)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for OrderEvent {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderEventUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            kind: try_get_parsed(row, "kind")?,
            attempts: row.try_get("attempts")?,
            created_at: try_get_timestamp(row, "created_at")?,
        })
    }
}
