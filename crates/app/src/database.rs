//! Database connection management

use std::str::FromStr;

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pillbox::discounts::{DiscountKind, DiscountRule};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction, migrate::MigrateError, postgres::PgRow};

/// Handle used by services to open transactions.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// The underlying pool, for queries that run outside a transaction.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending migrations from the workspace `migrations/` directory.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

pub(crate) fn try_get_timestamp(row: &PgRow, col: &str) -> Result<Timestamp, sqlx::Error> {
    Ok(row.try_get::<SqlxTimestamp, _>(col)?.to_jiff())
}

pub(crate) fn try_get_optional_timestamp(
    row: &PgRow,
    col: &str,
) -> Result<Option<Timestamp>, sqlx::Error> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(col)?
        .map(SqlxTimestamp::to_jiff))
}

/// Decode a text column through its [`FromStr`] implementation.
pub(crate) fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(col)?;

    raw.parse().map_err(|error| column_decode(col, error))
}

/// Decode a `(discount_type, discount_amount)` column pair.
pub(crate) fn try_get_discount_rule(
    row: &PgRow,
    type_col: &str,
    amount_col: &str,
) -> Result<DiscountRule, sqlx::Error> {
    let kind: DiscountKind = try_get_parsed(row, type_col)?;
    let amount: Decimal = row.try_get(amount_col)?;

    DiscountRule::new(kind, amount).map_err(|error| column_decode(amount_col, error))
}

/// Decode an optional discount rule from nullable columns.
pub(crate) fn try_get_optional_discount_rule(
    row: &PgRow,
    type_col: &str,
    amount_col: &str,
) -> Result<Option<DiscountRule>, sqlx::Error> {
    let kind: Option<String> = row.try_get(type_col)?;

    if kind.is_none() {
        return Ok(None);
    }

    try_get_discount_rule(row, type_col, amount_col).map(Some)
}

pub(crate) fn column_decode<E>(col: &str, error: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(error),
    }
}

pub(crate) fn column_encode<E>(error: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Encode(Box::new(error))
}
