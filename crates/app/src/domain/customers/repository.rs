//! Customers Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::try_get_timestamp,
    domain::customers::models::{Customer, CustomerUuid, NewCustomer},
};

const CREATE_CUSTOMER_SQL: &str = include_str!("sql/create_customer.sql");
const GET_CUSTOMER_SQL: &str = include_str!("sql/get_customer.sql");
const FIND_CUSTOMER_BY_EMAIL_SQL: &str = include_str!("sql/find_customer_by_email.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCustomersRepository;

impl PgCustomersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: &NewCustomer,
    ) -> Result<Customer, sqlx::Error> {
        query_as::<Postgres, Customer>(CREATE_CUSTOMER_SQL)
            .bind(customer.uuid.into_uuid())
            .bind(customer.name.trim())
            .bind(customer.email.trim())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Customer, sqlx::Error> {
        query_as::<Postgres, Customer>(GET_CUSTOMER_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_customer_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        query_as::<Postgres, Customer>(FIND_CUSTOMER_BY_EMAIL_SQL)
            .bind(email.trim())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Customer {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
