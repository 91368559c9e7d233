//! Carts Repository

use jiff::Timestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_get_timestamp,
    domain::{
        carts::models::{CartContact, CartIdentity, CartUuid},
        customers::models::CustomerUuid,
        promo_codes::models::PromoCodeUuid,
    },
};

const FIND_CART_SQL: &str = include_str!("../sql/find_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const UPDATE_CART_SQL: &str = include_str!("../sql/update_cart.sql");
const SET_CART_PROMO_CODE_SQL: &str = include_str!("../sql/set_cart_promo_code.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");

/// Cart header without its lines.
#[derive(Debug, Clone)]
pub(crate) struct CartRow {
    pub uuid: CartUuid,
    pub customer: Option<CustomerUuid>,
    pub ip_address: Option<String>,
    pub promo_code: Option<PromoCodeUuid>,
    pub contact: CartContact,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        identity: &CartIdentity,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        query_as::<Postgres, CartRow>(FIND_CART_SQL)
            .bind(identity.customer.map(CustomerUuid::into_uuid))
            .bind(identity.ip_address())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::find_cart`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        identity: &CartIdentity,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        query_as::<Postgres, CartRow>(LOCK_CART_SQL)
            .bind(identity.customer.map(CustomerUuid::into_uuid))
            .bind(identity.ip_address())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a cart, or merge into the one already stored under `identity_key`.
    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CartUuid,
        identity_key: &str,
        identity: &CartIdentity,
        contact: &CartContact,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(CREATE_CART_SQL)
            .bind(uuid.into_uuid())
            .bind(identity_key)
            .bind(identity.customer.map(CustomerUuid::into_uuid))
            .bind(identity.ip_address())
            .bind(contact.name.as_deref())
            .bind(contact.email.as_deref())
            .bind(contact.phone.as_deref())
            .bind(contact.address.as_deref())
            .bind(contact.city.as_deref())
            .bind(contact.state.as_deref())
            .bind(contact.country.as_deref())
            .bind(contact.zip_code.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite the contact fields that were supplied and fill in a missing identity half.
    ///
    /// A customer adopting an anonymous cart takes it over under `identity_key`, which frees the
    /// address key for the next anonymous visitor.
    pub(crate) async fn update_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        identity_key: &str,
        identity: &CartIdentity,
        contact: &CartContact,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(UPDATE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(identity.customer.map(CustomerUuid::into_uuid))
            .bind(identity.ip_address())
            .bind(contact.name.as_deref())
            .bind(contact.email.as_deref())
            .bind(contact.phone.as_deref())
            .bind(contact.address.as_deref())
            .bind(contact.city.as_deref())
            .bind(contact.state.as_deref())
            .bind(contact.country.as_deref())
            .bind(contact.zip_code.as_deref())
            .bind(identity_key)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_promo_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        promo_code: Option<PromoCodeUuid>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_CART_PROMO_CODE_SQL)
            .bind(cart.into_uuid())
            .bind(promo_code.map(PromoCodeUuid::into_uuid))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Delete a cart header. Its lines go with it.
    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            customer: row
                .try_get::<Option<Uuid>, _>("customer_uuid")?
                .map(CustomerUuid::from_uuid),
            ip_address: row.try_get("ip_address")?,
            promo_code: row
                .try_get::<Option<Uuid>, _>("promo_code_uuid")?
                .map(PromoCodeUuid::from_uuid),
            contact: CartContact {
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
                address: row.try_get("address")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                country: row.try_get("country")?,
                zip_code: row.try_get("zip_code")?,
            },
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
