//! Cart Items Repository

use pillbox::pricing::Quantity;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{column_decode, column_encode},
    domain::{
        carts::models::{CartItemUpdate, CartItemUuid, CartUuid, PricedCartItem},
        catalog::models::{PackSizeQuote, PackSizeUuid, ProductUuid},
    },
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("../sql/upsert_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");

/// A stored cart line joined to the live catalog.
#[derive(Debug, Clone)]
pub(crate) struct CartLine {
    pub uuid: CartItemUuid,
    pub quantity: Quantity,
    pub quote: PackSizeQuote,
}

impl CartLine {
    pub(crate) fn priced(self) -> PricedCartItem {
        let price = self.quote.price_line(self.quantity);

        PricedCartItem {
            uuid: self.uuid,
            product: self.quote.product,
            product_title: self.quote.product_title,
            pack_size: self.quote.pack_size,
            size: self.quote.size,
            price,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Set the quantity of a pack size in the cart. Returns 0 when the pack size does not
    /// belong to the product.
    pub(crate) async fn upsert_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: &CartItemUpdate,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPSERT_CART_ITEM_SQL)
            .bind(CartItemUuid::new().into_uuid())
            .bind(cart.into_uuid())
            .bind(item.product.into_uuid())
            .bind(item.pack_size.into_uuid())
            .bind(i32::try_from(item.quantity).map_err(column_encode)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
        pack_size: PackSizeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(pack_size.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            quantity: Quantity::try_from(quantity)
                .map_err(|error| column_decode("quantity", error))?,
            quote: PackSizeQuote::from_row(row)?,
        })
    }
}
