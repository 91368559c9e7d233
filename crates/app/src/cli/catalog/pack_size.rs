use clap::{Args, Subcommand};
use pillbox_app::domain::catalog::{
    CatalogService,
    models::{NewPackSize, PackSize, PackSizeUuid, ProductUuid},
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Subcommand)]
pub(crate) enum PackSizeSubcommand {
    /// Add a purchasable pack size to a product
    Create(CreatePackSizeArgs),

    /// Change the live price of a pack size
    Price(PackSizePriceArgs),

    /// Delete a pack size no order refers to
    Delete(DeletePackSizeArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CreatePackSizeArgs {
    /// Product UUID
    #[arg(long)]
    product: Uuid,

    /// Label, e.g. "60 capsules"
    #[arg(long)]
    size: String,

    /// Unit price in store currency
    #[arg(long)]
    price: Decimal,
}

#[derive(Debug, Args)]
pub(crate) struct PackSizePriceArgs {
    /// Pack size UUID
    #[arg(long)]
    uuid: Uuid,

    /// New unit price in store currency
    #[arg(long)]
    price: Decimal,
}

#[derive(Debug, Args)]
pub(crate) struct DeletePackSizeArgs {
    /// Pack size UUID
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(
    service: &dyn CatalogService,
    command: PackSizeSubcommand,
) -> Result<(), String> {
    let pack_size = match command {
        PackSizeSubcommand::Create(args) => service
            .create_pack_size(NewPackSize {
                uuid: PackSizeUuid::new(),
                product: ProductUuid::from_uuid(args.product),
                size: args.size,
                price: args.price,
            })
            .await
            .map_err(|error| format!("failed to create pack size: {error}"))?,
        PackSizeSubcommand::Price(args) => service
            .update_pack_size_price(PackSizeUuid::from_uuid(args.uuid), args.price)
            .await
            .map_err(|error| format!("failed to update pack size: {error}"))?,
        PackSizeSubcommand::Delete(args) => {
            service
                .delete_pack_size(PackSizeUuid::from_uuid(args.uuid))
                .await
                .map_err(|error| format!("failed to delete pack size: {error}"))?;

            println!("pack size {} deleted", args.uuid);

            return Ok(());
        }
    };

    print_pack_size(&pack_size);

    Ok(())
}

fn print_pack_size(pack_size: &PackSize) {
    println!("pack_size_uuid: {}", pack_size.uuid);
    println!("product_uuid: {}", pack_size.product);
    println!("size: {}", pack_size.size);
    println!("price: {}", pack_size.price);
}
