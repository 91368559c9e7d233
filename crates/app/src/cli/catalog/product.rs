use clap::{Args, Subcommand};
use pillbox_app::domain::catalog::{
    CatalogService,
    models::{NewProduct, OfferPlanUuid, Product, ProductUuid},
};
use uuid::Uuid;

use super::offer_plan::print_offer_plan;

#[derive(Debug, Subcommand)]
pub(crate) enum ProductSubcommand {
    /// Create a product, optionally attached to an offer plan
    Create(CreateProductArgs),

    /// Show a product with its offer plan and pack sizes
    Show(ShowProductArgs),

    /// Attach a product to an offer plan, or detach it with --clear
    OfferPlan(SetOfferPlanArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    #[arg(long)]
    title: String,

    /// Unique URL slug
    #[arg(long)]
    slug: String,

    /// Offer plan UUID
    #[arg(long)]
    offer_plan: Option<Uuid>,
}

#[derive(Debug, Args)]
pub(crate) struct ShowProductArgs {
    /// Product UUID
    #[arg(long)]
    uuid: Uuid,
}

#[derive(Debug, Args)]
pub(crate) struct SetOfferPlanArgs {
    /// Product UUID
    #[arg(long)]
    uuid: Uuid,

    /// Offer plan UUID
    #[arg(long, required_unless_present = "clear", conflicts_with = "clear")]
    offer_plan: Option<Uuid>,

    /// Detach the product from its offer plan
    #[arg(long)]
    clear: bool,
}

pub(crate) async fn run(
    service: &dyn CatalogService,
    command: ProductSubcommand,
) -> Result<(), String> {
    let product = match command {
        ProductSubcommand::Create(args) => service
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                title: args.title,
                slug: args.slug,
                offer_plan: args.offer_plan.map(OfferPlanUuid::from_uuid),
            })
            .await
            .map_err(|error| format!("failed to create product: {error}"))?,
        ProductSubcommand::Show(args) => service
            .get_product(ProductUuid::from_uuid(args.uuid))
            .await
            .map_err(|error| format!("failed to load product: {error}"))?,
        ProductSubcommand::OfferPlan(args) => service
            .set_product_offer_plan(
                ProductUuid::from_uuid(args.uuid),
                args.offer_plan.map(OfferPlanUuid::from_uuid),
            )
            .await
            .map_err(|error| format!("failed to update product: {error}"))?,
    };

    print_product(&product);

    Ok(())
}

fn print_product(product: &Product) {
    println!("product_uuid: {}", product.uuid);
    println!("title: {}", product.title);
    println!("slug: {}", product.slug);

    match &product.offer_plan {
        Some(plan) => print_offer_plan(plan),
        None => println!("offer_plan: none"),
    }

    for pack_size in &product.pack_sizes {
        println!(
            "pack_size: {} {} at {}",
            pack_size.uuid, pack_size.size, pack_size.price
        );
    }
}
