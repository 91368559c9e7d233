use clap::{Args, Subcommand};
use pillbox_app::{
    database::Db,
    domain::catalog::{CatalogService, PgCatalogService},
};

mod offer_plan;
mod pack_size;
mod product;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// Manage offer plans
    #[command(subcommand)]
    OfferPlan(offer_plan::OfferPlanSubcommand),

    /// Manage products
    #[command(subcommand)]
    Product(product::ProductSubcommand),

    /// Manage pack sizes and their prices
    #[command(subcommand)]
    PackSize(pack_size::PackSizeSubcommand),
}

pub(crate) async fn run(command: CatalogCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    let pool = super::connect(&database_url).await?;
    let service = PgCatalogService::new(Db::new(pool));

    execute(&service, command.command).await
}

async fn execute(service: &dyn CatalogService, command: CatalogSubcommand) -> Result<(), String> {
    match command {
        CatalogSubcommand::OfferPlan(command) => offer_plan::run(service, command).await,
        CatalogSubcommand::Product(command) => product::run(service, command).await,
        CatalogSubcommand::PackSize(command) => pack_size::run(service, command).await,
    }
}
