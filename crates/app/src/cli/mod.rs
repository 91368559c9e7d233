use clap::{Parser, Subcommand};
use pillbox_app::database;
use sqlx::PgPool;

mod catalog;
mod customer;
mod db;
mod dispatch;
mod promo_code;
mod token;

#[derive(Debug, Parser)]
#[command(name = "pillbox-app", about = "Pillbox CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Customer(customer::CustomerCommand),
    Token(token::TokenCommand),
    PromoCode(promo_code::PromoCodeCommand),
    Dispatch(dispatch::DispatchArgs),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Catalog(command) => catalog::run(command).await,
            Commands::Customer(command) => customer::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::PromoCode(command) => promo_code::run(command).await,
            Commands::Dispatch(args) => dispatch::run(args).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<PgPool, String> {
    database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
