use clap::{Args, Subcommand};
use pillbox_app::database;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending migrations
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate(args) => {
            let pool = super::connect(&args.database_url).await?;

            database::migrate(&pool)
                .await
                .map_err(|error| format!("failed to run migrations: {error}"))?;

            println!("migrations applied");

            Ok(())
        }
    }
}
