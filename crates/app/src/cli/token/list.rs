use clap::Args;
use pillbox_app::{auth::PgAuthService, domain::customers::models::CustomerUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Customer UUID whose tokens should be listed
    #[arg(long)]
    customer_uuid: Uuid,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let pool = super::super::connect(&args.database_url).await?;

    let tokens = PgAuthService::new(pool)
        .list_api_tokens(CustomerUuid::from_uuid(args.customer_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for customer {}", args.customer_uuid);
        return Ok(());
    }

    for token in tokens {
        println!("token_uuid: {}", token.uuid);
        println!("created_at: {}", token.created_at);
        println!(
            "last_used_at: {}",
            token
                .last_used_at
                .map_or_else(|| "never".to_string(), |value| value.to_string())
        );
        println!(
            "revoked_at: {}",
            token
                .revoked_at
                .map_or_else(|| "active".to_string(), |value| value.to_string())
        );
        println!();
    }

    Ok(())
}
