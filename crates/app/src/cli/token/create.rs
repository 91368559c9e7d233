use clap::Args;
use pillbox_app::{auth::PgAuthService, domain::customers::models::CustomerUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Customer UUID that should own the token
    #[arg(long)]
    customer_uuid: Uuid,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let pool = super::super::connect(&args.database_url).await?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(CustomerUuid::from_uuid(args.customer_uuid))
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("customer_uuid: {}", issued.metadata.customer_uuid);
    println!("token_created_at: {}", issued.metadata.created_at);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
