use clap::Args;
use pillbox_app::{
    auth::PgAuthService,
    database::Db,
    domain::customers::{
        CustomersService, PgCustomersService,
        models::{CustomerUuid, NewCustomer},
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateCustomerArgs {
    /// Customer display name
    #[arg(long)]
    name: String,

    /// Customer email address
    #[arg(long)]
    email: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional customer UUID; generated when omitted
    #[arg(long)]
    customer_uuid: Option<Uuid>,

    /// Skip issuing an API token for the new customer
    #[arg(long)]
    no_token: bool,
}

pub(crate) async fn run(args: CreateCustomerArgs) -> Result<(), String> {
    let pool = super::super::connect(&args.database_url).await?;

    let customer = PgCustomersService::new(Db::new(pool.clone()))
        .create_customer(NewCustomer {
            uuid: args
                .customer_uuid
                .map_or_else(CustomerUuid::new, CustomerUuid::from_uuid),
            name: args.name,
            email: args.email,
        })
        .await
        .map_err(|error| format!("failed to create customer: {error}"))?;

    println!("customer_uuid: {}", customer.uuid);
    println!("customer_name: {}", customer.name);
    println!("customer_email: {}", customer.email);

    if args.no_token {
        return Ok(());
    }

    let issued = PgAuthService::new(pool)
        .issue_api_token(customer.uuid)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
