use clap::{Args, Subcommand};
use pillbox::{
    discounts::{DiscountKind, DiscountRule},
    pricing::OfferPlanStatus,
};
use pillbox_app::domain::catalog::{
    CatalogService,
    models::{NewOfferPlan, OfferPlan, OfferPlanUuid},
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Subcommand)]
pub(crate) enum OfferPlanSubcommand {
    /// Create an active offer plan
    Create(CreateOfferPlanArgs),

    /// Switch an offer plan on or off for every product it is attached to
    Status(OfferPlanStatusArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CreateOfferPlanArgs {
    /// Name shown to administrators
    #[arg(long)]
    name: String,

    /// `percentage` or `fixed-amount`
    #[arg(long)]
    kind: DiscountKind,

    /// Percent off, or amount off each unit in store currency
    #[arg(long)]
    amount: Decimal,
}

#[derive(Debug, Args)]
pub(crate) struct OfferPlanStatusArgs {
    /// Offer plan UUID
    #[arg(long)]
    uuid: Uuid,

    /// `active` or `inactive`
    #[arg(long)]
    status: OfferPlanStatus,
}

pub(crate) async fn run(
    service: &dyn CatalogService,
    command: OfferPlanSubcommand,
) -> Result<(), String> {
    let plan = match command {
        OfferPlanSubcommand::Create(args) => {
            let rule =
                DiscountRule::new(args.kind, args.amount).map_err(|error| error.to_string())?;

            service
                .create_offer_plan(NewOfferPlan {
                    uuid: OfferPlanUuid::new(),
                    name: args.name,
                    rule,
                })
                .await
                .map_err(|error| format!("failed to create offer plan: {error}"))?
        }
        OfferPlanSubcommand::Status(args) => service
            .set_offer_plan_status(OfferPlanUuid::from_uuid(args.uuid), args.status)
            .await
            .map_err(|error| format!("failed to update offer plan: {error}"))?,
    };

    print_offer_plan(&plan);

    Ok(())
}

pub(super) fn print_offer_plan(plan: &OfferPlan) {
    println!("offer_plan_uuid: {}", plan.uuid);
    println!("name: {}", plan.name);
    println!(
        "discount: {} {}",
        plan.rule.kind().as_str(),
        plan.rule.amount()
    );
    println!("status: {}", plan.status.as_str());
}
