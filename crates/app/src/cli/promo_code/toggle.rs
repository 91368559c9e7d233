use clap::Args;
use pillbox_app::domain::promo_codes::{PromoCodesService, models::PromoCodeUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct TogglePromoCodeArgs {
    /// Promo code UUID
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(
    service: &dyn PromoCodesService,
    args: TogglePromoCodeArgs,
) -> Result<(), String> {
    let status = service
        .toggle_promo_code_status(PromoCodeUuid::from_uuid(args.uuid))
        .await
        .map_err(|error| format!("failed to toggle promo code: {error}"))?;

    println!("promo code {} is now {}", args.uuid, status.as_str());

    Ok(())
}
