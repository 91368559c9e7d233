use clap::Args;
use pillbox_app::domain::promo_codes::{PromoCodesService, models::PromoCodeUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct DeletePromoCodeArgs {
    /// Promo code UUID
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(
    service: &dyn PromoCodesService,
    args: DeletePromoCodeArgs,
) -> Result<(), String> {
    service
        .delete_promo_code(PromoCodeUuid::from_uuid(args.uuid))
        .await
        .map_err(|error| format!("failed to delete promo code: {error}"))?;

    println!("promo code {} deleted", args.uuid);

    Ok(())
}
