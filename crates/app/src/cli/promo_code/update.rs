use clap::Args;
use jiff::Timestamp;
use pillbox::discounts::{DiscountKind, DiscountRule};
use pillbox_app::domain::promo_codes::{
    PromoCodesService,
    models::{PromoCodeUpdate, PromoCodeUuid},
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct UpdatePromoCodeArgs {
    /// Promo code UUID
    #[arg(long)]
    uuid: Uuid,

    /// Code customers type in
    #[arg(long)]
    code: String,

    /// `percentage` or `fixed-amount`
    #[arg(long)]
    kind: DiscountKind,

    /// Percent off, or amount off in store currency
    #[arg(long)]
    amount: Decimal,

    /// Start of the redemption window (RFC 3339)
    #[arg(long)]
    starts_at: Timestamp,

    /// End of the redemption window (RFC 3339)
    #[arg(long)]
    ends_at: Timestamp,
}

pub(crate) async fn run(
    service: &dyn PromoCodesService,
    args: UpdatePromoCodeArgs,
) -> Result<(), String> {
    let rule = DiscountRule::new(args.kind, args.amount).map_err(|error| error.to_string())?;

    let updated = service
        .update_promo_code(
            PromoCodeUuid::from_uuid(args.uuid),
            PromoCodeUpdate {
                code: args.code,
                rule,
                starts_at: args.starts_at,
                ends_at: args.ends_at,
            },
        )
        .await
        .map_err(|error| format!("failed to update promo code: {error}"))?;

    println!("promo_code_uuid: {}", updated.uuid);
    println!("code: {}", updated.terms.code);
    println!("window: {} .. {}", updated.terms.starts_at, updated.terms.ends_at);

    Ok(())
}
