use clap::Args;
use jiff::Timestamp;
use pillbox::discounts::{DiscountKind, DiscountRule};
use pillbox_app::domain::promo_codes::{
    PromoCodesService,
    models::{NewPromoCode, PromoCodeUuid},
};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct CreatePromoCodeArgs {
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
    args: CreatePromoCodeArgs,
) -> Result<(), String> {
    let rule = DiscountRule::new(args.kind, args.amount).map_err(|error| error.to_string())?;

    let created = service
        .create_promo_code(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: args.code,
            rule,
            starts_at: args.starts_at,
            ends_at: args.ends_at,
        })
        .await
        .map_err(|error| format!("failed to create promo code: {error}"))?;

    println!("promo_code_uuid: {}", created.uuid);
    println!("code: {}", created.terms.code);
    println!("status: {}", created.terms.status.as_str());

    Ok(())
}
