use clap::Args;
use jiff::Timestamp;
use pillbox::promo_codes::PromoCodeStatus;
use pillbox_app::domain::promo_codes::PromoCodesService;

#[derive(Debug, Args)]
pub(crate) struct ShowPromoCodeArgs {
    /// Code customers type in
    #[arg(long)]
    code: String,
}

pub(crate) async fn run(
    service: &dyn PromoCodesService,
    args: ShowPromoCodeArgs,
) -> Result<(), String> {
    let promo_code = service
        .find_by_code(&args.code)
        .await
        .map_err(|error| format!("failed to find promo code: {error}"))?;

    let terms = promo_code.terms;
    let redeemable =
        terms.status == PromoCodeStatus::Active && terms.is_within_window(Timestamp::now());

    println!("promo_code_uuid: {}", promo_code.uuid);
    println!("code: {}", terms.code);
    println!(
        "discount: {} {}",
        terms.rule.kind().as_str(),
        terms.rule.amount()
    );
    println!("window: {} .. {}", terms.starts_at, terms.ends_at);
    println!("status: {}", terms.status.as_str());
    println!("redeemable now: {redeemable}");

    Ok(())
}
