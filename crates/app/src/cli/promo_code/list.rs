use pillbox_app::domain::promo_codes::PromoCodesService;

pub(crate) async fn run(service: &dyn PromoCodesService) -> Result<(), String> {
    let promo_codes = service
        .list_promo_codes()
        .await
        .map_err(|error| format!("failed to list promo codes: {error}"))?;

    if promo_codes.is_empty() {
        println!("no promo codes found");
        return Ok(());
    }

    for promo_code in promo_codes {
        let terms = promo_code.terms;

        println!("promo_code_uuid: {}", promo_code.uuid);
        println!("code: {}", terms.code);
        println!(
            "discount: {} {}",
            terms.rule.kind().as_str(),
            terms.rule.amount()
        );
        println!("window: {} .. {}", terms.starts_at, terms.ends_at);
        println!("status: {}", terms.status.as_str());
        println!();
    }

    Ok(())
}
