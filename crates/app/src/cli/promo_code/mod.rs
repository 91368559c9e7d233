use clap::{Args, Subcommand};
use pillbox_app::{
    database::Db,
    domain::promo_codes::{PgPromoCodesService, PromoCodesService},
};

mod create;
mod delete;
mod list;
mod show;
mod toggle;
mod update;

#[derive(Debug, Args)]
pub(crate) struct PromoCodeCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: PromoCodeSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoCodeSubcommand {
    /// Create an active promo code
    Create(create::CreatePromoCodeArgs),

    /// Replace the code, discount and window of a promo code
    Update(update::UpdatePromoCodeArgs),

    /// Switch a promo code between active and inactive
    Toggle(toggle::TogglePromoCodeArgs),

    /// Soft delete a promo code
    Delete(delete::DeletePromoCodeArgs),

    /// Look up a promo code by the code customers type in
    Show(show::ShowPromoCodeArgs),

    /// List promo codes that have not been deleted
    List,
}

pub(crate) async fn run(command: PromoCodeCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    let pool = super::connect(&database_url).await?;
    let service = PgPromoCodesService::new(Db::new(pool));

    execute(&service, command.command).await
}

async fn execute(
    service: &dyn PromoCodesService,
    command: PromoCodeSubcommand,
) -> Result<(), String> {
    match command {
        PromoCodeSubcommand::Create(args) => create::run(service, args).await,
        PromoCodeSubcommand::Update(args) => update::run(service, args).await,
        PromoCodeSubcommand::Toggle(args) => toggle::run(service, args).await,
        PromoCodeSubcommand::Delete(args) => delete::run(service, args).await,
        PromoCodeSubcommand::Show(args) => show::run(service, args).await,
        PromoCodeSubcommand::List => list::run(service).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use jiff::Timestamp;
    use pillbox::{
        discounts::{DiscountKind, DiscountRule},
        promo_codes::{PromoCode as PromoCodeTerms, PromoCodeStatus},
    };
    use pillbox_app::domain::promo_codes::{
        MockPromoCodesService, PromoCodesServiceError,
        models::{PromoCode, PromoCodeUuid},
    };
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct PromoCodeCli {
        #[command(subcommand)]
        command: PromoCodeSubcommand,
    }

    fn parse(args: &[&str]) -> Result<PromoCodeSubcommand, clap::Error> {
        PromoCodeCli::try_parse_from(std::iter::once("promo-code").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    fn make_promo_code(
        uuid: PromoCodeUuid,
        code: &str,
    ) -> Result<PromoCode, Box<dyn std::error::Error>> {
        Ok(PromoCode {
            uuid,
            terms: PromoCodeTerms {
                code: code.to_string(),
                rule: DiscountRule::fixed_amount(20)?,
                starts_at: "2026-01-01T00:00:00Z".parse()?,
                ends_at: "2026-12-31T23:59:59Z".parse()?,
                status: PromoCodeStatus::Active,
            },
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        })
    }

    #[tokio::test]
    async fn update_replaces_the_terms() -> TestResult {
        let uuid = PromoCodeUuid::new();
        let uuid_arg = uuid.to_string();
        let updated = make_promo_code(uuid, "SAVE15")?;

        let command = parse(&[
            "update",
            "--uuid",
            &uuid_arg,
            "--code",
            "SAVE15",
            "--kind",
            "percentage",
            "--amount",
            "15",
            "--starts-at",
            "2026-01-01T00:00:00Z",
            "--ends-at",
            "2026-12-31T23:59:59Z",
        ])?;

        let mut promo_codes = MockPromoCodesService::new();

        promo_codes
            .expect_update_promo_code()
            .once()
            .withf(move |target, update| {
                *target == uuid
                    && update.code == "SAVE15"
                    && update.rule.kind() == DiscountKind::Percentage
                    && update.rule.amount() == dec!(15)
            })
            .return_once(move |_, _| Ok(updated));

        execute(&promo_codes, command).await?;

        Ok(())
    }

    #[test]
    fn update_needs_the_whole_window() -> TestResult {
        let uuid = PromoCodeUuid::new().to_string();

        let parsed = parse(&[
            "update",
            "--uuid",
            &uuid,
            "--code",
            "SAVE15",
            "--kind",
            "percentage",
            "--amount",
            "15",
            "--starts-at",
            "2026-01-01T00:00:00Z",
        ]);

        assert!(parsed.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn delete_of_unknown_code_reports_not_found() -> TestResult {
        let uuid = PromoCodeUuid::new();
        let uuid_arg = uuid.to_string();

        let command = parse(&["delete", "--uuid", &uuid_arg])?;

        let mut promo_codes = MockPromoCodesService::new();

        promo_codes
            .expect_delete_promo_code()
            .once()
            .withf(move |target| *target == uuid)
            .return_once(|_| Err(PromoCodesServiceError::NotFound));

        let result = execute(&promo_codes, command).await;

        assert_eq!(
            result,
            Err("failed to delete promo code: promo code not found".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn show_looks_the_code_up_as_typed() -> TestResult {
        let found = make_promo_code(PromoCodeUuid::new(), "SAVE20")?;

        let command = parse(&["show", "--code", "SAVE20"])?;

        let mut promo_codes = MockPromoCodesService::new();

        promo_codes
            .expect_find_by_code()
            .once()
            .withf(|code| code == "SAVE20")
            .return_once(move |_| Ok(found));

        execute(&promo_codes, command).await?;

        Ok(())
    }
}
