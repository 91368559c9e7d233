//! Integration tests pricing whole carts and orders through the engine.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use testresult::TestResult;

use pillbox::prelude::*;

struct Line {
    unit_price: Decimal,
    quantity: u32,
    offer: Option<OfferPlan>,
}

fn price(lines: &[Line]) -> Result<Vec<LinePrice>, PricingError> {
    lines
        .iter()
        .map(|line| {
            Ok(price_line(
                line.unit_price,
                Quantity::new(line.quantity)?,
                line.offer.as_ref().and_then(OfferPlan::active_rule),
            ))
        })
        .collect()
}

fn basket() -> Result<Vec<Line>, DiscountError> {
    Ok(vec![
        Line {
            unit_price: dec!(50.00),
            quantity: 2,
            offer: Some(OfferPlan {
                rule: DiscountRule::percentage(10)?,
                status: OfferPlanStatus::Active,
            }),
        },
        Line {
            unit_price: dec!(20.00),
            quantity: 3,
            offer: Some(OfferPlan {
                rule: DiscountRule::fixed_amount(5)?,
                status: OfferPlanStatus::Active,
            }),
        },
        Line {
            unit_price: dec!(15.00),
            quantity: 1,
            offer: None,
        },
    ])
}

#[test]
fn cart_view_and_order_price_the_same_lines_differently_only_by_shipping() -> TestResult {
    let lines = price(&basket()?)?;
    let promo = DiscountRule::percentage(10)?;

    let cart = aggregate(&lines, Some(&promo), ShippingPolicy::Excluded);
    let order = aggregate(&lines, Some(&promo), ShippingPolicy::checkout());

    // 100 + 60 + 15 before offers, 90 + 45 + 15 after.
    assert_eq!(cart.subtotal, dec!(175.00));
    assert_eq!(cart.total, dec!(150.00));
    assert_eq!(cart.promo_discount, dec!(15.00));
    assert_eq!(cart.grand_total, dec!(135.00));

    assert_eq!(order.subtotal, cart.subtotal);
    assert_eq!(order.total, cart.total);
    assert_eq!(order.promo_discount, cart.promo_discount);
    assert_eq!(order.shipping_charge, dec!(25.00));
    assert_eq!(order.grand_total, dec!(160.00));

    Ok(())
}

#[test]
fn inactive_offer_plans_price_at_full_price() -> TestResult {
    let mut lines = basket()?;

    for line in &mut lines {
        if let Some(offer) = line.offer.as_mut() {
            offer.status = OfferPlanStatus::Inactive;
        }
    }

    let totals = aggregate(&price(&lines)?, None, ShippingPolicy::Excluded);

    assert_eq!(totals.total, totals.subtotal);
    assert_eq!(totals.total, dec!(175.00));

    Ok(())
}

#[test]
fn validated_promo_code_feeds_the_aggregator() -> TestResult {
    let lines = price(&basket()?)?;
    let now: Timestamp = "2024-01-15T09:30:00Z".parse()?;

    let code = PromoCode {
        code: "SAVE20".to_string(),
        rule: DiscountRule::fixed_amount(20)?,
        starts_at: "2024-01-01T00:00:00Z".parse()?,
        ends_at: "2024-01-31T00:00:00Z".parse()?,
        status: PromoCodeStatus::Active,
    };

    let cart = aggregate(&lines, None, ShippingPolicy::Excluded);
    let rule = code.validate(now, cart.subtotal)?;
    let order = aggregate(&lines, Some(&rule), ShippingPolicy::checkout());

    assert_eq!(order.promo_discount, dec!(20.00));
    assert_eq!(order.grand_total, dec!(155.00));

    let expired = code.validate("2024-02-01T00:00:00Z".parse()?, cart.subtotal);

    assert_eq!(expired, Err(PromoCodeError::NotFound));

    Ok(())
}

#[test]
fn large_orders_ship_free() -> TestResult {
    let lines = price(&[Line {
        unit_price: dec!(66.67),
        quantity: 3,
        offer: None,
    }])?;

    let totals = aggregate(&lines, None, ShippingPolicy::checkout());

    assert_eq!(totals.total, dec!(200.01));
    assert_eq!(totals.shipping_charge, Decimal::ZERO);
    assert_eq!(totals.grand_total, dec!(200.01));

    Ok(())
}
