//! End-to-end pricing scenarios: collaborator JSON in, display values out.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use trip_commerce::ingest::{parse_cart_lines, parse_promos};
use trip_commerce::prelude::*;

fn idr(amount: i64) -> Money {
    Money::new(amount, Currency::IDR)
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap()
}

fn activity(price: i64, discount: Option<i64>) -> Activity {
    let base = Activity::new("act", "Volcano Sunrise Trek", idr(price));
    match discount {
        Some(d) => base.with_discount(idr(d)),
        None => base,
    }
}

fn save10() -> Promo {
    Promo {
        id: PromoId::new("promo-1"),
        title: "Ten off".to_string(),
        promo_code: "SAVE10".to_string(),
        is_active: true,
        start_date: fixed_now() - Duration::days(1),
        end_date: fixed_now() + Duration::days(1),
        minimum_claim_price: Some(idr(100)),
        promo_discount_price: Some(idr(20)),
    }
}

#[test]
fn discounted_line_of_two() {
    let line = CartLine::new(activity(100, Some(80)), 2);
    let resolved = resolve_line_price(Some(&line));
    assert_eq!(resolved.display_price, idr(160));
    assert_eq!(resolved.original_price, Some(idr(200)));
}

#[test]
fn discount_above_price_is_ignored() {
    let resolved = resolve_activity_price(Some(&activity(100, Some(120))));
    assert_eq!(resolved.display_price, idr(100));
    assert_eq!(resolved.original_price, None);
}

#[test]
fn mixed_cart_original_counts_only_discounted_lines() {
    let lines = vec![
        CartLine::new(activity(100, Some(80)), 2),
        CartLine::new(activity(50, None), 1),
    ];
    let totals = resolve_cart_totals(&lines);
    assert_eq!(totals.display_price, idr(210));
    assert_eq!(totals.original_price, Some(idr(200)));
}

#[test]
fn mixed_cart_savings_come_from_discounted_lines() {
    let lines = vec![
        CartLine::new(activity(100, Some(80)), 2),
        CartLine::new(activity(50, None), 1),
    ];
    assert_eq!(resolve_cart_savings(&lines), idr(40));

    let cart = Cart::from_lines(lines, Currency::IDR);
    assert_eq!(cart.savings(), idr(40));
    assert_eq!(cart.full_price(), idr(250));
}

#[test]
fn promo_code_matches_case_insensitively() {
    let result = evaluate_promo_code(&[save10()], "save10", idr(150), fixed_now()).unwrap();
    assert_eq!(result.discount_amount, idr(20));
    assert_eq!(result.final_total, idr(130));
    assert!(result.is_valid);
}

#[test]
fn promo_below_minimum_is_rejected() {
    let result = evaluate_promo_code(&[save10()], "SAVE10", idr(50), fixed_now());
    assert_eq!(
        result,
        Err(PromoError::MinimumPurchaseNotMet { minimum: idr(100) })
    );
}

#[test]
fn resolver_properties_hold_across_price_grid() {
    for price in [0_i64, 1, 50, 100, 99_999] {
        for discount in [-10_i64, 0, 1, price / 2, price - 1, price, price + 1] {
            let resolved = resolve_activity_price(Some(&activity(price, Some(discount))));
            if discount > 0 && discount < price {
                assert_eq!(resolved.display_price, idr(discount));
                assert_eq!(resolved.original_price, Some(idr(price)));
            } else {
                assert_eq!(resolved.display_price, idr(price));
                assert_eq!(resolved.original_price, None);
            }
        }
    }
    assert_eq!(resolve_activity_price(None), PriceBreakdown::zero(Currency::IDR));
}

#[test]
fn line_and_cart_sums_are_consistent() {
    let lines = vec![
        CartLine::new(activity(100, Some(80)), 3),
        CartLine::new(activity(45, None), 0),
        CartLine::new(activity(70, Some(10)), 1),
        CartLine::new(activity(30, Some(30)), 4),
    ];

    let mut expected_display = 0;
    for line in &lines {
        let unit = resolve_activity_price(line.activity.as_ref());
        let resolved = resolve_line_price(Some(line));
        assert_eq!(
            resolved.display_price.amount,
            unit.display_price.amount * line.effective_quantity()
        );
        expected_display += resolved.display_price.amount;
    }

    let totals = resolve_cart_totals(&lines);
    assert_eq!(totals.display_price.amount, expected_display);
    let original = totals.original_price.expect("cart has discounted lines");
    assert!(totals.display_price.amount >= 0);
    // Discounted lines contribute less to display than to original.
    let discounted_display: i64 = lines
        .iter()
        .map(|l| l.price())
        .filter(|p| p.is_discounted())
        .map(|p| p.display_price.amount)
        .sum();
    assert!(discounted_display <= original.amount);
}

#[test]
fn operations_are_idempotent() {
    let lines = vec![
        CartLine::new(activity(100, Some(80)), 2),
        CartLine::new(activity(50, None), 1),
    ];
    assert_eq!(resolve_cart_totals(&lines), resolve_cart_totals(&lines));
    assert_eq!(resolve_line_price(lines.first()), resolve_line_price(lines.first()));

    let promos = [save10()];
    assert_eq!(
        evaluate_promo_code(&promos, "SAVE10", idr(150), fixed_now()),
        evaluate_promo_code(&promos, "SAVE10", idr(150), fixed_now())
    );
}

#[test]
fn collaborator_payloads_flow_through_to_promo() {
    let cart_payload = json!({
        "data": [
            { "id": "cart-1", "quantity": 2,
              "activity": { "id": "a1", "title": "Rafting", "price": 100, "price_discount": 80 } },
            { "id": "cart-2", "quantity": 1,
              "activity": { "id": "a2", "title": "Cooking Class", "price": "50" } }
        ]
    })
    .to_string();
    let promo_payload = json!({
        "data": [
            { "id": "p0", "promo_code": "SAVE10", "is_active": false,
              "start_date": "2024-01-01", "end_date": "2024-12-31",
              "promo_discount_price": 999 },
            { "id": "p1", "promo_code": "SAVE10", "is_active": true,
              "start_date": "2024-06-01T00:00:00.000Z", "end_date": "2024-06-30T23:59:59.000Z",
              "minimum_claim_price": 100, "promo_discount_price": 20 }
        ]
    })
    .to_string();

    let lines = parse_cart_lines(&cart_payload, Currency::IDR).unwrap();
    let promos = parse_promos(&promo_payload, Currency::IDR).unwrap();

    let totals = resolve_cart_totals(&lines);
    assert_eq!(totals.display_price, idr(210));

    let evaluation =
        evaluate_promo_code(&promos, "Save10", totals.display_price, fixed_now()).unwrap();
    assert_eq!(evaluation.promo.id.as_str(), "p1");
    assert_eq!(evaluation.final_total, idr(190));
}

#[test]
fn session_checkout_uses_promo_total() {
    let mut session = StorefrontSession::new(Currency::IDR);
    session.login("token-123", None);
    session.add_to_cart(activity(100, Some(80)), 2).unwrap();

    session.apply_promo(&[save10()], "SAVE10", fixed_now()).unwrap();
    let bank = PaymentMethod {
        id: PaymentMethodId::new("mandiri"),
        name: "Mandiri".to_string(),
        image_url: None,
    };
    let request = session.checkout_request(&bank).unwrap();
    assert_eq!(request.total, idr(140));

    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["paymentMethodId"], "mandiri");
    assert_eq!(body["promoCode"], "SAVE10");
}
