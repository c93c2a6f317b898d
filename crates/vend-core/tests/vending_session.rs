//! End-to-end tests of a single-customer machine.
//!
//! Each test drives `VendingSession` the way a front panel would: operator
//! reload, coin insertion, selection, coin return.

use std::collections::BTreeMap;

use vend_core::validation::MAX_STOCK_COUNT;
use vend_core::*;

fn d(v: u32) -> Denomination {
    Denomination::new(v).unwrap()
}

fn products(entries: &[(ProductCode, &str, u32, i64)]) -> BTreeMap<ProductCode, ProductReload> {
    entries
        .iter()
        .map(|&(code, desc, count, price)| (code, ProductReload::new(desc, count, price)))
        .collect()
}

fn coins(stacks: &[(u32, u32)]) -> Vec<CoinStack> {
    stacks.iter().map(|&(v, n)| CoinStack::new(d(v), n)).collect()
}

fn count_of(session: &VendingSession, denomination: u32) -> u32 {
    session
        .available_change()
        .iter()
        .find(|s| s.denomination == d(denomination))
        .map(|s| s.count)
        .unwrap_or(0)
}

/// Machine with Water (code 1) and Snack (code 2), 50×5p and 50×50p.
fn stocked(mode: ChangeMode) -> VendingSession {
    let mut session = VendingSession::new(DenominationSet::default(), mode);
    session
        .reload(
            &products(&[(1, "Water", 5, 100), (2, "Snack", 15, 150)]),
            &coins(&[(5, 50), (50, 50)]),
        )
        .unwrap();
    session
}

#[test]
fn reload_same_product_accumulates_and_reprices() {
    let mut session = stocked(ChangeMode::Greedy);
    session
        .reload_products(&products(&[(1, "Water", 33, 88)]))
        .unwrap();

    let water = session.inventory().into_iter().find(|r| r.code == 1).unwrap();
    assert_eq!(water.count, 38);
    assert_eq!(water.unit_price, Money::from_minor(88));
}

#[test]
fn reload_different_product_into_stocked_slot_is_refused() {
    let mut session = stocked(ChangeMode::Greedy);
    let before = session.inventory();

    let err = session
        .reload_products(&products(&[(1, "Cola", 10, 120), (3, "Gum", 4, 30)]))
        .unwrap_err();

    match err {
        CoreError::IdentityConflict { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].code, 1);
            assert_eq!(conflicts[0].existing, "Water");
            assert_eq!(conflicts[0].incoming, "Cola");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.inventory(), before);
}

#[test]
fn reload_past_stock_limit_changes_nothing() {
    let mut session = stocked(ChangeMode::Greedy);
    session
        .reload_products(&products(&[(2, "Snack", MAX_STOCK_COUNT - 15, 150)]))
        .unwrap();
    let before = session.inventory();

    let err = session
        .reload_products(&products(&[(1, "Water", 5, 100), (2, "Snack", 1, 150)]))
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::OutOfRange { .. })
    ));
    assert_eq!(session.inventory(), before);

    let err = session
        .reload_change(&coins(&[(20, 3), (50, MAX_STOCK_COUNT)]))
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(count_of(&session, 20), 0);
    assert_eq!(count_of(&session, 50), 50);
}

#[test]
fn change_reload_accumulates() {
    let mut session = stocked(ChangeMode::Greedy);
    session.reload_change(&coins(&[(50, 2), (20, 7)])).unwrap();

    assert_eq!(count_of(&session, 50), 52);
    assert_eq!(count_of(&session, 20), 7);
    assert_eq!(count_of(&session, 5), 50);
}

#[test]
fn inserted_coins_accumulate() {
    let mut session = stocked(ChangeMode::Greedy);
    session.insert_coin(50).unwrap();
    session.insert_coin(50).unwrap();
    let total = session.insert_coin(200).unwrap();

    assert_eq!(total, Money::from_minor(300));
    assert_eq!(session.pending_total(), Money::from_minor(300));
}

#[test]
fn unrecognized_coin_is_ignored() {
    let mut session = stocked(ChangeMode::Greedy);
    session.insert_coin(100).unwrap();

    let err = session.insert_coin(25).unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnrecognizedCoin { denomination: 25, pending_total } if pending_total.minor() == 100
    ));
    assert_eq!(session.pending_total(), Money::from_minor(100));
}

#[test]
fn exact_payment_dispenses_without_change() {
    let mut session = stocked(ChangeMode::Greedy);
    session.insert_coin(100).unwrap();

    let sold = session.select_product(1).unwrap();

    assert_eq!(sold.product, Product::new("Water"));
    assert!(sold.change_due.is_zero());
    assert!(session.pending_total().is_zero());
    assert!(session.return_coins().is_empty());
}

#[test]
fn over_payment_returns_full_change() {
    let mut session = stocked(ChangeMode::Greedy);
    session.reload_change(&coins(&[(50, 2)])).unwrap();
    session.insert_coin(50).unwrap();
    session.insert_coin(50).unwrap();
    session.insert_coin(200).unwrap();

    let sold = session.select_product(1).unwrap();

    assert_eq!(sold.change_due, Money::from_minor(200));
    assert_eq!(sold.change_returned(), Money::from_minor(200));
    assert_eq!(session.pending_total(), Money::from_minor(200));
    // The customer's own 200p coin is the largest in the till and goes straight back.
    assert_eq!(sold.change, coins(&[(200, 1)]));
    assert_eq!(count_of(&session, 50), 54);
}

#[test]
fn over_payment_in_fifties_draws_fifties() {
    let mut session = stocked(ChangeMode::Greedy);
    session.reload_change(&coins(&[(50, 2)])).unwrap();
    for _ in 0..6 {
        session.insert_coin(50).unwrap();
    }

    let sold = session.select_product(1).unwrap();

    assert_eq!(sold.change, coins(&[(50, 4)]));
    // 52 held + 6 committed - 4 withdrawn
    assert_eq!(count_of(&session, 50), 54);
    assert_eq!(session.return_coins(), coins(&[(50, 4)]));
}

#[test]
fn under_stocked_reserve_returns_short_change() {
    let mut session = VendingSession::new(DenominationSet::default(), ChangeMode::Greedy);
    session
        .reload(&products(&[(1, "Water", 38, 88)]), &coins(&[(5, 48), (50, 52)]))
        .unwrap();
    session.insert_coin(50).unwrap();
    session.insert_coin(50).unwrap();
    session.insert_coin(200).unwrap();

    let sold = session.select_product(1).unwrap();

    assert_eq!(sold.change_due, Money::from_minor(212));
    assert_eq!(sold.change_returned(), Money::from_minor(210));
    assert_eq!(sold.shortfall(), Money::from_minor(2));
    assert_eq!(session.return_coins(), coins(&[(200, 1), (5, 2)]));
}

#[test]
fn under_stocked_reserve_with_exact_strategy_refuses_sale() {
    let mut session = VendingSession::new(DenominationSet::default(), ChangeMode::Exact);
    session
        .reload(&products(&[(1, "Water", 38, 88)]), &coins(&[(5, 48), (50, 52)]))
        .unwrap();
    session.insert_coin(50).unwrap();
    session.insert_coin(50).unwrap();
    session.insert_coin(200).unwrap();

    let err = session.select_product(1).unwrap_err();

    assert!(matches!(err, CoreError::ExactChangeUnavailable { .. }));
    assert_eq!(session.state(), SessionState::Rejected);
    assert_eq!(session.inventory()[0].count, 38);
    assert_eq!(session.available_change(), coins(&[(5, 48), (50, 52)]));
    assert_eq!(session.return_coins(), coins(&[(200, 1), (50, 2)]));
}

#[test]
fn insufficient_funds_keeps_coins_retrievable() {
    let mut session = stocked(ChangeMode::Greedy);
    session.insert_coin(50).unwrap();
    session.insert_coin(20).unwrap();
    session.insert_coin(10).unwrap();

    let err = session.select_product(1).unwrap_err();

    assert!(matches!(err, CoreError::InsufficientFunds { .. }));
    assert_eq!(session.pending_total(), Money::from_minor(80));
    assert_eq!(session.inventory()[0].count, 5);
    assert_eq!(session.return_coins(), coins(&[(50, 1), (20, 1), (10, 1)]));
}

#[test]
fn return_coins_twice_yields_once() {
    let mut session = stocked(ChangeMode::Greedy);
    session.insert_coin(20).unwrap();
    session.insert_coin(20).unwrap();

    assert_eq!(session.return_coins(), coins(&[(20, 2)]));
    assert!(session.return_coins().is_empty());
}

#[test]
fn selecting_unknown_or_empty_slot_mutates_nothing() {
    let mut session = VendingSession::default();
    session
        .reload_products(&products(&[(4, "Juice", 0, 90)]))
        .unwrap();
    session.insert_coin(100).unwrap();

    assert!(matches!(
        session.select_product(4),
        Err(CoreError::OutOfStock { code: 4, .. })
    ));
    assert!(matches!(
        session.select_product(9),
        Err(CoreError::ProductNotFound { code: 9 })
    ));
    assert_eq!(session.pending_total(), Money::from_minor(100));
    assert!(session.available_change().is_empty());
}

#[test]
fn change_stays_pending_for_next_purchase() {
    let mut session = stocked(ChangeMode::Greedy);
    session.insert_coin(200).unwrap();
    session.insert_coin(50).unwrap();

    let water = session.select_product(1).unwrap();
    assert_eq!(water.change_returned(), Money::from_minor(150));

    let snack = session.select_product(2).unwrap();
    assert!(snack.change.is_empty());
    assert!(session.return_coins().is_empty());
}
