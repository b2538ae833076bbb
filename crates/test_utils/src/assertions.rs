//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_audit::AuditTrail;
use rust_decimal::Decimal;

/// Asserts that a Money value equals an AED-style decimal amount exactly
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Money mismatch: actual={}, expected={} {}",
        actual,
        actual.currency().code(),
        expected
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that a Money value is not negative
pub fn assert_money_non_negative(money: &Money) {
    assert!(!money.is_negative(), "Expected non-negative money, got {}", money);
}

/// Asserts that an amount is stated to whole fils
pub fn assert_rounded_to_fils(money: &Money) {
    assert_eq!(
        money.amount(),
        money.amount().round_dp(money.currency().decimal_places()),
        "Expected {} to be rounded to the currency's minor unit",
        money
    );
}

/// Asserts that an audit trail is ordered and ends at the expected result
///
/// # Panics
///
/// Panics with the audit error if verification fails
pub fn assert_trail_reconciles(trail: &AuditTrail, expected: &Money) {
    if let Err(e) = trail.verify(expected) {
        panic!("Audit trail does not reconcile with {}: {}", expected, e);
    }
}

/// Asserts that assets equal liabilities plus equity to the fils
pub fn assert_balanced(assets: &Money, liabilities: &Money, equity: &Money) {
    let difference = assets.amount() - liabilities.amount() - equity.amount();
    assert!(
        difference.abs() < Decimal::new(1, 2),
        "Balance sheet does not balance: assets={}, liabilities={}, equity={}, difference={}",
        assets,
        liabilities,
        equity,
        difference
    );
}
