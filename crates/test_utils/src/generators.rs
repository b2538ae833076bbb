//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating ledger records that always
//! pass validation against the standard chart.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_ledger::{AccountKind, TransactionRecord};

/// Revenue categories of the standard chart
pub const REVENUE_CATEGORIES: &[&str] = &[
    "sales_revenue",
    "service_revenue",
    "export_sales",
    "residential_rent_income",
    "interest_income",
    "dividend_income",
    "other_income",
];

/// Expense categories of the standard chart
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "cost_of_goods_sold",
    "rent_expense",
    "utilities",
    "marketing",
    "depreciation",
    "entertainment",
    "exempt_supply_costs",
    "salaries",
    "office_supplies",
    "professional_fees",
    "bank_charges",
    "interest_expense",
    "personal_expenses",
    "fines_penalties",
];

/// Strategy for positive AED amounts stated to the fils (0.01 to 1,000,000.00)
pub fn aed_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|fils| Decimal::new(fils, 2))
}

/// Strategy for dates within a calendar year
pub fn date_in_year_strategy(year: i32) -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(move |offset| {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default() + Duration::days(offset)
    })
}

/// Strategy for valid revenue records dated within a year
pub fn revenue_record_strategy(year: i32) -> impl Strategy<Value = TransactionRecord> {
    (
        date_in_year_strategy(year),
        prop::sample::select(REVENUE_CATEGORIES),
        aed_amount_strategy(),
        any::<bool>(),
    )
        .prop_map(|(date, category, amount, reversing)| {
            let record = TransactionRecord::new(date, AccountKind::Revenue, category, amount);
            if reversing { record.reversing() } else { record }
        })
}

/// Strategy for valid expense records dated within a year
pub fn expense_record_strategy(year: i32) -> impl Strategy<Value = TransactionRecord> {
    (
        date_in_year_strategy(year),
        prop::sample::select(EXPENSE_CATEGORIES),
        aed_amount_strategy(),
        prop_oneof![Just("cash"), Just("bank"), Just("accounts_payable")],
    )
        .prop_map(|(date, category, amount, contra)| {
            TransactionRecord::new(date, AccountKind::Expense, category, amount).against(contra)
        })
}

/// Strategy for a mixed batch of revenue and expense records
pub fn ledger_records_strategy(year: i32, max_len: usize) -> impl Strategy<Value = Vec<TransactionRecord>> {
    prop::collection::vec(
        prop_oneof![revenue_record_strategy(year), expense_record_strategy(year)],
        0..max_len,
    )
}
