//! Integration tests for the financial statement generator

use proptest::prelude::*;
use rust_decimal_macros::dec;

use domain_ledger::{AccountKind, TransactionRecord};
use domain_statements::*;
use test_utils::*;

fn generator() -> FinancialStatementGenerator {
    FinancialStatementGenerator::new(STANDARD_CONFIG.clone())
}

mod generation_tests {
    use super::*;

    #[test]
    fn test_cash_closes_to_balance_sheet() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .opening("cash", AccountKind::Asset, dec!(50000))
            .opening("share_capital", AccountKind::Equity, dec!(50000))
            .sale(d(2024, 3, 1), "sales_revenue", dec!(100000))
            .purchase(d(2024, 4, 1), "rent_expense", dec!(30000))
            .build();

        let statements = generator()
            .generate(&snapshot, &PeriodFixtures::fy_2024(), PeriodFixtures::generation_date())
            .unwrap();

        assert_money_eq(&statements.balance_sheet.assets.cash.total, dec!(120000));
        assert_money_eq(&statements.cash_flow.closing_cash, dec!(120000));
        assert_money_eq(&statements.cash_flow.opening_cash, dec!(50000));
        assert_money_eq(&statements.income_statement.net_income, dec!(70000));
        assert_eq!(
            statements.balance_sheet.equity.current_year_earnings,
            statements.income_statement.net_income
        );
        assert_eq!(
            statements.cash_flow.operating_activities.net_income,
            statements.income_statement.net_income
        );
        assert_balanced(
            &statements.balance_sheet.assets.total_assets,
            &statements.balance_sheet.liabilities.total_liabilities,
            &statements.balance_sheet.equity.total_equity,
        );
    }

    #[test]
    fn test_opening_cash_without_counterpart_is_a_reconciliation_error() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .opening("cash", AccountKind::Asset, dec!(50000))
            .sale(d(2024, 3, 1), "sales_revenue", dec!(100000))
            .build();

        let err = generator()
            .generate(&snapshot, &PeriodFixtures::fy_2024(), PeriodFixtures::generation_date())
            .unwrap_err();

        assert!(err.is_reconciliation());
        match err {
            StatementError::Reconciliation(ReconciliationError::OpeningBalancesUnbalanced { difference }) => {
                assert_money_eq(&difference, dec!(50000));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_accruals_and_financing() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .opening("bank", AccountKind::Asset, dec!(200000))
            .opening("inventory", AccountKind::Asset, dec!(30000))
            .opening("share_capital", AccountKind::Equity, dec!(150000))
            .opening("retained_earnings", AccountKind::Equity, dec!(80000))
            .record(
                TransactionRecord::new(d(2024, 2, 1), AccountKind::Revenue, "sales_revenue", dec!(90000))
                    .against("accounts_receivable"),
            )
            .record(
                TransactionRecord::new(d(2024, 2, 2), AccountKind::Expense, "cost_of_goods_sold", dec!(20000))
                    .against("inventory"),
            )
            .record(
                TransactionRecord::new(d(2024, 2, 3), AccountKind::Expense, "professional_fees", dec!(8000))
                    .against("accrued_expenses"),
            )
            .record(TransactionRecord::new(d(2024, 5, 1), AccountKind::Asset, "equipment", dec!(60000)).against("bank"))
            .record(
                TransactionRecord::new(d(2024, 12, 31), AccountKind::Expense, "depreciation", dec!(6000))
                    .against("accumulated_depreciation"),
            )
            .record(TransactionRecord::new(d(2024, 6, 1), AccountKind::Liability, "loans", dec!(40000)).against("bank"))
            .record(
                TransactionRecord::new(d(2024, 7, 1), AccountKind::Equity, "owner_drawings", dec!(5000))
                    .reversing()
                    .against("bank"),
            )
            .build();

        let statements = generator()
            .generate(&snapshot, &PeriodFixtures::fy_2024(), PeriodFixtures::generation_date())
            .unwrap();
        let operating = &statements.cash_flow.operating_activities;

        assert_money_eq(&statements.income_statement.net_income, dec!(56000));
        assert_money_eq(&operating.depreciation, dec!(6000));
        assert_money_eq(&operating.changes_in_receivables, dec!(-90000));
        assert_money_eq(&operating.changes_in_inventory, dec!(20000));
        assert_money_eq(&operating.other_working_capital, dec!(8000));
        assert_money_eq(&statements.cash_flow.investing_activities.total, dec!(-60000));
        assert_money_eq(&statements.cash_flow.financing_activities.total, dec!(35000));
        // 200,000 - 60,000 + 40,000 - 5,000
        assert_money_eq(&statements.cash_flow.closing_cash, dec!(175000));
        assert_money_eq(&statements.balance_sheet.assets.property_and_equipment.total, dec!(54000));
        assert_money_eq(&statements.balance_sheet.equity.retained_earnings.total, dec!(75000));
        assert!(statements.notes.iter().any(|n| n.title == "Property and equipment"));
    }

    #[test]
    fn test_standalone_balance_sheet_uses_financial_year() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .sale(d(2023, 6, 1), "sales_revenue", dec!(10000))
            .sale(d(2024, 6, 1), "sales_revenue", dec!(25000))
            .build();

        let sheet = generator().generate_balance_sheet(&snapshot, d(2024, 9, 30)).unwrap();

        assert_money_eq(&sheet.equity.current_year_earnings, dec!(25000));
        assert_money_eq(&sheet.equity.retained_earnings.total, dec!(10000));
        assert_money_eq(&sheet.assets.cash.total, dec!(35000));
    }

    #[test]
    fn test_notes_reflect_entity_type() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .with_profile(ProfileFixtures::qfzp())
            .sale(d(2024, 3, 1), "sales_revenue", dec!(1000))
            .build();

        let statements = generator()
            .generate(&snapshot, &PeriodFixtures::fy_2024(), PeriodFixtures::generation_date())
            .unwrap();

        let tax_note = statements.notes.iter().find(|n| n.title == "Corporate tax status").unwrap();
        assert!(tax_note.body.contains("Qualifying Free Zone Person"));
        assert_eq!(statements.notes[0].number, 1);
        assert!(statements.notes[0].body.contains("2025-01-15"));
    }

    #[test]
    fn test_cash_basis_books() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .with_profile(ProfileFixtures::cash_basis_sme())
            .opening("cash", AccountKind::Asset, dec!(20000))
            .opening("share_capital", AccountKind::Equity, dec!(20000))
            .sale(d(2024, 4, 1), "service_revenue", dec!(90000))
            .purchase(d(2024, 4, 5), "professional_fees", dec!(15000))
            .build();

        let statements = generator()
            .generate(&snapshot, &PeriodFixtures::fy_2024(), PeriodFixtures::generation_date())
            .unwrap();

        let basis = statements.notes.iter().find(|n| n.title == "Basis of preparation").unwrap();
        assert!(basis.body.contains("Palm Services LLC"));
        assert!(basis.body.contains("cash basis"));
        assert_money_eq(&statements.income_statement.net_income, dec!(75000));
        assert_money_eq(&statements.balance_sheet.assets.cash.total, dec!(95000));
        assert_eq!(statements.cash_flow.closing_cash, statements.balance_sheet.assets.cash.total);
    }

    #[test]
    fn test_regeneration_is_byte_identical() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .opening("cash", AccountKind::Asset, dec!(1000))
            .opening("share_capital", AccountKind::Equity, dec!(1000))
            .sale(d(2024, 3, 1), "service_revenue", dec!(4321.09))
            .purchase(d(2024, 3, 2), "marketing", dec!(123.45))
            .build();
        let period = PeriodFixtures::fy_2024();

        let first = generator().generate(&snapshot, &period, PeriodFixtures::generation_date()).unwrap();
        let second = generator().generate(&snapshot, &period, PeriodFixtures::generation_date()).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn statements_always_reconcile(records in ledger_records_strategy(2024, 40)) {
            let snapshot = records
                .into_iter()
                .fold(
                    TestLedgerBuilder::new()
                        .opening("bank", AccountKind::Asset, dec!(500000))
                        .opening("share_capital", AccountKind::Equity, dec!(500000)),
                    TestLedgerBuilder::record,
                )
                .build();

            let statements = generator()
                .generate(&snapshot, &PeriodFixtures::q2_2024(), PeriodFixtures::generation_date())
                .unwrap();

            let sheet = &statements.balance_sheet;
            prop_assert_eq!(sheet.assets.total_assets, sheet.total_liabilities_and_equity);
            prop_assert_eq!(
                statements.cash_flow.closing_cash,
                statements.cash_flow.opening_cash + statements.cash_flow.net_cash_flow
            );
            prop_assert_eq!(statements.cash_flow.closing_cash, sheet.assets.cash.total);
            prop_assert_eq!(sheet.equity.current_year_earnings, statements.income_statement.net_income);
        }
    }
}
