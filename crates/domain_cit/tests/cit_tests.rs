//! Integration tests for the CIT engine and corporate tax service

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Money, TaxConfig};
use domain_audit::{CalculationKind, MockAuditSink};
use domain_ledger::{AccountKind, TransactionRecord};
use domain_cit::*;
use test_utils::*;

mod relief_tests {
    use super::*;

    #[test]
    fn test_income_within_band_pays_nothing() {
        let result = CitEngine::default()
            .calculate(&TaxableIncome::ordinary(Money::aed(dec!(300000))), &ProfileFixtures::mainland_sme())
            .unwrap();
        assert_money_zero(&result.cit_due);
        assert!(result.small_business_relief_applied);
        assert!(!result.free_zone_applied);
    }

    #[test]
    fn test_income_above_band_taxed_once_at_nine_percent() {
        let result = CitEngine::default()
            .calculate(&TaxableIncome::ordinary(Money::aed(dec!(500000))), &ProfileFixtures::mainland_sme())
            .unwrap();
        assert_money_eq(&result.cit_due, dec!(11250));
        assert_trail_reconciles(&result.audit_trail, &result.cit_due);
    }

    #[test]
    fn test_qfzp_with_only_qualifying_income_pays_nothing() {
        let income = TaxableIncome::new(Money::aed(dec!(2000000)), Money::aed(dec!(2000000)));
        let result = CitEngine::default().calculate(&income, &ProfileFixtures::qfzp()).unwrap();
        assert_money_zero(&result.cit_due);
        assert!(result.free_zone_applied);
        assert!(result.relief_conflict.is_none());
    }

    #[test]
    fn test_free_zone_without_qfzp_status_is_taxed_normally() {
        let result = CitEngine::default()
            .calculate(
                &TaxableIncome::ordinary(Money::aed(dec!(475000))),
                &ProfileFixtures::free_zone_non_qualifying(),
            )
            .unwrap();
        assert!(!result.free_zone_applied);
        assert_money_eq(&result.cit_due, dec!(9000));
    }

    #[test]
    fn test_wire_names() {
        let result = CitEngine::default()
            .calculate(&TaxableIncome::ordinary(Money::aed(dec!(500000))), &ProfileFixtures::mainland_sme())
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        for key in ["taxableIncome", "citRate", "citDue", "smallBusinessReliefApplied", "freeZoneApplied"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}

mod ledger_tests {
    use super::*;

    #[test]
    fn test_taxable_income_from_ledger() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .sale(d(2024, 2, 1), "sales_revenue", dec!(800000))
            .purchase(d(2024, 3, 1), "salaries", dec!(280000))
            .purchase(d(2024, 4, 1), "fines_penalties", dec!(5000))
            .build();

        let computation = TaxableIncomeCalculator::compute(&snapshot, &PeriodFixtures::fy_2024()).unwrap();
        assert_money_eq(&computation.accounting_income, dec!(515000));
        assert_money_eq(&computation.taxable_income.amount, dec!(520000));

        let result = CitEngine::default()
            .calculate(&computation.taxable_income, snapshot.profile())
            .unwrap();
        // (520,000 - 375,000) x 9%
        assert_money_eq(&result.cit_due, dec!(13050));
    }

    #[test]
    fn test_qfzp_ledger_with_mixed_income() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .with_profile(ProfileFixtures::qfzp())
            .record(TransactionRecord::new(d(2024, 2, 1), AccountKind::Revenue, "sales_revenue", dec!(1500000)).free_zone())
            .sale(d(2024, 2, 2), "other_income", dec!(100000))
            .purchase(d(2024, 3, 1), "salaries", dec!(400000))
            .build();

        let computation = TaxableIncomeCalculator::compute(&snapshot, &PeriodFixtures::fy_2024()).unwrap();
        let result = CitEngine::default()
            .calculate(&computation.taxable_income, snapshot.profile())
            .unwrap();

        assert_money_eq(&result.taxable_income, dec!(1200000));
        assert_money_eq(&result.qualifying_income, dec!(1200000));
        assert_money_zero(&result.cit_due);
    }
}

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_assessment_records_trail_and_deadline() {
        init_test_tracing();
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .sale(d(2024, 5, 1), "sales_revenue", dec!(500000))
            .build();
        let sink = Arc::new(MockAuditSink::new());
        let service = CorporateTaxService::new(TaxConfig::default(), sink.clone());

        let assessment = service.assess(&snapshot, &PeriodFixtures::fy_2024(), None).await.unwrap();

        assert_money_eq(&assessment.result.cit_due, dec!(11250));
        assert_eq!(assessment.filing_due, d(2025, 9, 30));
        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, CalculationKind::CorporateTax);
        assert_eq!(records[0].result, assessment.result.cit_due);
    }

    #[tokio::test]
    async fn test_failing_sink_is_tolerated() {
        let d = PeriodFixtures::date;
        let snapshot = TestLedgerBuilder::new()
            .sale(d(2024, 5, 1), "sales_revenue", dec!(500000))
            .build();
        let service = CorporateTaxService::new(TaxConfig::default(), Arc::new(MockAuditSink::failing("offline")));

        let assessment = service.assess(&snapshot, &PeriodFixtures::fy_2024(), None).await.unwrap();
        assert_money_eq(&assessment.result.cit_due, dec!(11250));
    }
}

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn cit_is_monotonic_in_taxable_income(a in aed_amount_strategy(), b in aed_amount_strategy()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let engine = CitEngine::default();
            let profile = ProfileFixtures::mainland_sme();
            let cit = |amount: Decimal| engine
                .calculate(&TaxableIncome::ordinary(Money::aed(amount * dec!(10))), &profile)
                .unwrap()
                .cit_due
                .amount();
            prop_assert!(cit(low) <= cit(high));
        }

        #[test]
        fn cit_never_exceeds_standard_rate(amount in aed_amount_strategy()) {
            let result = CitEngine::default()
                .calculate(&TaxableIncome::ordinary(Money::aed(amount)), &ProfileFixtures::mainland_sme())
                .unwrap();
            prop_assert!(!result.cit_due.is_negative());
            prop_assert!(result.cit_due.amount() <= (amount * dec!(0.09)).round_dp(2));
        }
    }
}
