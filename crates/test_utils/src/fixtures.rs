//! Pre-built Test Fixtures
//!
//! Provides ready-to-use configuration, periods and company profiles.
//! These fixtures are consistent and predictable across test suites.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use core_kernel::{ReportingPeriod, TaxConfig};
use domain_ledger::{AccountingBasis, ChartOfAccounts, CompanyTaxProfile};

/// Statutory configuration shared by every test
pub static STANDARD_CONFIG: Lazy<TaxConfig> = Lazy::new(TaxConfig::default);

/// The standard UAE SME chart
pub static STANDARD_CHART: Lazy<ChartOfAccounts> = Lazy::new(ChartOfAccounts::uae_standard);

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

/// Installs a test-friendly tracing subscriber once per process
///
/// Controlled by `RUST_LOG`; silent by default.
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

/// Fixture for dates and periods
pub struct PeriodFixtures;

impl PeriodFixtures {
    /// Calendar date shorthand
    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    /// First VAT quarter of 2024 (91 days)
    pub fn q1_2024() -> ReportingPeriod {
        ReportingPeriod::new(Self::date(2024, 1, 1), Self::date(2024, 3, 31)).expect("valid period")
    }

    /// Second VAT quarter of 2024
    pub fn q2_2024() -> ReportingPeriod {
        ReportingPeriod::new(Self::date(2024, 4, 1), Self::date(2024, 6, 30)).expect("valid period")
    }

    /// Financial year 2024
    pub fn fy_2024() -> ReportingPeriod {
        ReportingPeriod::calendar_year(2024).expect("valid year")
    }

    /// Generation date used for statement fixtures
    pub fn generation_date() -> NaiveDate {
        Self::date(2025, 1, 15)
    }
}

/// Fixture for company tax profiles
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// Mainland accrual-basis trading company
    pub fn mainland_sme() -> CompanyTaxProfile {
        CompanyTaxProfile::new("Falcon Trading LLC", dec!(1200000)).with_trn("100123456700003")
    }

    /// Mainland company small enough for cash-basis books
    pub fn cash_basis_sme() -> CompanyTaxProfile {
        CompanyTaxProfile::new("Palm Services LLC", dec!(400000)).with_basis(AccountingBasis::Cash)
    }

    /// Qualifying Free Zone Person under the revenue ceiling
    pub fn qfzp() -> CompanyTaxProfile {
        CompanyTaxProfile::new("Dune Logistics FZE", dec!(2000000)).qualifying_free_zone_person()
    }

    /// Free Zone entity that is not a QFZP
    pub fn free_zone_non_qualifying() -> CompanyTaxProfile {
        CompanyTaxProfile::new("Creek Media FZ-LLC", dec!(800000)).in_free_zone()
    }
}
