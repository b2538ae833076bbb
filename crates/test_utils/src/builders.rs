//! Test Data Builders
//!
//! Provides a ledger builder that lets tests state only the transactions
//! they care about while using defaults for everything else.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::CompanyId;
use domain_ledger::{
    AccountKind, ChartOfAccounts, CompanyTaxProfile, LedgerInputs, LedgerSnapshot, OpeningBalance,
    TransactionRecord,
};

use crate::fixtures::{ProfileFixtures, STANDARD_CHART, STANDARD_CONFIG};

/// Builder for ledger inputs and snapshots
pub struct TestLedgerBuilder {
    company_id: CompanyId,
    profile: CompanyTaxProfile,
    chart: ChartOfAccounts,
    opening_balances: Vec<OpeningBalance>,
    records: Vec<TransactionRecord>,
}

impl Default for TestLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLedgerBuilder {
    /// Creates a new builder for a mainland SME with the standard chart
    pub fn new() -> Self {
        Self {
            company_id: CompanyId::new(),
            profile: ProfileFixtures::mainland_sme(),
            chart: STANDARD_CHART.clone(),
            opening_balances: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Sets the company ID
    pub fn with_company_id(mut self, id: CompanyId) -> Self {
        self.company_id = id;
        self
    }

    /// Sets the tax profile
    pub fn with_profile(mut self, profile: CompanyTaxProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replaces the chart of accounts
    pub fn with_chart(mut self, chart: ChartOfAccounts) -> Self {
        self.chart = chart;
        self
    }

    /// Adds an opening balance
    pub fn opening(mut self, account: &str, kind: AccountKind, amount: Decimal) -> Self {
        self.opening_balances.push(OpeningBalance::new(account, kind, amount));
        self
    }

    /// Adds a revenue transaction settled in cash
    pub fn sale(self, date: NaiveDate, category: &str, amount: Decimal) -> Self {
        self.record(TransactionRecord::new(date, AccountKind::Revenue, category, amount))
    }

    /// Adds an expense transaction settled in cash
    pub fn purchase(self, date: NaiveDate, category: &str, amount: Decimal) -> Self {
        self.record(TransactionRecord::new(date, AccountKind::Expense, category, amount))
    }

    /// Adds an arbitrary record
    pub fn record(mut self, record: TransactionRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Builds the raw inputs
    pub fn build_inputs(self) -> LedgerInputs {
        self.opening_balances.into_iter().fold(
            LedgerInputs::new(self.company_id, self.profile)
                .with_chart(self.chart)
                .with_transactions(self.records),
            LedgerInputs::with_opening_balance,
        )
    }

    /// Builds a validated snapshot
    ///
    /// # Panics
    ///
    /// Panics with the validation report if the ledger is invalid
    pub fn build(self) -> LedgerSnapshot {
        match LedgerSnapshot::build(self.build_inputs(), &STANDARD_CONFIG) {
            Ok(snapshot) => snapshot,
            Err(e) => panic!("test ledger failed validation: {}", e),
        }
    }
}
