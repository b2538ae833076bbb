//! Validated, immutable ledger snapshot
//!
//! This is the only type the tax engines and the statement generator read.
//! Once built, a snapshot never changes, so every computation over it is a
//! pure function.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use core_kernel::{CompanyId, Currency, Money, ReportingPeriod, TaxConfig};
use crate::account::{ChartOfAccountEntry, ChartOfAccounts};
use crate::error::LedgerError;
use crate::profile::CompanyTaxProfile;
use crate::record::LedgerInputs;
use crate::transaction::Transaction;
use crate::validation::{LedgerValidator, ValidationIssue, ValidationReport};

/// A company's validated books
///
/// # Invariants
///
/// - Every transaction and opening balance passed boundary validation
/// - Transactions are sorted by date, then by id
/// - All amounts are in `currency`
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    company_id: CompanyId,
    currency: Currency,
    chart: ChartOfAccounts,
    /// Natural-orientation opening balance per account
    opening_balances: BTreeMap<String, Money>,
    transactions: Vec<Transaction>,
    profile: CompanyTaxProfile,
    warnings: Vec<ValidationIssue>,
}

impl LedgerSnapshot {
    /// Validates boundary inputs into a snapshot
    ///
    /// # Arguments
    ///
    /// * `inputs` - Raw ledger document for one company
    /// * `config` - Tax configuration (supplies the cash-basis ceiling)
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` carrying every issue found when any
    /// record, opening balance or the profile is invalid
    pub fn build(inputs: LedgerInputs, config: &TaxConfig) -> Result<Self, LedgerError> {
        let LedgerInputs {
            company_id,
            currency,
            chart,
            opening_balances,
            transactions: records,
            profile,
        } = inputs;

        let mut report = ValidationReport::new();
        let validator = LedgerValidator::new(&chart, currency, &profile, config);
        validator.validate_profile(&mut report);

        let mut openings = BTreeMap::new();
        for balance in &opening_balances {
            if let Some((account, amount)) = validator.validate_opening_balance(balance, &mut report) {
                if openings.insert(account.clone(), amount).is_some() {
                    report.add_error(ValidationIssue::new(
                        format!("opening balance {}", account),
                        "account",
                        "duplicate opening balance for account",
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        let mut transactions = Vec::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                report.add_error(ValidationIssue::new(
                    format!("transaction {}", record.id),
                    "id",
                    "duplicate transaction id",
                ));
                continue;
            }
            if let Some(tx) = validator.validate_transaction(record, &mut report) {
                transactions.push(tx);
            }
        }

        if !report.is_valid() {
            debug!(company = %company_id, errors = report.errors.len(), "ledger rejected");
            return Err(LedgerError::Validation(report));
        }

        transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        debug!(
            company = %company_id,
            transactions = transactions.len(),
            warnings = report.warnings.len(),
            "ledger snapshot built"
        );

        Ok(Self {
            company_id,
            currency,
            chart,
            opening_balances: openings,
            transactions,
            profile,
            warnings: report.warnings,
        })
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    pub fn profile(&self) -> &CompanyTaxProfile {
        &self.profile
    }

    /// Opening balances in each account's natural orientation
    pub fn opening_balances(&self) -> &BTreeMap<String, Money> {
        &self.opening_balances
    }

    /// All transactions, date ordered
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Non-fatal findings from validation
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    /// Looks up a chart account
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownAccount` if the code is not in the chart
    pub fn account(&self, code: &str) -> Result<&ChartOfAccountEntry, LedgerError> {
        self.chart
            .get(code)
            .ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))
    }

    /// Transactions dated within the period
    pub fn transactions_in(&self, period: &ReportingPeriod) -> impl Iterator<Item = &Transaction> {
        let period = *period;
        self.transactions.iter().filter(move |tx| period.contains(tx.date))
    }

    /// Transactions dated on or before `date`
    pub fn transactions_through(&self, date: NaiveDate) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().take_while(move |tx| tx.date <= date)
    }

    /// Zero in the ledger currency
    pub fn zero(&self) -> Money {
        Money::zero(self.currency)
    }
}
