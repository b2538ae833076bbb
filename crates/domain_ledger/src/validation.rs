//! Boundary validation rules
//!
//! Every rule runs against every record, and every failure is collected, so
//! a rejected ledger comes back with the complete list of problems rather
//! than the first one.
//!
//! # Transaction Rules
//! - Field-level constraints from the `validator` derive (non-negative amount,
//!   category length, amounts up to `MAX_RECORD_AMOUNT`)
//! - Currency equals the ledger currency
//! - Exempt and zero-rated flags are mutually exclusive, and neither may carry
//!   a positive VAT amount; neither may an account the chart makes exempt or
//!   zero-rated
//! - Category resolves in the chart with the transaction's kind
//! - Contra account resolves to a balance-sheet account other than the category
//! - Cash-basis books settle revenue and expenses in cash
//!
//! # Opening Balance Rules
//! - Amount magnitude up to `MAX_RECORD_AMOUNT`
//! - Account resolves to a balance-sheet account of the stated category
//! - At most one opening balance per account
//!
//! # Profile Rules
//! - QFZP status requires Free Zone status
//! - Cash basis only below the configured revenue ceiling

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationErrors};

use core_kernel::{Currency, Money, TaxConfig};
use crate::account::{AccountKind, ChartOfAccountEntry, ChartOfAccounts, ReportingLine, VatTreatment};
use crate::profile::{AccountingBasis, CompanyTaxProfile};
use crate::record::{OpeningBalance, TransactionRecord, MAX_RECORD_AMOUNT};
use crate::transaction::{PurchaseDetail, SupplyDetail, Transaction, TransactionDetail};

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// The record the finding is about, e.g. `transaction TXN-...`
    pub record: String,
    /// Offending field
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(record: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.record, self.field, self.message)
    }
}

/// Result of validating a ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Findings that reject the ledger
    pub errors: Vec<ValidationIssue>,
    /// Non-fatal findings
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    /// Adds a warning to the report
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Merges another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Records derive-level failures in field order
    fn add_field_errors(&mut self, record: &str, errors: &ValidationErrors) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, failures) in fields {
            for failure in failures.iter() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                self.add_error(ValidationIssue::new(record, field.to_string(), message));
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s)", self.errors.len())?;
        for (i, issue) in self.errors.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { ": " } else { "; " }, issue)?;
        }
        Ok(())
    }
}

/// Validates boundary records against a chart, a currency and a profile
///
/// # Examples
///
/// ```rust,ignore
/// let validator = LedgerValidator::new(&chart, Currency::AED, &profile, &config);
/// let mut report = ValidationReport::new();
/// if let Some(tx) = validator.validate_transaction(&record, &mut report) {
///     // typed transaction
/// }
/// ```
pub struct LedgerValidator<'a> {
    chart: &'a ChartOfAccounts,
    currency: Currency,
    profile: &'a CompanyTaxProfile,
    config: &'a TaxConfig,
}

impl<'a> LedgerValidator<'a> {
    pub fn new(
        chart: &'a ChartOfAccounts,
        currency: Currency,
        profile: &'a CompanyTaxProfile,
        config: &'a TaxConfig,
    ) -> Self {
        Self {
            chart,
            currency,
            profile,
            config,
        }
    }

    /// Validates the company profile
    pub fn validate_profile(&self, report: &mut ValidationReport) {
        const RECORD: &str = "profile";

        if let Err(errors) = self.profile.validate() {
            report.add_field_errors(RECORD, &errors);
        }
        if let Some(trn) = &self.profile.trn {
            if !trn.chars().all(|c| c.is_ascii_digit()) {
                report.add_error(ValidationIssue::new(RECORD, "trn", "TRN must contain digits only"));
            }
        }
        if self.profile.annual_revenue.is_sign_negative() && !self.profile.annual_revenue.is_zero() {
            report.add_error(ValidationIssue::new(RECORD, "annualRevenue", "annual revenue must not be negative"));
        }
        if self.profile.is_qfzp && !self.profile.is_free_zone {
            report.add_error(ValidationIssue::new(
                RECORD,
                "isQFZP",
                "a Qualifying Free Zone Person must be a Free Zone entity",
            ));
        }
        if self.profile.accounting_basis == AccountingBasis::Cash && !self.profile.cash_basis_permitted(self.config) {
            report.add_error(ValidationIssue::new(
                RECORD,
                "accountingBasis",
                format!(
                    "cash basis is only permitted with annual revenue up to {}",
                    self.config.cash_basis_revenue_ceiling
                ),
            ));
        }
        if self.chart.default_cash_account().is_none() {
            report.add_warning(ValidationIssue::new(
                "chart",
                "line",
                "no cash account; every transaction must name its contra account",
            ));
        }
    }

    /// Validates an opening balance, returning the account and its natural balance
    pub fn validate_opening_balance(
        &self,
        balance: &OpeningBalance,
        report: &mut ValidationReport,
    ) -> Option<(String, Money)> {
        let record = format!("opening balance {}", balance.account);
        let before = report.errors.len();

        if let Err(errors) = balance.validate() {
            report.add_field_errors(&record, &errors);
        }
        if !balance.category.is_balance_sheet() {
            report.add_error(ValidationIssue::new(
                &record,
                "category",
                format!("opening balances are only recorded for balance-sheet accounts, got {:?}", balance.category),
            ));
        }
        match self.chart.get(&balance.account) {
            None => report.add_error(ValidationIssue::new(&record, "account", "account not found in chart")),
            Some(entry) if entry.kind() != balance.category => report.add_error(ValidationIssue::new(
                &record,
                "category",
                format!("account {} is {:?}, not {:?}", entry.code, entry.kind(), balance.category),
            )),
            Some(_) => {}
        }

        (report.errors.len() == before).then(|| (balance.account.clone(), Money::new(balance.amount, self.currency)))
    }

    /// Validates a transaction record into a typed transaction
    ///
    /// # Returns
    ///
    /// The typed transaction, or `None` when any error was recorded
    pub fn validate_transaction(
        &self,
        record: &TransactionRecord,
        report: &mut ValidationReport,
    ) -> Option<Transaction> {
        let label = format!("transaction {}", record.id);
        let before = report.errors.len();

        if let Err(errors) = record.validate() {
            report.add_field_errors(&label, &errors);
        }
        if record.currency != self.currency {
            report.add_error(ValidationIssue::new(
                &label,
                "currency",
                format!("currency {} differs from ledger currency {}", record.currency, self.currency),
            ));
        }
        self.check_vat_attributes(record, &label, report);

        match self.chart.get(&record.category) {
            None => report.add_error(ValidationIssue::new(&label, "category", format!("unknown category {}", record.category))),
            Some(entry) if entry.kind() != record.kind => report.add_error(ValidationIssue::new(
                &label,
                "kind",
                format!("category {} is a {:?} account, not {:?}", entry.code, entry.kind(), record.kind),
            )),
            Some(entry) => self.check_stated_vat_against_chart(record, entry, &label, report),
        }

        let contra = self.resolve_contra(record, &label, report);

        if record.is_free_zone_transaction && !self.profile.is_free_zone {
            report.add_warning(ValidationIssue::new(
                &label,
                "isFreeZoneTransaction",
                "Free Zone transaction recorded for a mainland entity",
            ));
        }
        if record.cit_deductible.is_some() && record.kind != AccountKind::Expense {
            report.add_warning(ValidationIssue::new(
                &label,
                "citDeductible",
                "deductibility only applies to expenses and is ignored",
            ));
        }

        if report.errors.len() != before {
            return None;
        }
        let contra = contra?;

        let vat_override = if record.is_vat_exempt {
            Some(VatTreatment::Exempt)
        } else if record.is_zero_rated {
            Some(VatTreatment::ZeroRated)
        } else {
            None
        };
        let vat_amount = record.vat_amount.map(|v| Money::new(v, self.currency));
        let detail = match record.kind {
            AccountKind::Revenue => TransactionDetail::Revenue(SupplyDetail {
                vat_override,
                vat_amount,
                free_zone: record.is_free_zone_transaction,
            }),
            AccountKind::Expense => TransactionDetail::Expense(PurchaseDetail {
                vat_override,
                vat_amount,
                cit_deductible: record.cit_deductible,
            }),
            AccountKind::Asset => TransactionDetail::Asset,
            AccountKind::Liability => TransactionDetail::Liability,
            AccountKind::Equity => TransactionDetail::Equity,
        };

        Some(Transaction {
            id: record.id,
            date: record.date,
            category: record.category.clone(),
            amount: Money::new(record.amount, self.currency),
            direction: record.direction,
            contra_account: contra,
            description: record.description.clone(),
            detail,
        })
    }

    fn check_vat_attributes(&self, record: &TransactionRecord, label: &str, report: &mut ValidationReport) {
        if record.is_vat_exempt && record.is_zero_rated {
            report.add_error(ValidationIssue::new(
                label,
                "isZeroRated",
                "a transaction cannot be both VAT exempt and zero-rated",
            ));
        }
        if let Some(vat) = record.vat_amount {
            if vat.is_sign_negative() && !vat.is_zero() {
                report.add_error(ValidationIssue::new(label, "vatAmount", "VAT amount must not be negative"));
            }
            if vat > MAX_RECORD_AMOUNT {
                report.add_error(ValidationIssue::new(
                    label,
                    "vatAmount",
                    format!("VAT amount must not exceed {}", MAX_RECORD_AMOUNT),
                ));
            }
            if vat > rust_decimal::Decimal::ZERO && (record.is_vat_exempt || record.is_zero_rated) {
                report.add_error(ValidationIssue::new(
                    label,
                    "vatAmount",
                    "exempt or zero-rated transactions cannot carry VAT",
                ));
            }
        }
        let is_pnl = matches!(record.kind, AccountKind::Revenue | AccountKind::Expense);
        if !is_pnl && (record.vat_amount.is_some() || record.is_vat_exempt || record.is_zero_rated) {
            report.add_warning(ValidationIssue::new(
                label,
                "vatAmount",
                "VAT attributes on a balance-sheet transaction are ignored",
            ));
        }
    }

    /// A stated VAT amount must agree with the chart's treatment when no flag overrides it
    fn check_stated_vat_against_chart(
        &self,
        record: &TransactionRecord,
        entry: &ChartOfAccountEntry,
        label: &str,
        report: &mut ValidationReport,
    ) {
        let stated = record.vat_amount.filter(|vat| *vat > rust_decimal::Decimal::ZERO);
        let is_pnl = matches!(record.kind, AccountKind::Revenue | AccountKind::Expense);
        if stated.is_none() || !is_pnl || record.is_vat_exempt || record.is_zero_rated {
            return;
        }
        match entry.vat_treatment {
            VatTreatment::ZeroRated | VatTreatment::Exempt => report.add_error(ValidationIssue::new(
                label,
                "vatAmount",
                format!("account {} is {:?} and cannot carry VAT", entry.code, entry.vat_treatment),
            )),
            VatTreatment::NotApplicable => report.add_warning(ValidationIssue::new(
                label,
                "vatAmount",
                format!("account {} is outside the scope of VAT; the stated VAT amount is ignored", entry.code),
            )),
            VatTreatment::Standard | VatTreatment::Blocked => {}
        }
    }

    fn resolve_contra(&self, record: &TransactionRecord, label: &str, report: &mut ValidationReport) -> Option<String> {
        let contra = match &record.contra_account {
            Some(code) => match self.chart.get(code) {
                Some(entry) => entry,
                None => {
                    report.add_error(ValidationIssue::new(label, "contraAccount", format!("unknown account {}", code)));
                    return None;
                }
            },
            None => match self.chart.default_cash_account() {
                Some(entry) => entry,
                None => {
                    report.add_error(ValidationIssue::new(
                        label,
                        "contraAccount",
                        "no contra account given and the chart has no cash account",
                    ));
                    return None;
                }
            },
        };

        if !contra.kind().is_balance_sheet() {
            report.add_error(ValidationIssue::new(
                label,
                "contraAccount",
                format!("contra account {} must be a balance-sheet account", contra.code),
            ));
        }
        if contra.code == record.category {
            report.add_error(ValidationIssue::new(
                label,
                "contraAccount",
                "contra account must differ from the category",
            ));
        }
        let is_pnl = matches!(record.kind, AccountKind::Revenue | AccountKind::Expense);
        if is_pnl && self.profile.accounting_basis == AccountingBasis::Cash && contra.line != ReportingLine::Cash {
            report.add_error(ValidationIssue::new(
                label,
                "contraAccount",
                format!("cash-basis books must settle revenue and expenses in cash, not {}", contra.code),
            ));
        }
        Some(contra.code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn validate(record: &TransactionRecord, profile: &CompanyTaxProfile) -> (Option<Transaction>, ValidationReport) {
        let chart = ChartOfAccounts::uae_standard();
        let config = TaxConfig::default();
        let validator = LedgerValidator::new(&chart, Currency::AED, profile, &config);
        let mut report = ValidationReport::new();
        let tx = validator.validate_transaction(record, &mut report);
        (tx, report)
    }

    fn profile() -> CompanyTaxProfile {
        CompanyTaxProfile::new("Oasis LLC", dec!(500000))
    }

    #[test]
    fn test_valid_record_defaults_to_cash_contra() {
        let record = TransactionRecord::new(date(), AccountKind::Revenue, "sales_revenue", dec!(100));
        let (tx, report) = validate(&record, &profile());
        assert!(report.is_valid());
        let tx = tx.unwrap();
        assert_eq!(tx.contra_account, "cash");
        assert_eq!(tx.kind(), AccountKind::Revenue);
    }

    #[test]
    fn test_collects_every_issue() {
        let record = TransactionRecord::new(date(), AccountKind::Revenue, "no_such_account", dec!(-5))
            .exempt()
            .zero_rated()
            .with_vat_amount(dec!(1));
        let (tx, report) = validate(&record, &profile());
        assert!(tx.is_none());
        let fields: Vec<_> = report.errors.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"amount"));
        assert!(fields.contains(&"category"));
        assert!(fields.contains(&"isZeroRated"));
        assert!(fields.contains(&"vatAmount"));
    }

    #[test]
    fn test_kind_must_match_chart() {
        let record = TransactionRecord::new(date(), AccountKind::Expense, "sales_revenue", dec!(10));
        let (_, report) = validate(&record, &profile());
        assert_eq!(report.errors[0].field, "kind");
    }

    #[test]
    fn test_contra_must_be_balance_sheet_and_distinct() {
        let record = TransactionRecord::new(date(), AccountKind::Expense, "rent_expense", dec!(10)).against("marketing");
        let (_, report) = validate(&record, &profile());
        assert_eq!(report.errors[0].field, "contraAccount");

        let record = TransactionRecord::new(date(), AccountKind::Asset, "cash", dec!(10));
        let (_, report) = validate(&record, &profile());
        assert!(report.errors.iter().any(|i| i.message.contains("differ")));
    }

    #[test]
    fn test_cash_basis_rejects_receivables() {
        let cash_profile = profile().with_basis(AccountingBasis::Cash);
        let record = TransactionRecord::new(date(), AccountKind::Revenue, "sales_revenue", dec!(10))
            .against("accounts_receivable");
        let (tx, report) = validate(&record, &cash_profile);
        assert!(tx.is_none());
        assert!(report.errors[0].message.contains("cash-basis"));

        let record = TransactionRecord::new(date(), AccountKind::Revenue, "sales_revenue", dec!(10)).against("bank");
        let (tx, _) = validate(&record, &cash_profile);
        assert!(tx.is_some());
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let record = TransactionRecord::new(date(), AccountKind::Revenue, "sales_revenue", dec!(10))
            .with_currency(Currency::USD);
        let (_, report) = validate(&record, &profile());
        assert_eq!(report.errors[0].field, "currency");
    }

    #[test]
    fn test_profile_rules() {
        let chart = ChartOfAccounts::uae_standard();
        let config = TaxConfig::default();
        let mut bad = CompanyTaxProfile::new("Oasis LLC", dec!(5000000)).with_basis(AccountingBasis::Cash);
        bad.is_qfzp = true;
        let validator = LedgerValidator::new(&chart, Currency::AED, &bad, &config);
        let mut report = ValidationReport::new();
        validator.validate_profile(&mut report);
        let fields: Vec<_> = report.errors.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["isQFZP", "accountingBasis"]);
    }

    #[test]
    fn test_opening_balance_kind_checked() {
        let chart = ChartOfAccounts::uae_standard();
        let config = TaxConfig::default();
        let profile = profile();
        let validator = LedgerValidator::new(&chart, Currency::AED, &profile, &config);
        let mut report = ValidationReport::new();

        let ok = validator.validate_opening_balance(
            &OpeningBalance::new("accumulated_depreciation", AccountKind::Asset, dec!(-1200)),
            &mut report,
        );
        assert_eq!(ok.map(|(_, m)| m.amount()), Some(dec!(-1200)));

        let bad = validator.validate_opening_balance(
            &OpeningBalance::new("loans", AccountKind::Asset, dec!(100)),
            &mut report,
        );
        assert!(bad.is_none());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_report_display_lists_issues() {
        let mut report = ValidationReport::new();
        report.add_error(ValidationIssue::new("transaction X", "amount", "negative"));
        report.add_error(ValidationIssue::new("profile", "trn", "bad"));
        assert_eq!(report.to_string(), "2 error(s): transaction X [amount]: negative; profile [trn]: bad");
    }
}
