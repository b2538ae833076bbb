//! Boundary records
//!
//! These are the shapes a ledger document arrives in. They are deliberately
//! loose (flags rather than enums, optional fields everywhere) and are only
//! consumed by [`crate::LedgerSnapshot::build`], which validates them into the
//! typed model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::{CompanyId, Currency, TransactionId};
use crate::account::{AccountKind, ChartOfAccounts};
use crate::profile::CompanyTaxProfile;
use crate::transaction::EntryDirection;

/// Largest magnitude accepted for any single amount on a ledger document
///
/// Keeps every sum the engines form over a ledger well inside `Decimal` range.
pub const MAX_RECORD_AMOUNT: Decimal = dec!(1000000000000000);

fn validate_magnitude(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.abs() > MAX_RECORD_AMOUNT {
        let mut error = ValidationError::new("amount_too_large");
        error.message = Some(format!("amount must not exceed {}", MAX_RECORD_AMOUNT).into());
        return Err(error);
    }
    Ok(())
}

fn validate_non_negative(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        let mut error = ValidationError::new("negative_amount");
        error.message = Some("amount must not be negative".into());
        return Err(error);
    }
    validate_magnitude(amount)
}

/// A transaction as recorded by the bookkeeping front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub kind: AccountKind,
    /// Chart account code
    #[validate(length(min = 1, max = 64, message = "category must be 1-64 characters"))]
    pub category: String,
    #[validate(custom(function = "validate_non_negative"))]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub vat_amount: Option<Decimal>,
    #[serde(default)]
    pub is_vat_exempt: bool,
    #[serde(default)]
    pub is_zero_rated: bool,
    #[serde(default)]
    pub is_free_zone_transaction: bool,
    #[serde(default)]
    pub cit_deductible: Option<bool>,
    #[serde(default)]
    pub direction: EntryDirection,
    #[serde(default)]
    pub contra_account: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl TransactionRecord {
    /// Creates a record with every optional attribute unset
    ///
    /// # Arguments
    ///
    /// * `date` - Transaction date
    /// * `kind` - Transaction kind
    /// * `category` - Chart account code
    /// * `amount` - Non-negative amount in the ledger currency
    pub fn new(date: NaiveDate, kind: AccountKind, category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            kind,
            category: category.into(),
            amount,
            currency: Currency::default(),
            vat_amount: None,
            is_vat_exempt: false,
            is_zero_rated: false,
            is_free_zone_transaction: false,
            cit_deductible: None,
            direction: EntryDirection::Increase,
            contra_account: None,
            description: None,
        }
    }

    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = id;
        self
    }

    pub fn with_vat_amount(mut self, vat: Decimal) -> Self {
        self.vat_amount = Some(vat);
        self
    }

    pub fn exempt(mut self) -> Self {
        self.is_vat_exempt = true;
        self
    }

    pub fn zero_rated(mut self) -> Self {
        self.is_zero_rated = true;
        self
    }

    pub fn free_zone(mut self) -> Self {
        self.is_free_zone_transaction = true;
        self
    }

    pub fn with_cit_deductible(mut self, deductible: bool) -> Self {
        self.cit_deductible = Some(deductible);
        self
    }

    /// Books the record as a reversal of its account's natural balance
    pub fn reversing(mut self) -> Self {
        self.direction = EntryDirection::Decrease;
        self
    }

    /// Settles against the given balance-sheet account instead of cash
    pub fn against(mut self, contra_account: impl Into<String>) -> Self {
        self.contra_account = Some(contra_account.into());
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Balance of a balance-sheet account before the first transaction
///
/// `amount` is signed in the natural orientation of `category`: a contra
/// asset such as accumulated depreciation opens negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OpeningBalance {
    pub account: String,
    pub category: AccountKind,
    #[validate(custom(function = "validate_magnitude"))]
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

impl OpeningBalance {
    pub fn new(account: impl Into<String>, category: AccountKind, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            category,
            amount,
            description: None,
        }
    }
}

/// Everything needed to build a [`crate::LedgerSnapshot`] for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerInputs {
    pub company_id: CompanyId,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "ChartOfAccounts::uae_standard")]
    pub chart: ChartOfAccounts,
    #[serde(default)]
    pub opening_balances: Vec<OpeningBalance>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    pub profile: CompanyTaxProfile,
}

impl LedgerInputs {
    /// Inputs with the standard UAE chart and no activity
    pub fn new(company_id: CompanyId, profile: CompanyTaxProfile) -> Self {
        Self {
            company_id,
            currency: Currency::AED,
            chart: ChartOfAccounts::uae_standard(),
            opening_balances: Vec::new(),
            transactions: Vec::new(),
            profile,
        }
    }

    pub fn with_chart(mut self, chart: ChartOfAccounts) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_opening_balance(mut self, balance: OpeningBalance) -> Self {
        self.opening_balances.push(balance);
        self
    }

    pub fn with_transaction(mut self, record: TransactionRecord) -> Self {
        self.transactions.push(record);
        self
    }

    pub fn with_transactions(mut self, records: impl IntoIterator<Item = TransactionRecord>) -> Self {
        self.transactions.extend(records);
        self
    }
}
