//! Statement generation errors

use chrono::NaiveDate;
use thiserror::Error;

use core_kernel::{Money, TemporalError};
use domain_ledger::LedgerError;

/// A statement failed one of its cross-checks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    #[error("Balance sheet as of {as_of} does not balance: assets {assets}, liabilities and equity {liabilities_and_equity}")]
    BalanceSheetImbalance {
        as_of: NaiveDate,
        assets: Money,
        liabilities_and_equity: Money,
    },

    #[error("Cash flow closing cash {closing_cash} differs from balance sheet cash {balance_sheet_cash} as of {as_of}")]
    CashMismatch {
        as_of: NaiveDate,
        closing_cash: Money,
        balance_sheet_cash: Money,
    },

    /// Opening debits and credits differ by `difference` (debit-positive)
    #[error("Opening balances do not balance: debits exceed credits by {difference}")]
    OpeningBalancesUnbalanced { difference: Money },
}

/// Errors that can occur while generating statements
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Reconciliation error: {0}")]
    Reconciliation(#[from] ReconciliationError),
}

impl StatementError {
    /// Whether the statements were computed but failed a cross-check
    pub fn is_reconciliation(&self) -> bool {
        matches!(self, StatementError::Reconciliation(_))
    }
}
