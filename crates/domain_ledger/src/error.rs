//! Ledger model errors

use thiserror::Error;

use core_kernel::{MoneyError, TemporalError};
use crate::validation::ValidationReport;

/// Errors that can occur in the ledger model
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Boundary validation failed; the report lists every issue found
    #[error("Ledger validation failed: {0}")]
    Validation(ValidationReport),

    /// Account code appears twice in the chart
    #[error("Duplicate account code: {0}")]
    DuplicateAccount(String),

    /// Account code not present in the chart
    #[error("Account not found: {0}")]
    UnknownAccount(String),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}

impl LedgerError {
    /// Returns the validation report when this is a validation failure
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            LedgerError::Validation(report) => Some(report),
            _ => None,
        }
    }
}
