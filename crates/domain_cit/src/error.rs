//! CIT engine errors

use thiserror::Error;

use core_kernel::TemporalError;
use domain_audit::AuditError;
use domain_ledger::LedgerError;

/// Errors that can occur while computing corporate tax
#[derive(Debug, Error)]
pub enum CitError {
    /// Taxable income figures that cannot be assessed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}
