//! VAT engine errors

use thiserror::Error;

use core_kernel::TemporalError;
use domain_audit::AuditError;
use domain_ledger::LedgerError;

/// Errors that can occur while computing a VAT return
#[derive(Debug, Error)]
pub enum VatError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Adjustments that cannot be applied (e.g. negative bad debt relief)
    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(String),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    /// The computed trail failed verification
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}
