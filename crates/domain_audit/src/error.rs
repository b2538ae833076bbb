//! Audit trail errors

use thiserror::Error;

use core_kernel::Money;

/// Ways an audit trail can fail verification
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditError {
    /// The trail has no entries
    #[error("Audit trail is empty")]
    Empty,

    /// A step number does not increase
    #[error("Audit trail out of order at position {position}: step {step} follows step {previous}")]
    OutOfOrder {
        position: usize,
        previous: u32,
        step: u32,
    },

    /// The last entry does not reproduce the summary figure
    #[error("Audit trail ends at {actual}, summary figure is {expected}")]
    ResultMismatch {
        expected: Money,
        actual: Money,
    },
}
