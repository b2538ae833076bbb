//! Service error handling

use thiserror::Error;

use core_kernel::{CoreError, PortError, TemporalError};
use domain_cit::CitError;
use domain_ledger::LedgerError;
use domain_statements::StatementError;
use domain_vat::VatError;

/// Errors from running a compliance report
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("VAT error: {0}")]
    Vat(#[from] VatError),

    #[error("CIT error: {0}")]
    Cit(#[from] CitError),

    #[error("Statement error: {0}")]
    Statements(#[from] StatementError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A batch task panicked or was aborted
    #[error("Task error: {0}")]
    Task(String),
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::Configuration(err.to_string())
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        ServiceError::Configuration(err.to_string())
    }
}
