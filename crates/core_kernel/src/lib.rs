//! Core Kernel - Foundational types shared by the tax engines
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money and rate types with precise decimal arithmetic
//! - Reporting periods and filing-deadline arithmetic
//! - The statutory `TaxConfig` shared by every calculator
//! - Common identifiers and port abstractions

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod config;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate};
pub use temporal::{ReportingPeriod, Timezone, TemporalError};
pub use identifiers::{CompanyId, TransactionId, CalculationId};
pub use config::TaxConfig;
pub use error::CoreError;
pub use ports::{PortError, DomainPort, OperationMetadata};
