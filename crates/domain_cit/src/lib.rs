//! CIT Engine
//!
//! Computes UAE Corporate Income Tax (Federal Decree-Law No. 47 of 2022):
//!
//! - Taxable income derived from the ledger: accounting net income plus
//!   non-deductible expenses added back
//! - Qualifying Free Zone Person treatment, Small Business Relief and the
//!   standard 9% rate above the 375,000 band, applied in that priority
//! - An audit trail whose last result is the CIT due

pub mod engine;
pub mod income;
pub mod service;
pub mod error;

pub use engine::{CitEngine, CitResult, TaxableIncome};
pub use income::{TaxableIncomeCalculator, TaxableIncomeComputation};
pub use service::{CitAssessment, CorporateTaxService};
pub use error::CitError;
