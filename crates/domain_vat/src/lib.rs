//! VAT Engine
//!
//! Computes the figures of a UAE VAT return (Federal Decree-Law No. 8 of
//! 2017) for one tax period from a validated ledger snapshot:
//!
//! - Output VAT on standard-rated supplies; zero-rated, exempt and
//!   out-of-scope supplies tracked separately
//! - Input VAT on recoverable purchases, with blocked input VAT reported but
//!   never claimed
//! - Net VAT due or refund after corrections and bad debt relief
//! - Registration thresholds and anomaly warnings (advisory only)
//! - A six-step audit trail whose last result is the net position
//!
//! # Example
//!
//! ```rust,ignore
//! let engine = VatEngine::new(TaxConfig::default());
//! let result = engine.calculate(&snapshot, &q1, &VatAdjustments::default())?;
//! assert!(result.summary.net_vat_due.is_zero() || result.summary.refund_due.is_zero());
//! ```

pub mod engine;
pub mod compliance;
pub mod registration;
pub mod service;
pub mod error;

pub use engine::{SupplySide, VatAdjustments, VatEngine, VatLineItem, VatResult, VatSummary};
pub use compliance::{ComplianceWarning, VatCompliance, WarningCode};
pub use registration::{assess_registration, rolling_taxable_supplies, RegistrationAssessment, RegistrationStatus};
pub use service::VatReturnService;
pub use error::VatError;
