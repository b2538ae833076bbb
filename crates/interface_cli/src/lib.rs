//! Command-line interface
//!
//! Wires the tax engines to file-based adapters and runs full compliance
//! reports: VAT return, corporate tax assessment and financial statements
//! for one company and period.
//!
//! # Architecture
//!
//! - **Adapters**: JSON ledger documents in, JSON-lines audit log out
//! - **Service**: Loads a ledger, validates it once, runs every engine on the
//!   same snapshot
//! - **Config**: `APP_*` environment variables for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! let service = ComplianceService::new(config, Arc::new(JsonLedgerSource::new(path)), Arc::new(sink));
//! let report = service.run(&request, None).await?;
//! ```

pub mod config;
pub mod error;
pub mod adapters;
pub mod service;

pub use config::{AppConfig, LogFormat};
pub use error::ServiceError;
pub use adapters::{JsonLedgerSource, JsonlAuditSink};
pub use service::{ComplianceReport, ComplianceRequest, ComplianceService, FilingDeadlines};
