//! CLI configuration

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use core_kernel::ReportingPeriod;

use crate::error::ServiceError;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Binary configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// JSON ledger document to read
    pub ledger_path: PathBuf,
    /// JSON-lines file audit records are appended to
    pub audit_log_path: PathBuf,
    /// First day of the reporting period
    pub period_start: NaiveDate,
    /// Last day of the reporting period
    pub period_end: NaiveDate,
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from `APP_*` environment variables
    ///
    /// `APP_LEDGER_PATH`, `APP_PERIOD_START` and `APP_PERIOD_END` are
    /// required; the audit log defaults to `audit.jsonl` and logging to plain
    /// text at `info`.
    pub fn from_env() -> Result<Self, ServiceError> {
        let loaded: AppConfig = config::Config::builder()
            .set_default("audit_log_path", "audit.jsonl")?
            .set_default("log_level", "info")?
            .set_default("log_format", "plain")?
            .add_source(config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()?;
        loaded.period()?;
        Ok(loaded)
    }

    /// The configured reporting period
    pub fn period(&self) -> Result<ReportingPeriod, ServiceError> {
        Ok(ReportingPeriod::new(self.period_start, self.period_end)?)
    }
}
