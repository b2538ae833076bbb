//! UAE tax compliance report binary
//!
//! Reads a JSON ledger document, runs the VAT return, corporate tax
//! assessment and financial statements for one period, appends the audit
//! trails to a JSON-lines log, and prints the report as pretty JSON.
//!
//! # Usage
//!
//! ```bash
//! APP_LEDGER_PATH=ledger.json APP_PERIOD_START=2024-01-01 APP_PERIOD_END=2024-12-31 uae-tax
//! ```
//!
//! # Environment Variables
//!
//! * `APP_LEDGER_PATH` - Ledger document to read (required)
//! * `APP_PERIOD_START` / `APP_PERIOD_END` - Reporting period, ISO dates (required)
//! * `APP_AUDIT_LOG_PATH` - Audit log file (default: audit.jsonl)
//! * `APP_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `APP_LOG_FORMAT` - `plain` or `json` (default: plain)
//! * `TAX_*` - Overrides for the statutory rates and thresholds

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{OperationMetadata, TaxConfig, Timezone};
use interface_cli::{AppConfig, ComplianceRequest, ComplianceService, JsonLedgerSource, JsonlAuditSink, LogFormat};

/// Runs one compliance report.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The ledger document cannot be read or fails validation
/// - Any engine rejects the ledger, including reconciliation failures
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let app_config = AppConfig::from_env().context("failed to load APP_* configuration")?;
    init_tracing(&app_config.log_level, app_config.log_format);

    let tax_config = TaxConfig::from_env().context("failed to load TAX_* configuration")?;
    let period = app_config.period()?;

    tracing::info!(
        ledger = %app_config.ledger_path.display(),
        audit_log = %app_config.audit_log_path.display(),
        %period,
        "Starting UAE tax compliance report"
    );

    let source = Arc::new(JsonLedgerSource::new(&app_config.ledger_path));
    let company_id = source
        .read_document()
        .await
        .with_context(|| format!("failed to read {}", app_config.ledger_path.display()))?
        .company_id;
    let sink = Arc::new(JsonlAuditSink::new(&app_config.audit_log_path));
    let service = ComplianceService::new(tax_config, source, sink);

    let request = ComplianceRequest::new(company_id, period, Timezone::uae().today());
    let metadata = OperationMetadata::with_correlation_id(company_id.to_string()).initiated_by("uae-tax");
    let report = service.run(&request, Some(metadata)).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout carries only the report. `RUST_LOG`
/// overrides the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Plain => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
