//! Compliance report orchestration
//!
//! One report = one ledger load, one validated snapshot, then every engine
//! run against that same snapshot. Audit trails are persisted only after
//! every calculation has succeeded, so a failed report leaves no records.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use core_kernel::{CompanyId, OperationMetadata, ReportingPeriod, TaxConfig};
use domain_audit::AuditSink;
use domain_cit::{CitAssessment, CorporateTaxService};
use domain_ledger::{LedgerPort, LedgerSnapshot, ValidationIssue};
use domain_statements::{FinancialStatementGenerator, FinancialStatements};
use domain_vat::{assess_registration, RegistrationAssessment, VatAdjustments, VatResult, VatReturnService};

use crate::error::ServiceError;

/// What to report on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRequest {
    pub company_id: CompanyId,
    pub period: ReportingPeriod,
    #[serde(default)]
    pub vat_adjustments: VatAdjustments,
    /// Date printed on the financial statements
    pub generation_date: NaiveDate,
}

impl ComplianceRequest {
    pub fn new(company_id: CompanyId, period: ReportingPeriod, generation_date: NaiveDate) -> Self {
        Self {
            company_id,
            period,
            vat_adjustments: VatAdjustments::default(),
            generation_date,
        }
    }

    pub fn with_vat_adjustments(mut self, adjustments: VatAdjustments) -> Self {
        self.vat_adjustments = adjustments;
        self
    }
}

/// Filing due dates for the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingDeadlines {
    pub vat_return_due: NaiveDate,
    pub cit_return_due: NaiveDate,
}

/// Everything computed for one company and period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub company_id: CompanyId,
    pub period: ReportingPeriod,
    pub vat: VatResult,
    pub cit: CitAssessment,
    pub statements: FinancialStatements,
    /// Twelve months ending on the period end
    pub registration: RegistrationAssessment,
    pub deadlines: FilingDeadlines,
    /// Non-fatal findings from ledger validation
    pub ledger_warnings: Vec<ValidationIssue>,
}

/// Runs compliance reports against a ledger source
pub struct ComplianceService {
    ledger: Arc<dyn LedgerPort>,
    vat: VatReturnService,
    cit: CorporateTaxService,
    statements: FinancialStatementGenerator,
    config: TaxConfig,
}

impl ComplianceService {
    /// Creates a new service
    ///
    /// # Arguments
    ///
    /// * `config` - Tax configuration shared by every engine
    /// * `ledger` - Where ledgers are loaded from
    /// * `sink` - Where audit records go
    pub fn new(config: TaxConfig, ledger: Arc<dyn LedgerPort>, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            ledger,
            vat: VatReturnService::new(config.clone(), Arc::clone(&sink)),
            cit: CorporateTaxService::new(config.clone(), sink),
            statements: FinancialStatementGenerator::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Loads, validates and reports on one company's ledger
    ///
    /// # Errors
    ///
    /// - `ServiceError::Port` if the ledger cannot be loaded
    /// - `ServiceError::Ledger` if the ledger fails validation
    /// - `ServiceError::Vat`, `ServiceError::Cit` or `ServiceError::Statements`
    ///   if an engine rejects the snapshot
    #[instrument(skip_all, fields(company = %request.company_id, period = %request.period))]
    pub async fn run(
        &self,
        request: &ComplianceRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<ComplianceReport, ServiceError> {
        let inputs = self.ledger.load_ledger(request.company_id, metadata.clone()).await?;
        let snapshot = LedgerSnapshot::build(inputs, &self.config)?;
        for issue in snapshot.warnings() {
            warn!(%issue, "ledger warning");
        }

        let period = &request.period;
        let (vat, vat_record) = self.vat.prepare(&snapshot, period, &request.vat_adjustments)?;
        let (cit, cit_record) = self.cit.prepare(&snapshot, period)?;
        let statements = self.statements.generate(&snapshot, period, request.generation_date)?;
        let registration = assess_registration(&snapshot, period.end, &self.config)?;
        let deadlines = FilingDeadlines {
            vat_return_due: self.config.vat_return_due(period.end)?,
            cit_return_due: cit.filing_due,
        };

        let vat_recorded = self.vat.record(&vat_record, metadata.clone()).await;
        let cit_recorded = self.cit.record(&cit_record, metadata).await;

        info!(
            net_vat_due = %vat.summary.net_vat_due,
            cit_due = %cit.result.cit_due,
            net_income = %statements.income_statement.net_income,
            registration = ?registration.status,
            vat_recorded,
            cit_recorded,
            "compliance report completed"
        );

        Ok(ComplianceReport {
            company_id: request.company_id,
            period: *period,
            vat,
            cit,
            statements,
            registration,
            deadlines,
            ledger_warnings: snapshot.warnings().to_vec(),
        })
    }

    /// Runs independent reports concurrently
    ///
    /// Each request gets its own snapshot. Results come back in request
    /// order; one failing report does not stop the others.
    pub async fn run_batch(
        self: &Arc<Self>,
        requests: Vec<ComplianceRequest>,
    ) -> Vec<Result<ComplianceReport, ServiceError>> {
        let total = requests.len();
        let mut tasks = JoinSet::new();
        for (index, request) in requests.into_iter().enumerate() {
            let service = Arc::clone(self);
            tasks.spawn(async move {
                let metadata = OperationMetadata::with_correlation_id(format!("batch-{}", index));
                (index, service.run(&request, Some(metadata)).await)
            });
        }

        let mut results: Vec<Option<Result<ComplianceReport, ServiceError>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!(error = %e, "compliance task did not complete"),
            }
        }

        results
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Err(ServiceError::Task("report task aborted".to_string()))))
            .collect()
    }
}
