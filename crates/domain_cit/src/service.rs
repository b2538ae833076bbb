//! Corporate tax return service

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use core_kernel::{CompanyId, OperationMetadata, ReportingPeriod, TaxConfig};
use domain_audit::{record_trail, AuditRecord, AuditSink, CalculationKind};
use domain_ledger::LedgerSnapshot;

use crate::engine::{CitEngine, CitResult};
use crate::error::CitError;
use crate::income::{TaxableIncomeCalculator, TaxableIncomeComputation};

/// Corporate tax position of a company for one tax period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitAssessment {
    pub company_id: CompanyId,
    pub period: ReportingPeriod,
    pub income: TaxableIncomeComputation,
    pub result: CitResult,
    /// Return and payment due date
    pub filing_due: NaiveDate,
}

/// Computes corporate tax from a ledger and records the audit trail
pub struct CorporateTaxService {
    engine: CitEngine,
    sink: Arc<dyn AuditSink>,
}

impl CorporateTaxService {
    pub fn new(config: TaxConfig, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            engine: CitEngine::new(config),
            sink,
        }
    }

    pub fn engine(&self) -> &CitEngine {
        &self.engine
    }

    /// Assesses corporate tax for a period without recording anything
    ///
    /// # Errors
    ///
    /// Returns `CitError` if taxable income cannot be derived or assessed
    pub fn prepare(
        &self,
        snapshot: &LedgerSnapshot,
        period: &ReportingPeriod,
    ) -> Result<(CitAssessment, AuditRecord), CitError> {
        let income = TaxableIncomeCalculator::compute(snapshot, period)?;
        let result = self.engine.calculate(&income.taxable_income, snapshot.profile())?;
        let filing_due = self.engine.config().cit_return_due(period.end)?;

        let record = AuditRecord::new(
            snapshot.company_id(),
            CalculationKind::CorporateTax,
            *period,
            result.cit_due,
            &result.audit_trail,
        )?;
        let assessment = CitAssessment {
            company_id: snapshot.company_id(),
            period: *period,
            income,
            result,
            filing_due,
        };
        Ok((assessment, record))
    }

    /// Hands a prepared audit record to the sink; true when stored
    pub async fn record(&self, record: &AuditRecord, metadata: Option<OperationMetadata>) -> bool {
        record_trail(self.sink.as_ref(), record, metadata).await
    }

    /// Assesses corporate tax for a period and records the trail
    ///
    /// Persisting the trail is best effort: a sink failure is logged and the
    /// assessment is still returned.
    ///
    /// # Errors
    ///
    /// Same as [`CorporateTaxService::prepare`]
    #[instrument(skip_all, fields(company = %snapshot.company_id(), period = %period))]
    pub async fn assess(
        &self,
        snapshot: &LedgerSnapshot,
        period: &ReportingPeriod,
        metadata: Option<OperationMetadata>,
    ) -> Result<CitAssessment, CitError> {
        let (assessment, record) = self.prepare(snapshot, period)?;
        let recorded = self.record(&record, metadata).await;

        info!(
            taxable_income = %assessment.result.taxable_income,
            cit_due = %assessment.result.cit_due,
            relief_conflict = assessment.result.relief_conflict.is_some(),
            recorded,
            "corporate tax assessed"
        );
        Ok(assessment)
    }
}
