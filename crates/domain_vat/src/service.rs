//! VAT return service
//!
//! Wraps the pure engine with audit persistence: compute, verify the trail,
//! then hand it to the audit sink. `prepare` and `record` split the two
//! halves for callers that batch several calculations.

use std::sync::Arc;
use tracing::{info, instrument};

use core_kernel::{OperationMetadata, ReportingPeriod, TaxConfig};
use domain_audit::{record_trail, AuditRecord, AuditSink, CalculationKind};
use domain_ledger::LedgerSnapshot;

use crate::engine::{VatAdjustments, VatEngine, VatResult};
use crate::error::VatError;

/// Computes VAT returns and records their audit trails
pub struct VatReturnService {
    engine: VatEngine,
    sink: Arc<dyn AuditSink>,
}

impl VatReturnService {
    /// Creates a new service
    ///
    /// # Arguments
    ///
    /// * `config` - Tax configuration for the engine
    /// * `sink` - Where audit records go
    pub fn new(config: TaxConfig, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            engine: VatEngine::new(config),
            sink,
        }
    }

    pub fn engine(&self) -> &VatEngine {
        &self.engine
    }

    /// Computes the return for a period without recording anything
    ///
    /// Returns the result together with the audit record that documents
    /// it, for callers that persist only once every related calculation
    /// has succeeded.
    ///
    /// # Errors
    ///
    /// Returns the engine's error, or `VatError::Audit` if the trail does
    /// not reconcile with the net position
    pub fn prepare(
        &self,
        snapshot: &LedgerSnapshot,
        period: &ReportingPeriod,
        adjustments: &VatAdjustments,
    ) -> Result<(VatResult, AuditRecord), VatError> {
        let result = self.engine.calculate(snapshot, period, adjustments)?;
        let record = AuditRecord::new(
            snapshot.company_id(),
            CalculationKind::VatReturn,
            *period,
            result.summary.net_position(),
            &result.audit_trail,
        )?;
        Ok((result, record))
    }

    /// Hands a prepared audit record to the sink; true when stored
    pub async fn record(&self, record: &AuditRecord, metadata: Option<OperationMetadata>) -> bool {
        record_trail(self.sink.as_ref(), record, metadata).await
    }

    /// Computes the return for a period and records its audit trail
    ///
    /// A failure to persist the trail is logged and does not affect the
    /// returned result.
    ///
    /// # Errors
    ///
    /// Same as [`VatReturnService::prepare`]
    #[instrument(skip_all, fields(company = %snapshot.company_id(), period = %period))]
    pub async fn file_return(
        &self,
        snapshot: &LedgerSnapshot,
        period: &ReportingPeriod,
        adjustments: &VatAdjustments,
        metadata: Option<OperationMetadata>,
    ) -> Result<VatResult, VatError> {
        let (result, record) = self.prepare(snapshot, period, adjustments)?;
        let recorded = self.record(&record, metadata).await;

        info!(
            net_vat_due = %result.summary.net_vat_due,
            refund_due = %result.summary.refund_due,
            warnings = result.compliance.warnings.len(),
            recorded,
            "VAT return filed"
        );
        Ok(result)
    }
}
