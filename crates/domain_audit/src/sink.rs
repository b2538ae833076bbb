//! Audit sink port and persisted audit records

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use core_kernel::{CalculationId, CompanyId, DomainPort, Money, OperationMetadata, PortError, ReportingPeriod};
use crate::error::AuditError;
use crate::trail::{AuditTrail, AuditTrailEntry};

/// Which calculation a record documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculationKind {
    VatReturn,
    CorporateTax,
}

/// The persisted unit: one verified trail for one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub calculation_id: CalculationId,
    pub company_id: CompanyId,
    pub kind: CalculationKind,
    pub period: ReportingPeriod,
    /// Headline figure the trail explains
    pub result: Money,
    pub entries: Vec<AuditTrailEntry>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Verifies the trail against `result` and wraps it for persistence
    ///
    /// # Errors
    ///
    /// Returns the verification failure if the trail is empty, out of order,
    /// or does not end at `result`
    pub fn new(
        company_id: CompanyId,
        kind: CalculationKind,
        period: ReportingPeriod,
        result: Money,
        trail: &AuditTrail,
    ) -> Result<Self, AuditError> {
        trail.verify(&result)?;
        Ok(Self {
            calculation_id: CalculationId::new_v7(),
            company_id,
            kind,
            period,
            result,
            entries: trail.entries().to_vec(),
            recorded_at: Utc::now(),
        })
    }
}

/// Destination for audit records
#[async_trait]
pub trait AuditSink: DomainPort {
    /// Persists one record
    async fn persist(&self, record: &AuditRecord, metadata: Option<OperationMetadata>) -> Result<(), PortError>;
}

/// Hands a record to the sink, logging instead of failing
///
/// Returns true when the record was stored. A sink failure never reaches
/// the caller: the calculation it documents stays valid.
#[instrument(skip_all, fields(calculation = %record.calculation_id, kind = ?record.kind))]
pub async fn record_trail(
    sink: &dyn AuditSink,
    record: &AuditRecord,
    metadata: Option<OperationMetadata>,
) -> bool {
    match sink.persist(record, metadata).await {
        Ok(()) => {
            info!(company = %record.company_id, entries = record.entries.len(), "audit trail recorded");
            true
        }
        Err(error) => {
            warn!(
                company = %record.company_id,
                transient = error.is_transient(),
                %error,
                "failed to persist audit trail"
            );
            false
        }
    }
}

/// Mock implementation of AuditSink for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory audit sink, optionally failing every write
    #[derive(Debug, Default, Clone)]
    pub struct MockAuditSink {
        records: Arc<RwLock<Vec<AuditRecord>>>,
        failure: Option<String>,
    }

    impl MockAuditSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// A sink whose every write fails with a connection error
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                failure: Some(message.into()),
                ..Self::default()
            }
        }

        /// Records stored so far
        pub async fn records(&self) -> Vec<AuditRecord> {
            self.records.read().await.clone()
        }
    }

    impl DomainPort for MockAuditSink {}

    #[async_trait]
    impl AuditSink for MockAuditSink {
        async fn persist(&self, record: &AuditRecord, _metadata: Option<OperationMetadata>) -> Result<(), PortError> {
            if let Some(message) = &self.failure {
                return Err(PortError::connection(
                    "audit store unavailable",
                    std::io::Error::new(std::io::ErrorKind::BrokenPipe, message.clone()),
                ));
            }
            self.records.write().await.push(record.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockAuditSink;
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn period() -> ReportingPeriod {
        ReportingPeriod::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap()
    }

    fn record() -> AuditRecord {
        let trail = AuditTrail::new().step("Net", "1 - 0", Money::aed(dec!(1)), "Art. 67");
        AuditRecord::new(CompanyId::new(), CalculationKind::VatReturn, period(), Money::aed(dec!(1)), &trail).unwrap()
    }

    #[test]
    fn test_record_requires_verified_trail() {
        let trail = AuditTrail::new().step("Net", "1 - 0", Money::aed(dec!(1)), "Art. 67");
        let result = AuditRecord::new(CompanyId::new(), CalculationKind::VatReturn, period(), Money::aed(dec!(2)), &trail);
        assert!(matches!(result, Err(AuditError::ResultMismatch { .. })));
    }

    #[tokio::test]
    async fn test_record_trail_stores() {
        let sink = MockAuditSink::new();
        assert!(record_trail(&sink, &record(), None).await);
        assert_eq!(sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_record_trail_swallows_failure() {
        let sink = MockAuditSink::failing("disk full");
        assert!(!record_trail(&sink, &record(), None).await);
        assert!(sink.records().await.is_empty());
    }
}
