//! Audit sink appending JSON lines to a file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use core_kernel::{DomainPort, OperationMetadata, PortError};
use domain_audit::{AuditRecord, AuditSink};

/// Appends each audit record as one line of JSON
///
/// Writes are serialized through a mutex so concurrent reports never
/// interleave partial lines.
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DomainPort for JsonlAuditSink {}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn persist(&self, record: &AuditRecord, metadata: Option<OperationMetadata>) -> Result<(), PortError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| PortError::transformation(format!("failed to encode audit record: {}", e)))?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| PortError::connection(format!("failed to open {}", self.path.display()), e))?;
        file.write_all(&line)
            .await
            .map_err(|e| PortError::connection(format!("failed to write {}", self.path.display()), e))?;
        file.flush()
            .await
            .map_err(|e| PortError::connection(format!("failed to flush {}", self.path.display()), e))?;

        debug!(
            calculation_id = %record.calculation_id,
            correlation_id = metadata.as_ref().and_then(|m| m.correlation_id.as_deref()),
            "audit record appended"
        );
        Ok(())
    }
}
