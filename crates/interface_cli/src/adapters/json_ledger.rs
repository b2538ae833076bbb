//! Ledger port backed by a JSON document on disk
//!
//! The document is the camelCase serialization of [`LedgerInputs`]: company
//! id, profile, optional chart, opening balances and transactions. It is
//! re-read on every load so edits between runs are picked up.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{CompanyId, DomainPort, OperationMetadata, PortError};
use domain_ledger::{LedgerInputs, LedgerPort};

/// Reads one company's ledger from a JSON file
#[derive(Debug, Clone)]
pub struct JsonLedgerSource {
    path: PathBuf,
}

impl JsonLedgerSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the whole document
    ///
    /// # Errors
    ///
    /// - `PortError::NotFound` if the file does not exist
    /// - `PortError::Connection` if it cannot be read
    /// - `PortError::Transformation` if it is not a valid ledger document
    pub async fn read_document(&self) -> Result<LedgerInputs, PortError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PortError::not_found("Ledger document", self.path.display())
            } else {
                PortError::connection(format!("failed to read {}", self.path.display()), e)
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            PortError::transformation(format!("invalid ledger document {}: {}", self.path.display(), e))
        })
    }
}

impl DomainPort for JsonLedgerSource {}

#[async_trait]
impl LedgerPort for JsonLedgerSource {
    #[instrument(skip(self, _metadata), fields(path = %self.path.display()))]
    async fn load_ledger(
        &self,
        company: CompanyId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<LedgerInputs, PortError> {
        let inputs = self.read_document().await?;
        if inputs.company_id != company {
            return Err(PortError::not_found("Ledger", company));
        }

        debug!(
            transactions = inputs.transactions.len(),
            opening_balances = inputs.opening_balances.len(),
            "ledger document loaded"
        );
        Ok(inputs)
    }
}
