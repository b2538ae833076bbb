//! Ledger port
//!
//! Where a company's books come from (a JSON document, a database, an
//! accounting package API) is an adapter concern. The engines only ever see
//! the [`LedgerInputs`] a port returns.

use async_trait::async_trait;

use core_kernel::{CompanyId, DomainPort, OperationMetadata, PortError};
use crate::record::LedgerInputs;

/// Source of ledger documents
#[async_trait]
pub trait LedgerPort: DomainPort {
    /// Loads the raw ledger of a company
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` when no ledger exists for the company
    async fn load_ledger(
        &self,
        company: CompanyId,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerInputs, PortError>;
}

/// Mock implementation of LedgerPort for testing
///
/// This adapter keeps ledgers in memory and is useful for unit testing
/// without any file or database dependency.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of LedgerPort
    #[derive(Debug, Default, Clone)]
    pub struct MockLedgerPort {
        ledgers: Arc<RwLock<HashMap<CompanyId, LedgerInputs>>>,
    }

    impl MockLedgerPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with ledgers for testing
        pub async fn with_ledgers(ledgers: Vec<LedgerInputs>) -> Self {
            let port = Self::new();
            for ledger in ledgers {
                port.insert(ledger).await;
            }
            port
        }

        /// Stores or replaces a company's ledger
        pub async fn insert(&self, ledger: LedgerInputs) {
            self.ledgers.write().await.insert(ledger.company_id, ledger);
        }
    }

    impl DomainPort for MockLedgerPort {}

    #[async_trait]
    impl LedgerPort for MockLedgerPort {
        async fn load_ledger(
            &self,
            company: CompanyId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<LedgerInputs, PortError> {
            self.ledgers
                .read()
                .await
                .get(&company)
                .cloned()
                .ok_or_else(|| PortError::not_found("Ledger", company))
        }
    }
}
