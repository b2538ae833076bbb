//! Ledger Model - the validated input every tax engine reads
//!
//! A company's books arrive as loosely-typed records: transactions, opening
//! balances, a chart of accounts and a tax profile. This crate validates them
//! once, at the boundary, into an immutable [`LedgerSnapshot`].
//!
//! # Double-Entry Expansion
//!
//! Each transaction names one account (its `category`) and, optionally, the
//! balance-sheet account on the other side (its contra account, defaulting to
//! cash). It therefore expands into exactly two balanced legs:
//! - Debits increase asset/expense accounts
//! - Credits increase liability/equity/revenue accounts
//! - The legs of every transaction sum to zero
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{LedgerInputs, LedgerSnapshot};
//!
//! let inputs: LedgerInputs = serde_json::from_str(&document)?;
//! let snapshot = LedgerSnapshot::build(inputs, &TaxConfig::default())?;
//!
//! for tx in snapshot.transactions_in(&period) {
//!     // ...
//! }
//! ```

pub mod account;
pub mod transaction;
pub mod record;
pub mod profile;
pub mod validation;
pub mod snapshot;
pub mod aggregate;
pub mod ports;
pub mod error;

pub use account::{
    AccountKind, CashFlowClass, ChartOfAccountEntry, ChartOfAccounts, ReportingLine, VatTreatment,
};
pub use transaction::{
    EntryDirection, Leg, PurchaseDetail, SupplyDetail, Transaction, TransactionDetail,
};
pub use record::{LedgerInputs, OpeningBalance, TransactionRecord, MAX_RECORD_AMOUNT};
pub use profile::{AccountingBasis, CompanyTaxProfile};
pub use validation::{LedgerValidator, ValidationIssue, ValidationReport};
pub use snapshot::LedgerSnapshot;
pub use aggregate::{AccountBalances, AccountLine};
pub use ports::LedgerPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockLedgerPort;
pub use error::LedgerError;
