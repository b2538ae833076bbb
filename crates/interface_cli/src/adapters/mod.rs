//! File adapters for the ledger and audit ports

pub mod json_ledger;
pub mod jsonl_audit;

pub use json_ledger::JsonLedgerSource;
pub use jsonl_audit::JsonlAuditSink;
