//! Financial Statements
//!
//! Generates the income statement, balance sheet and indirect cash flow
//! statement from one ledger snapshot, plus explanatory notes.
//!
//! The three statements are reconciled before they are returned:
//!
//! - Total assets equal total liabilities and equity
//! - Closing cash on the cash flow statement equals balance sheet cash
//! - Net income on the income statement is the current-year earnings on the
//!   balance sheet and the starting point of operating cash flow
//!
//! A failed check is a [`ReconciliationError`], never a silently adjusted figure.

pub mod section;
pub mod income_statement;
pub mod balance_sheet;
pub mod cash_flow;
pub mod notes;
pub mod generator;
pub mod error;

pub use section::StatementSection;
pub use income_statement::IncomeStatement;
pub use balance_sheet::{Assets, BalanceSheet, Equity, Liabilities};
pub use cash_flow::{CashFlowStatement, OperatingActivities};
pub use notes::StatementNote;
pub use generator::{FinancialStatementGenerator, FinancialStatements};
pub use error::{ReconciliationError, StatementError};
