//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! tax engine test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built configuration, periods and company profiles
//! - `builders`: Ledger builder with sensible defaults
//! - `assertions`: Custom assertion helpers for money, trails and statements
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
