//! Audit trail entries and verification

use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::error::AuditError;

/// One step of a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrailEntry {
    /// Ordinal, starting at 1
    pub step: u32,
    pub description: String,
    /// The formula applied, with the figures substituted
    pub formula: String,
    pub result: Money,
    pub regulatory_reference: String,
}

/// Append-only, ordered list of calculation steps
///
/// Steps are numbered by the trail itself, so entries built through it are
/// always in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail {
    entries: Vec<AuditTrailEntry>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next step
    ///
    /// # Arguments
    ///
    /// * `description` - What the step computes
    /// * `formula` - The formula with its inputs
    /// * `result` - Value the step produced
    /// * `reference` - Statutory provision applied
    pub fn step(
        mut self,
        description: impl Into<String>,
        formula: impl Into<String>,
        result: Money,
        reference: impl Into<String>,
    ) -> Self {
        let step = self.entries.len() as u32 + 1;
        self.entries.push(AuditTrailEntry {
            step,
            description: description.into(),
            formula: formula.into(),
            result,
            regulatory_reference: reference.into(),
        });
        self
    }

    pub fn entries(&self) -> &[AuditTrailEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<AuditTrailEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Result of the last step
    pub fn final_result(&self) -> Option<Money> {
        self.entries.last().map(|e| e.result)
    }

    /// Verifies this trail against the summary figure it explains
    pub fn verify(&self, expected: &Money) -> Result<(), AuditError> {
        verify(&self.entries, expected)
    }
}

/// Verifies an audit trail
///
/// # Errors
///
/// - `AuditError::Empty` if there are no entries
/// - `AuditError::OutOfOrder` if step numbers do not strictly increase
/// - `AuditError::ResultMismatch` if the last result differs from `expected`
pub fn verify(entries: &[AuditTrailEntry], expected: &Money) -> Result<(), AuditError> {
    let last = entries.last().ok_or(AuditError::Empty)?;

    for (position, pair) in entries.windows(2).enumerate() {
        if pair[1].step <= pair[0].step {
            return Err(AuditError::OutOfOrder {
                position: position + 1,
                previous: pair[0].step,
                step: pair[1].step,
            });
        }
    }

    if last.result != *expected {
        return Err(AuditError::ResultMismatch {
            expected: *expected,
            actual: last.result,
        });
    }
    Ok(())
}
