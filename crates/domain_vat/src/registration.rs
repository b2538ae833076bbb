//! VAT registration thresholds over a rolling twelve-month window
//!
//! Registration is assessed on taxable supplies (standard-rated plus
//! zero-rated) made in the twelve months ending on a given date. The window
//! is recomputed from the snapshot on demand rather than maintained
//! incrementally.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, ReportingPeriod, TaxConfig};
use domain_ledger::{AccountKind, LedgerSnapshot, VatTreatment};

use crate::error::VatError;

/// Outcome of a registration threshold test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationStatus {
    /// Above the mandatory threshold: must register
    Mandatory,
    /// Above the voluntary threshold only: may register
    Voluntary,
    NotRequired,
}

/// Registration status over a twelve-month window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAssessment {
    pub window: ReportingPeriod,
    pub taxable_supplies: Money,
    pub status: RegistrationStatus,
    pub mandatory_threshold: Decimal,
    pub voluntary_threshold: Decimal,
}

/// Classifies a twelve-month taxable supplies figure against the thresholds
///
/// Both thresholds are exclusive: supplies must exceed them.
pub fn assess(taxable_supplies: Decimal, config: &TaxConfig) -> RegistrationStatus {
    if taxable_supplies > config.vat_mandatory_registration_threshold {
        RegistrationStatus::Mandatory
    } else if taxable_supplies > config.vat_voluntary_registration_threshold {
        RegistrationStatus::Voluntary
    } else {
        RegistrationStatus::NotRequired
    }
}

/// Taxable supplies in the twelve months ending on `as_of`
pub fn rolling_taxable_supplies(snapshot: &LedgerSnapshot, as_of: NaiveDate) -> Result<Money, VatError> {
    rolling_total(snapshot, &ReportingPeriod::trailing_twelve_months(as_of)?)
}

fn rolling_total(snapshot: &LedgerSnapshot, window: &ReportingPeriod) -> Result<Money, VatError> {
    let mut total = Decimal::ZERO;
    for tx in snapshot.transactions_in(window) {
        if tx.kind() != AccountKind::Revenue {
            continue;
        }
        let entry = snapshot.account(&tx.category)?;
        if matches!(
            tx.effective_vat_treatment(entry),
            VatTreatment::Standard | VatTreatment::ZeroRated | VatTreatment::Blocked
        ) {
            total += tx.signed_amount().amount();
        }
    }
    Ok(Money::new(total, snapshot.currency()))
}

/// Registration assessment for the twelve months ending on `as_of`
pub fn assess_registration(
    snapshot: &LedgerSnapshot,
    as_of: NaiveDate,
    config: &TaxConfig,
) -> Result<RegistrationAssessment, VatError> {
    let window = ReportingPeriod::trailing_twelve_months(as_of)?;
    let taxable_supplies = rolling_total(snapshot, &window)?;
    Ok(RegistrationAssessment {
        window,
        taxable_supplies,
        status: assess(taxable_supplies.amount(), config),
        mandatory_threshold: config.vat_mandatory_registration_threshold,
        voluntary_threshold: config.vat_voluntary_registration_threshold,
    })
}
