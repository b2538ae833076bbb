//! Corporate tax computation
//!
//! Reliefs are applied in a fixed priority: Qualifying Free Zone Person
//! first, then Small Business Relief, then the standard rate. When both
//! reliefs are available the result says so in `relief_conflict`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Money, Rate, TaxConfig};
use domain_audit::{regulation, AuditTrail};
use domain_ledger::CompanyTaxProfile;

use crate::error::CitError;

/// Taxable income for one tax period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxableIncome {
    /// Taxable income; negative for a tax loss
    pub amount: Money,
    /// Portion of `amount` that is qualifying Free Zone income
    pub qualifying_income: Money,
}

impl TaxableIncome {
    pub fn new(amount: Money, qualifying_income: Money) -> Self {
        Self {
            amount,
            qualifying_income,
        }
    }

    /// Taxable income with no qualifying portion
    pub fn ordinary(amount: Money) -> Self {
        Self::new(amount, Money::zero(amount.currency()))
    }

    /// Checks that qualifying income lies within `[0, max(amount, 0)]`
    pub fn validate(&self) -> Result<(), CitError> {
        if self.amount.currency() != self.qualifying_income.currency() {
            return Err(CitError::InvalidInput(format!(
                "qualifying income currency {} differs from taxable income currency {}",
                self.qualifying_income.currency().code(),
                self.amount.currency().code()
            )));
        }
        if self.qualifying_income.is_negative() {
            return Err(CitError::InvalidInput(format!(
                "qualifying income must not be negative, got {}",
                self.qualifying_income
            )));
        }
        if self.qualifying_income.amount() > self.amount.non_negative().amount() {
            return Err(CitError::InvalidInput(format!(
                "qualifying income {} exceeds taxable income {}",
                self.qualifying_income, self.amount
            )));
        }
        Ok(())
    }
}

/// Outcome of a corporate tax computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitResult {
    pub taxable_income: Money,
    pub qualifying_income: Money,
    /// Rate applied to the taxed portion; zero when nothing is taxed
    pub cit_rate: Rate,
    pub cit_due: Money,
    pub small_business_relief_applied: bool,
    pub free_zone_applied: bool,
    /// Set when more than one relief was available and the priority decided
    pub relief_conflict: Option<String>,
    pub audit_trail: AuditTrail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regime {
    FreeZone,
    SmallBusinessRelief,
    Loss,
    Standard,
}

/// Computes corporate tax from taxable income and the company profile
#[derive(Debug, Clone, Default)]
pub struct CitEngine {
    config: TaxConfig,
}

impl CitEngine {
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Computes the CIT liability
    ///
    /// # Arguments
    ///
    /// * `income` - Taxable income and its qualifying portion
    /// * `profile` - Free Zone and QFZP status of the company
    ///
    /// # Errors
    ///
    /// - `CitError::InvalidInput` if qualifying income is out of range
    /// - `CitError::Audit` if the produced trail does not reconcile
    pub fn calculate(&self, income: &TaxableIncome, profile: &CompanyTaxProfile) -> Result<CitResult, CitError> {
        income.validate()?;

        let threshold = self.config.cit_small_business_threshold;
        let amount = income.amount;
        let qfzp = profile.qfzp_conditions_met(&self.config);
        let within_band = amount.is_positive() && amount.amount() <= threshold;

        let regime = if qfzp {
            Regime::FreeZone
        } else if within_band {
            Regime::SmallBusinessRelief
        } else if !amount.is_positive() {
            Regime::Loss
        } else {
            Regime::Standard
        };

        let relief_conflict = (qfzp && within_band).then(|| {
            format!(
                "both Qualifying Free Zone Person and Small Business Relief conditions are met \
                 (taxable income {} <= {}); Qualifying Free Zone Person treatment applied",
                amount, threshold
            )
        });

        let taxed = match regime {
            Regime::FreeZone => amount.non_negative() - income.qualifying_income,
            Regime::Standard => amount - Money::new(threshold, amount.currency()),
            Regime::SmallBusinessRelief | Regime::Loss => Money::zero(amount.currency()),
        };
        let cit_rate = if taxed.is_positive() { self.config.cit_standard_rate } else { Rate::ZERO };
        let cit_due = cit_rate.apply(&taxed).round_to_currency();

        let audit_trail = self.build_trail(income, regime, taxed, cit_rate, cit_due);
        audit_trail.verify(&cit_due)?;

        debug!(
            taxable_income = %amount,
            ?regime,
            cit_due = %cit_due,
            conflict = relief_conflict.is_some(),
            "CIT computed"
        );

        Ok(CitResult {
            taxable_income: amount,
            qualifying_income: income.qualifying_income,
            cit_rate,
            cit_due,
            small_business_relief_applied: regime == Regime::SmallBusinessRelief,
            free_zone_applied: regime == Regime::FreeZone,
            relief_conflict,
            audit_trail,
        })
    }

    fn build_trail(&self, income: &TaxableIncome, regime: Regime, taxed: Money, rate: Rate, cit_due: Money) -> AuditTrail {
        let amount = income.amount;
        let threshold = Money::new(self.config.cit_small_business_threshold, amount.currency());

        let (relief, relieved, reference) = match regime {
            Regime::FreeZone => (
                format!("Qualifying income {} taxed at 0%; non-qualifying income {} at the standard rate", income.qualifying_income, taxed),
                income.qualifying_income,
                regulation::CIT_QUALIFYING_FREE_ZONE_PERSON,
            ),
            Regime::SmallBusinessRelief => (
                format!("Taxable income {} does not exceed {}: Small Business Relief", amount, threshold),
                amount,
                regulation::CIT_SMALL_BUSINESS_RELIEF,
            ),
            Regime::Loss => (
                format!("Tax loss of {}: no corporate tax", amount),
                Money::zero(amount.currency()),
                regulation::CIT_TAXABLE_INCOME,
            ),
            Regime::Standard => (
                format!("First {} taxed at 0%", threshold),
                threshold,
                regulation::CIT_ZERO_RATE_BAND,
            ),
        };

        let formula = match regime {
            Regime::Standard => format!("({} - {}) x {} = {}", amount, threshold, rate, cit_due),
            _ => format!("{} x {} = {}", taxed, rate, cit_due),
        };

        AuditTrail::new()
            .step(
                "Taxable income",
                format!("taxable income {} (qualifying {})", amount, income.qualifying_income),
                amount,
                regulation::CIT_TAXABLE_INCOME,
            )
            .step("Relief determination", relief, relieved, reference)
            .step("Corporate tax due", formula, cit_due, regulation::CIT_RATES)
    }
}
