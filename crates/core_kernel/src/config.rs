//! Statutory tax configuration
//!
//! `TaxConfig` is the single source of truth for every rate, threshold and
//! filing window used by the VAT engine, the CIT engine and the filing
//! deadline functions. Defaults are the UAE
//! statutory values; any field can be overridden from `TAX_*` environment
//! variables.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::money::Rate;
use crate::temporal::{deadline_after_days, deadline_after_months, TemporalError};

/// Days used to annualize period totals
pub const DAYS_PER_YEAR: i64 = 365;

/// Rates, thresholds and filing windows shared by all tax consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Standard VAT rate (Federal Decree-Law No. 8 of 2017)
    pub vat_standard_rate: Rate,
    /// Annual taxable supplies above which VAT registration is mandatory
    pub vat_mandatory_registration_threshold: Decimal,
    /// Annual taxable supplies above which voluntary registration is allowed
    pub vat_voluntary_registration_threshold: Decimal,
    /// Days after the end of a tax period by which the VAT return is due
    pub vat_filing_window_days: u32,
    /// Input VAT above this multiple of output VAT raises an anomaly warning
    pub input_vat_anomaly_ratio: Decimal,
    /// Expense categories whose input VAT is never recoverable
    pub non_recoverable_input_categories: BTreeSet<String>,
    /// Standard corporate tax rate above the relief band
    pub cit_standard_rate: Rate,
    /// Taxable income at or below which no corporate tax is due
    pub cit_small_business_threshold: Decimal,
    /// Revenue ceiling for Qualifying Free Zone Person treatment
    pub qfzp_revenue_ceiling: Decimal,
    /// Revenue ceiling for cash-basis accounting
    pub cash_basis_revenue_ceiling: Decimal,
    /// Months after the financial-year end by which the CIT return is due
    pub cit_filing_window_months: u32,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            vat_standard_rate: Rate::new(dec!(0.05)),
            vat_mandatory_registration_threshold: dec!(375000),
            vat_voluntary_registration_threshold: dec!(187500),
            vat_filing_window_days: 28,
            input_vat_anomaly_ratio: dec!(2),
            non_recoverable_input_categories: ["entertainment", "personal_expenses", "exempt_supply_costs"]
                .into_iter()
                .map(String::from)
                .collect(),
            cit_standard_rate: Rate::new(dec!(0.09)),
            cit_small_business_threshold: dec!(375000),
            qfzp_revenue_ceiling: dec!(3000000),
            cash_basis_revenue_ceiling: dec!(3000000),
            cit_filing_window_months: 9,
        }
    }
}

impl TaxConfig {
    /// Loads configuration from `TAX_*` environment variables over the
    /// statutory defaults, then validates it
    pub fn from_env() -> Result<Self, CoreError> {
        let loaded: TaxConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("TAX").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CoreError::configuration(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks internal consistency of the configured values
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, rate) in [
            ("vat_standard_rate", self.vat_standard_rate),
            ("cit_standard_rate", self.cit_standard_rate),
        ] {
            if rate.as_decimal() < Decimal::ZERO || rate.as_decimal() > Decimal::ONE {
                return Err(CoreError::configuration(format!("{} must be between 0 and 1, got {}", name, rate)));
            }
        }
        if self.vat_voluntary_registration_threshold > self.vat_mandatory_registration_threshold {
            return Err(CoreError::configuration(
                "voluntary registration threshold exceeds the mandatory threshold",
            ));
        }
        if self.cit_small_business_threshold < Decimal::ZERO || self.qfzp_revenue_ceiling < Decimal::ZERO {
            return Err(CoreError::configuration("CIT thresholds must be non-negative"));
        }
        Ok(())
    }

    /// Returns true when input VAT on this expense category is blocked by policy
    pub fn is_non_recoverable(&self, category: &str) -> bool {
        self.non_recoverable_input_categories.contains(category)
    }

    /// VAT return and payment due date for a tax period ending on `period_end`
    pub fn vat_return_due(&self, period_end: NaiveDate) -> Result<NaiveDate, TemporalError> {
        deadline_after_days(period_end, self.vat_filing_window_days)
    }

    /// Corporate tax return due date for a financial year ending on `year_end`
    pub fn cit_return_due(&self, year_end: NaiveDate) -> Result<NaiveDate, TemporalError> {
        deadline_after_months(year_end, self.cit_filing_window_months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_uae_statutory_values() {
        let config = TaxConfig::default();
        assert_eq!(config.vat_standard_rate.as_percentage(), dec!(5));
        assert_eq!(config.cit_standard_rate.as_percentage(), dec!(9));
        assert_eq!(config.vat_mandatory_registration_threshold, dec!(375000));
        assert_eq!(config.vat_voluntary_registration_threshold, dec!(187500));
        assert_eq!(config.qfzp_revenue_ceiling, dec!(3000000));
        assert_eq!(config.vat_filing_window_days, 28);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_recoverable_categories() {
        let config = TaxConfig::default();
        assert!(config.is_non_recoverable("entertainment"));
        assert!(config.is_non_recoverable("personal_expenses"));
        assert!(config.is_non_recoverable("exempt_supply_costs"));
        assert!(!config.is_non_recoverable("rent"));
    }

    #[test]
    fn test_inverted_registration_thresholds_rejected() {
        let config = TaxConfig {
            vat_voluntary_registration_threshold: dec!(400000),
            ..TaxConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_deadlines_use_configured_windows() {
        let config = TaxConfig::default();
        let q1_end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(config.vat_return_due(q1_end).unwrap(), NaiveDate::from_ymd_opt(2024, 4, 28).unwrap());

        let year_end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(config.cit_return_due(year_end).unwrap(), NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
    }

    #[test]
    fn test_config_round_trips_through_json_with_partial_override() {
        let config: TaxConfig = serde_json::from_str(r#"{"vat_filing_window_days": 30}"#).unwrap();
        assert_eq!(config.vat_filing_window_days, 30);
        assert_eq!(config.cit_standard_rate, TaxConfig::default().cit_standard_rate);
    }
}
