//! Company tax profile

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::TaxConfig;

/// Basis on which the books are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccountingBasis {
    /// Cash basis, permitted for small enterprises only
    Cash,
    #[default]
    Accrual,
}

/// Tax-relevant facts about the reporting entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTaxProfile {
    #[validate(length(min = 1, max = 200, message = "company name must be 1-200 characters"))]
    pub company_name: String,
    /// Tax Registration Number issued by the Federal Tax Authority
    #[serde(default)]
    #[validate(length(equal = 15, message = "TRN must be 15 digits"))]
    pub trn: Option<String>,
    pub annual_revenue: Decimal,
    #[serde(default)]
    pub is_free_zone: bool,
    #[serde(default, rename = "isQFZP")]
    pub is_qfzp: bool,
    #[serde(default)]
    pub accounting_basis: AccountingBasis,
}

impl CompanyTaxProfile {
    /// Creates a mainland, accrual-basis profile
    pub fn new(company_name: impl Into<String>, annual_revenue: Decimal) -> Self {
        Self {
            company_name: company_name.into(),
            trn: None,
            annual_revenue,
            is_free_zone: false,
            is_qfzp: false,
            accounting_basis: AccountingBasis::Accrual,
        }
    }

    pub fn with_trn(mut self, trn: impl Into<String>) -> Self {
        self.trn = Some(trn.into());
        self
    }

    /// Marks the entity as established in a Free Zone
    pub fn in_free_zone(mut self) -> Self {
        self.is_free_zone = true;
        self
    }

    /// Marks the entity as a Qualifying Free Zone Person (implies Free Zone)
    pub fn qualifying_free_zone_person(mut self) -> Self {
        self.is_free_zone = true;
        self.is_qfzp = true;
        self
    }

    pub fn with_basis(mut self, basis: AccountingBasis) -> Self {
        self.accounting_basis = basis;
        self
    }

    /// True when every QFZP condition holds, including the revenue ceiling
    pub fn qfzp_conditions_met(&self, config: &TaxConfig) -> bool {
        self.is_free_zone && self.is_qfzp && self.annual_revenue <= config.qfzp_revenue_ceiling
    }

    /// Whether cash-basis accounting is permitted at this revenue
    pub fn cash_basis_permitted(&self, config: &TaxConfig) -> bool {
        self.annual_revenue <= config.cash_basis_revenue_ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_qfzp_requires_revenue_under_ceiling() {
        let config = TaxConfig::default();
        let small = CompanyTaxProfile::new("Dune Trading FZE", dec!(2000000)).qualifying_free_zone_person();
        assert!(small.qfzp_conditions_met(&config));

        let large = CompanyTaxProfile::new("Dune Trading FZE", dec!(3000000.01)).qualifying_free_zone_person();
        assert!(!large.qfzp_conditions_met(&config));
    }

    #[test]
    fn test_trn_length_validated() {
        let profile = CompanyTaxProfile::new("Oasis LLC", dec!(0)).with_trn("1234");
        assert!(profile.validate().is_err());

        let profile = CompanyTaxProfile::new("Oasis LLC", dec!(0)).with_trn("100123456700003");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_wire_names() {
        let profile = CompanyTaxProfile::new("Oasis LLC", dec!(10)).qualifying_free_zone_person();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["isQFZP"], true);
        assert_eq!(json["isFreeZone"], true);
        assert_eq!(json["accountingBasis"], "Accrual");
    }
}
