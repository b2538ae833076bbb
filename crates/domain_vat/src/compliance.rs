//! Advisory compliance checks on a VAT return
//!
//! Nothing here changes the return figures. Registration thresholds and
//! anomalies are reported as data for the filer to act on.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{config::DAYS_PER_YEAR, Money, ReportingPeriod, TaxConfig};
use domain_audit::regulation;

use crate::engine::VatSummary;
use crate::error::VatError;
use crate::registration::{RegistrationStatus, assess};

/// Kinds of compliance findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningCode {
    /// Annualized taxable supplies exceed the mandatory threshold
    MandatoryRegistration,
    /// Annualized taxable supplies exceed the voluntary threshold
    VoluntaryRegistrationAvailable,
    /// Input VAT is out of proportion to output VAT
    InputVatAnomaly,
    /// Exempt supplies exceed taxable supplies
    ExemptSuppliesAnomaly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceWarning {
    pub code: WarningCode,
    pub message: String,
    pub regulatory_reference: Option<String>,
}

/// Compliance view of a VAT return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatCompliance {
    /// Standard-rated plus zero-rated supplies scaled to a 365-day year
    pub annualized_taxable_supplies: Money,
    pub registration_status: RegistrationStatus,
    pub requires_registration: bool,
    pub voluntary_registration_eligible: bool,
    /// Return and payment due date for the period
    pub filing_due: NaiveDate,
    pub warnings: Vec<ComplianceWarning>,
}

/// Scales a period total to a full year: `total x 365 / days`
pub fn annualize(total: Money, period: &ReportingPeriod) -> Money {
    let days = Decimal::from(period.days().max(1));
    Money::new(total.amount() * Decimal::from(DAYS_PER_YEAR) / days, total.currency()).round_to_currency()
}

/// Runs the compliance checks for a computed return
pub fn check(summary: &VatSummary, period: &ReportingPeriod, config: &TaxConfig) -> Result<VatCompliance, VatError> {
    let taxable = summary.taxable_supplies_for_registration();
    let annualized = annualize(taxable, period);
    let status = assess(annualized.amount(), config);
    let mut warnings = Vec::new();

    match status {
        RegistrationStatus::Mandatory => warnings.push(ComplianceWarning {
            code: WarningCode::MandatoryRegistration,
            message: format!(
                "annualized taxable supplies {} exceed the mandatory registration threshold of {}",
                annualized, config.vat_mandatory_registration_threshold
            ),
            regulatory_reference: Some(regulation::VAT_MANDATORY_REGISTRATION.to_string()),
        }),
        RegistrationStatus::Voluntary => warnings.push(ComplianceWarning {
            code: WarningCode::VoluntaryRegistrationAvailable,
            message: format!(
                "annualized taxable supplies {} exceed the voluntary registration threshold of {}",
                annualized, config.vat_voluntary_registration_threshold
            ),
            regulatory_reference: Some(regulation::VAT_VOLUNTARY_REGISTRATION.to_string()),
        }),
        RegistrationStatus::NotRequired => {}
    }

    let input_ceiling = summary.output_vat.amount() * config.input_vat_anomaly_ratio;
    if summary.input_vat.is_positive() && summary.input_vat.amount() > input_ceiling {
        warnings.push(ComplianceWarning {
            code: WarningCode::InputVatAnomaly,
            message: format!(
                "input VAT {} exceeds {} times output VAT {}",
                summary.input_vat, config.input_vat_anomaly_ratio, summary.output_vat
            ),
            regulatory_reference: None,
        });
    }

    if summary.total_exempt_supplies.amount() > taxable.amount() {
        warnings.push(ComplianceWarning {
            code: WarningCode::ExemptSuppliesAnomaly,
            message: format!(
                "exempt supplies {} exceed taxable supplies {}",
                summary.total_exempt_supplies, taxable
            ),
            regulatory_reference: Some(regulation::VAT_EXEMPT_SUPPLIES.to_string()),
        });
    }

    Ok(VatCompliance {
        annualized_taxable_supplies: annualized,
        registration_status: status,
        requires_registration: status == RegistrationStatus::Mandatory,
        voluntary_registration_eligible: status == RegistrationStatus::Voluntary,
        filing_due: config.vat_return_due(period.end)?,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quarter() -> ReportingPeriod {
        ReportingPeriod::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
        )
        .unwrap()
    }

    fn summary(taxable: Decimal, exempt: Decimal, output: Decimal, input: Decimal) -> VatSummary {
        let m = Money::aed;
        VatSummary {
            total_taxable_supplies: m(taxable),
            total_zero_rated_supplies: m(dec!(0)),
            total_exempt_supplies: m(exempt),
            total_out_of_scope_supplies: m(dec!(0)),
            total_recoverable_purchases: m(input * dec!(20)),
            output_vat: m(output),
            input_vat: m(input),
            blocked_input_vat: m(dec!(0)),
            corrections: m(dec!(0)),
            bad_debt_relief: m(dec!(0)),
            net_vat_due: m(dec!(0)),
            refund_due: m(dec!(0)),
        }
    }

    #[test]
    fn test_annualize_quarter() {
        // 90 days in Q1 2023
        let annual = annualize(Money::aed(dec!(90000)), &quarter());
        assert_eq!(annual.amount(), dec!(365000));
    }

    #[test]
    fn test_quarter_over_mandatory_threshold() {
        let compliance = check(&summary(dec!(100000), dec!(0), dec!(5000), dec!(0)), &quarter(), &TaxConfig::default())
            .unwrap();
        assert!(compliance.requires_registration);
        assert_eq!(compliance.warnings[0].code, WarningCode::MandatoryRegistration);
        assert_eq!(compliance.filing_due, NaiveDate::from_ymd_opt(2023, 4, 28).unwrap());
    }

    #[test]
    fn test_anomalies() {
        let compliance = check(&summary(dec!(1000), dec!(5000), dec!(50), dec!(500)), &quarter(), &TaxConfig::default())
            .unwrap();
        let codes: Vec<_> = compliance.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![WarningCode::InputVatAnomaly, WarningCode::ExemptSuppliesAnomaly]);
        assert_eq!(compliance.registration_status, RegistrationStatus::NotRequired);
    }
}
