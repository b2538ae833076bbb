//! VAT return computation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{CompanyId, Currency, Money, Rate, ReportingPeriod, TaxConfig, TransactionId};
use domain_audit::{regulation, AuditTrail};
use domain_ledger::{ChartOfAccountEntry, LedgerSnapshot, Transaction, TransactionDetail, VatTreatment};

use crate::compliance::{self, VatCompliance};
use crate::error::VatError;

/// Period-level adjustments to the VAT position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VatAdjustments {
    /// Signed correction of earlier periods' output tax
    pub corrections: Decimal,
    /// Output tax previously paid on debts written off; never negative
    pub bad_debt_relief: Decimal,
}

impl VatAdjustments {
    pub fn new(corrections: Decimal, bad_debt_relief: Decimal) -> Self {
        Self {
            corrections,
            bad_debt_relief,
        }
    }
}

/// Whether a line is a supply (output) or a purchase (input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SupplySide {
    Output,
    Input,
}

/// VAT treatment of one revenue or expense transaction in the period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatLineItem {
    pub transaction_id: TransactionId,
    pub date: NaiveDate,
    pub category: String,
    pub side: SupplySide,
    pub treatment: VatTreatment,
    /// Effective rate; zero for zero-rated, exempt, blocked and out-of-scope lines
    pub rate: Rate,
    /// Net value, negative for credit notes and returns
    pub net_amount: Money,
    /// VAT counted in output or input tax
    pub vat: Money,
    /// Input VAT paid but not recoverable
    pub blocked_vat: Money,
    /// Whether `vat` is claimed as input tax
    pub recoverable: bool,
}

/// Headline figures of a VAT return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatSummary {
    /// Standard-rated supplies (net of VAT)
    pub total_taxable_supplies: Money,
    pub total_zero_rated_supplies: Money,
    pub total_exempt_supplies: Money,
    pub total_out_of_scope_supplies: Money,
    /// Purchases whose input VAT is claimed
    pub total_recoverable_purchases: Money,
    #[serde(rename = "outputVAT")]
    pub output_vat: Money,
    #[serde(rename = "inputVAT")]
    pub input_vat: Money,
    #[serde(rename = "blockedInputVAT")]
    pub blocked_input_vat: Money,
    pub corrections: Money,
    pub bad_debt_relief: Money,
    #[serde(rename = "netVATDue")]
    pub net_vat_due: Money,
    pub refund_due: Money,
}

impl VatSummary {
    /// Supplies counted toward registration thresholds (standard plus zero-rated)
    pub fn taxable_supplies_for_registration(&self) -> Money {
        self.total_taxable_supplies + self.total_zero_rated_supplies
    }

    /// `netVATDue - refundDue`, the signed net position
    pub fn net_position(&self) -> Money {
        self.net_vat_due - self.refund_due
    }
}

/// Complete VAT return for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatResult {
    pub company_id: CompanyId,
    pub period: ReportingPeriod,
    pub summary: VatSummary,
    pub breakdown: Vec<VatLineItem>,
    pub compliance: VatCompliance,
    pub audit_trail: AuditTrail,
}

/// Classifies a transaction for VAT; `None` for balance-sheet transactions
///
/// Line VAT is rounded to the currency's minor unit. A stated VAT amount
/// replaces the computed one on standard-rated lines only.
pub(crate) fn classify(tx: &Transaction, entry: &ChartOfAccountEntry, config: &TaxConfig) -> Option<VatLineItem> {
    let side = match tx.detail {
        TransactionDetail::Revenue(_) => SupplySide::Output,
        TransactionDetail::Expense(_) => SupplySide::Input,
        _ => return None,
    };
    let currency = tx.amount.currency();
    let net_amount = tx.signed_amount();
    let standard_vat = || {
        let gross = tx.stated_vat().unwrap_or_else(|| config.vat_standard_rate.apply(&tx.amount));
        let vat = gross.round_to_currency();
        if net_amount.is_negative() { -vat } else { vat }
    };

    let mut treatment = tx.effective_vat_treatment(entry);
    if side == SupplySide::Input && config.is_non_recoverable(&tx.category) {
        treatment = VatTreatment::Blocked;
    }

    let zero = Money::zero(currency);
    let (rate, vat, blocked_vat, recoverable) = match (side, treatment) {
        // Blocking restricts input recovery only; a blocked revenue account still charges output tax
        (SupplySide::Output, VatTreatment::Standard | VatTreatment::Blocked) => {
            (config.vat_standard_rate, standard_vat(), zero, false)
        }
        (SupplySide::Input, VatTreatment::Standard) => (config.vat_standard_rate, standard_vat(), zero, true),
        (SupplySide::Input, VatTreatment::Blocked) => (Rate::ZERO, zero, standard_vat(), false),
        _ => (Rate::ZERO, zero, zero, false),
    };
    let treatment = if side == SupplySide::Output && treatment == VatTreatment::Blocked {
        VatTreatment::Standard
    } else {
        treatment
    };

    Some(VatLineItem {
        transaction_id: tx.id,
        date: tx.date,
        category: tx.category.clone(),
        side,
        treatment,
        rate,
        net_amount,
        vat,
        blocked_vat,
        recoverable,
    })
}

#[derive(Debug, Clone, Copy)]
struct Totals {
    standard: Decimal,
    zero_rated: Decimal,
    exempt: Decimal,
    out_of_scope: Decimal,
    recoverable_purchases: Decimal,
    output_vat: Decimal,
    input_vat: Decimal,
    blocked_vat: Decimal,
    /// Lines whose VAT came from the record rather than the rate
    stated_output_lines: usize,
    stated_input_lines: usize,
}

impl Totals {
    fn new() -> Self {
        Self {
            standard: Decimal::ZERO,
            zero_rated: Decimal::ZERO,
            exempt: Decimal::ZERO,
            out_of_scope: Decimal::ZERO,
            recoverable_purchases: Decimal::ZERO,
            output_vat: Decimal::ZERO,
            input_vat: Decimal::ZERO,
            blocked_vat: Decimal::ZERO,
            stated_output_lines: 0,
            stated_input_lines: 0,
        }
    }

    fn add(&mut self, line: &VatLineItem, stated: bool) {
        let net = line.net_amount.amount();
        match line.side {
            SupplySide::Output => {
                match line.treatment {
                    VatTreatment::Standard => self.standard += net,
                    VatTreatment::ZeroRated => self.zero_rated += net,
                    VatTreatment::Exempt => self.exempt += net,
                    VatTreatment::NotApplicable | VatTreatment::Blocked => self.out_of_scope += net,
                }
                self.output_vat += line.vat.amount();
                if stated && line.treatment == VatTreatment::Standard {
                    self.stated_output_lines += 1;
                }
            }
            SupplySide::Input => {
                if line.recoverable {
                    self.recoverable_purchases += net;
                    self.input_vat += line.vat.amount();
                    if stated {
                        self.stated_input_lines += 1;
                    }
                }
                self.blocked_vat += line.blocked_vat.amount();
            }
        }
    }
}

/// Computes VAT returns from ledger snapshots
///
/// The engine is a pure function of its configuration, the snapshot and the
/// period: repeated calls produce identical results.
#[derive(Debug, Clone, Default)]
pub struct VatEngine {
    config: TaxConfig,
}

impl VatEngine {
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Computes the VAT return for a period
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Validated ledger
    /// * `period` - VAT tax period
    /// * `adjustments` - Corrections and bad debt relief for the period
    ///
    /// # Errors
    ///
    /// - `VatError::InvalidAdjustment` if bad debt relief is negative
    /// - `VatError::Audit` if the produced trail does not reconcile
    pub fn calculate(
        &self,
        snapshot: &LedgerSnapshot,
        period: &ReportingPeriod,
        adjustments: &VatAdjustments,
    ) -> Result<VatResult, VatError> {
        if adjustments.bad_debt_relief.is_sign_negative() && !adjustments.bad_debt_relief.is_zero() {
            return Err(VatError::InvalidAdjustment(format!(
                "bad debt relief must not be negative, got {}",
                adjustments.bad_debt_relief
            )));
        }

        let currency = snapshot.currency();
        let mut breakdown = Vec::new();
        let mut totals = Totals::new();
        for tx in snapshot.transactions_in(period) {
            let entry = snapshot.account(&tx.category)?;
            if let Some(line) = classify(tx, entry, &self.config) {
                totals.add(&line, tx.stated_vat().is_some());
                breakdown.push(line);
            }
        }

        let summary = self.summarize(currency, &totals, adjustments);
        let audit_trail = self.build_trail(&summary, &totals);
        audit_trail.verify(&summary.net_position())?;

        let compliance = compliance::check(&summary, period, &self.config)?;

        debug!(
            company = %snapshot.company_id(),
            %period,
            lines = breakdown.len(),
            net_vat_due = %summary.net_vat_due,
            refund_due = %summary.refund_due,
            "VAT return computed"
        );

        Ok(VatResult {
            company_id: snapshot.company_id(),
            period: *period,
            summary,
            breakdown,
            compliance,
            audit_trail,
        })
    }

    fn summarize(&self, currency: Currency, totals: &Totals, adjustments: &VatAdjustments) -> VatSummary {
        let money = |amount: Decimal| Money::new(amount, currency);
        let corrections = money(adjustments.corrections).round_to_currency();
        let bad_debt_relief = money(adjustments.bad_debt_relief).round_to_currency();
        let output_vat = money(totals.output_vat);
        let input_vat = money(totals.input_vat);

        let position = output_vat - input_vat + corrections - bad_debt_relief;
        VatSummary {
            total_taxable_supplies: money(totals.standard),
            total_zero_rated_supplies: money(totals.zero_rated),
            total_exempt_supplies: money(totals.exempt),
            total_out_of_scope_supplies: money(totals.out_of_scope),
            total_recoverable_purchases: money(totals.recoverable_purchases),
            output_vat,
            input_vat,
            blocked_input_vat: money(totals.blocked_vat),
            corrections,
            bad_debt_relief,
            net_vat_due: position.non_negative(),
            refund_due: (-position).non_negative(),
        }
    }

    fn build_trail(&self, s: &VatSummary, totals: &Totals) -> AuditTrail {
        let rate = self.config.vat_standard_rate;
        let zero = Money::zero(s.output_vat.currency());
        let adjustment = s.corrections - s.bad_debt_relief;
        let position = s.net_position();

        AuditTrail::new()
            .step(
                "Output VAT on standard-rated supplies",
                rate_formula(&s.total_taxable_supplies, rate, &s.output_vat, totals.stated_output_lines),
                s.output_vat,
                regulation::VAT_STANDARD_RATE,
            )
            .step(
                "Zero-rated and exempt supplies",
                format!(
                    "zero-rated {} x 0% + exempt {} (no VAT) = {}",
                    s.total_zero_rated_supplies, s.total_exempt_supplies, zero
                ),
                zero,
                format!("{}; {}", regulation::VAT_ZERO_RATED_SUPPLIES, regulation::VAT_EXEMPT_SUPPLIES),
            )
            .step(
                "Input VAT claimed on recoverable purchases",
                rate_formula(&s.total_recoverable_purchases, rate, &s.input_vat, totals.stated_input_lines),
                s.input_vat,
                regulation::VAT_INPUT_RECOVERY,
            )
            .step(
                "Blocked input VAT (not recoverable)",
                format!("VAT paid {} excluded from input tax", s.blocked_input_vat),
                s.blocked_input_vat,
                regulation::VAT_BLOCKED_INPUT,
            )
            .step(
                "Adjustments",
                format!("corrections {} - bad debt relief {} = {}", s.corrections, s.bad_debt_relief, adjustment),
                adjustment,
                format!("{}; {}", regulation::VAT_OUTPUT_ADJUSTMENTS, regulation::VAT_BAD_DEBT_RELIEF),
            )
            .step(
                "Net VAT position",
                format!(
                    "{} - {} + {} = {} (net VAT due {}, refund due {})",
                    s.output_vat, s.input_vat, adjustment, position, s.net_vat_due, s.refund_due
                ),
                position,
                regulation::VAT_NET_POSITION,
            )
    }
}

/// `base x rate = vat`, noting lines where a stated amount replaced the rate
fn rate_formula(base: &Money, rate: Rate, vat: &Money, stated_lines: usize) -> String {
    match stated_lines {
        0 => format!("{} x {} = {}", base, rate, vat),
        n => format!("{} x {} = {} (includes {} stated VAT amount(s) in place of the rate)", base, rate, vat, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::{AccountKind, CompanyTaxProfile, LedgerInputs, TransactionRecord};
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn q1() -> ReportingPeriod {
        ReportingPeriod::new(date(1, 1), date(3, 31)).unwrap()
    }

    fn snapshot(records: Vec<TransactionRecord>) -> LedgerSnapshot {
        let inputs = LedgerInputs::new(CompanyId::new(), CompanyTaxProfile::new("Oasis LLC", dec!(1000000)))
            .with_transactions(records);
        LedgerSnapshot::build(inputs, &TaxConfig::default()).unwrap()
    }

    fn calculate(records: Vec<TransactionRecord>, adjustments: VatAdjustments) -> VatResult {
        VatEngine::default().calculate(&snapshot(records), &q1(), &adjustments).unwrap()
    }

    #[test]
    fn test_stated_vat_overrides_computed() {
        let result = calculate(
            vec![TransactionRecord::new(date(1, 5), AccountKind::Revenue, "sales_revenue", dec!(1000))
                .with_vat_amount(dec!(49.99))],
            VatAdjustments::default(),
        );
        assert_eq!(result.summary.output_vat.amount(), dec!(49.99));
    }

    #[test]
    fn test_trail_notes_stated_vat() {
        let stated = calculate(
            vec![
                TransactionRecord::new(date(1, 5), AccountKind::Revenue, "sales_revenue", dec!(1000))
                    .with_vat_amount(dec!(49.99)),
                TransactionRecord::new(date(1, 6), AccountKind::Revenue, "sales_revenue", dec!(200)),
            ],
            VatAdjustments::default(),
        );
        let entries = stated.audit_trail.entries();
        assert!(entries[0].formula.contains("includes 1 stated VAT amount(s)"));
        assert!(entries[0].formula.contains("59.99"));
        assert!(!entries[2].formula.contains("stated"));

        let computed = calculate(
            vec![TransactionRecord::new(date(1, 5), AccountKind::Expense, "rent_expense", dec!(1000))],
            VatAdjustments::default(),
        );
        assert!(!computed.audit_trail.entries()[2].formula.contains("stated"));
    }

    #[test]
    fn test_line_vat_rounded_to_fils() {
        let result = calculate(
            vec![TransactionRecord::new(date(1, 5), AccountKind::Revenue, "sales_revenue", dec!(10.25))],
            VatAdjustments::default(),
        );
        // 10.25 x 5% = 0.5125
        assert_eq!(result.breakdown[0].vat.amount(), dec!(0.51));
    }

    #[test]
    fn test_blocked_purchase_reports_but_does_not_claim() {
        let result = calculate(
            vec![
                TransactionRecord::new(date(1, 5), AccountKind::Expense, "entertainment", dec!(2000)),
                TransactionRecord::new(date(1, 6), AccountKind::Expense, "salaries", dec!(9000)),
            ],
            VatAdjustments::default(),
        );
        assert!(result.summary.input_vat.is_zero());
        assert_eq!(result.summary.blocked_input_vat.amount(), dec!(100));
        assert_eq!(result.breakdown[0].treatment, VatTreatment::Blocked);
        assert_eq!(result.breakdown[1].treatment, VatTreatment::NotApplicable);
    }

    #[test]
    fn test_credit_note_reduces_output() {
        let result = calculate(
            vec![
                TransactionRecord::new(date(1, 5), AccountKind::Revenue, "sales_revenue", dec!(1000)),
                TransactionRecord::new(date(1, 20), AccountKind::Revenue, "sales_revenue", dec!(400)).reversing(),
            ],
            VatAdjustments::default(),
        );
        assert_eq!(result.summary.total_taxable_supplies.amount(), dec!(600));
        assert_eq!(result.summary.output_vat.amount(), dec!(30));
    }

    #[test]
    fn test_refund_position() {
        let result = calculate(
            vec![
                TransactionRecord::new(date(1, 5), AccountKind::Revenue, "export_sales", dec!(50000)),
                TransactionRecord::new(date(1, 6), AccountKind::Expense, "cost_of_goods_sold", dec!(20000)),
            ],
            VatAdjustments::default(),
        );
        assert!(result.summary.net_vat_due.is_zero());
        assert_eq!(result.summary.refund_due.amount(), dec!(1000));
        assert_eq!(result.audit_trail.final_result().map(|m| m.amount()), Some(dec!(-1000)));
    }

    #[test]
    fn test_adjustments_enter_the_position() {
        let result = calculate(
            vec![TransactionRecord::new(date(1, 5), AccountKind::Revenue, "sales_revenue", dec!(10000))],
            VatAdjustments::new(dec!(-100), dec!(150)),
        );
        assert_eq!(result.summary.net_vat_due.amount(), dec!(250));
        assert_eq!(result.audit_trail.len(), 6);
        assert_eq!(result.audit_trail.entries()[4].result.amount(), dec!(-250));
    }

    #[test]
    fn test_negative_bad_debt_relief_rejected() {
        let err = VatEngine::default()
            .calculate(&snapshot(vec![]), &q1(), &VatAdjustments::new(dec!(0), dec!(-1)))
            .unwrap_err();
        assert!(matches!(err, VatError::InvalidAdjustment(_)));
    }

    #[test]
    fn test_transactions_outside_period_ignored() {
        let result = calculate(
            vec![TransactionRecord::new(date(4, 1), AccountKind::Revenue, "sales_revenue", dec!(1000))],
            VatAdjustments::default(),
        );
        assert!(result.breakdown.is_empty());
        assert!(result.summary.output_vat.is_zero());
    }
}
