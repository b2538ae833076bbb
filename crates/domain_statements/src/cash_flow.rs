//! Cash flow statement (indirect method)
//!
//! Starts from net income and adjusts for the change in every non-cash
//! balance-sheet account between the day before the period and its last
//! day. An increase in an asset uses cash; an increase in a liability or
//! equity account provides it. Because every transaction is balanced, the
//! adjustments always close to the movement on the cash line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, ReportingPeriod, TemporalError};
use domain_ledger::{AccountBalances, AccountLine, CashFlowClass, ChartOfAccounts, LedgerSnapshot, ReportingLine};

use crate::error::{ReconciliationError, StatementError};
use crate::section::StatementSection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingActivities {
    pub net_income: Money,
    /// Non-cash charges added back
    pub depreciation: Money,
    pub changes_in_receivables: Money,
    pub changes_in_inventory: Money,
    pub changes_in_payables: Money,
    /// Other current assets, other current liabilities and tax balances
    pub other_working_capital: Money,
    pub net_cash_from_operating: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    pub period: ReportingPeriod,
    pub operating_activities: OperatingActivities,
    pub investing_activities: StatementSection,
    pub financing_activities: StatementSection,
    pub net_cash_flow: Money,
    pub opening_cash: Money,
    pub closing_cash: Money,
}

struct Movements<'a> {
    chart: &'a ChartOfAccounts,
    opening: AccountBalances,
    closing: AccountBalances,
    currency: Currency,
}

impl Movements<'_> {
    /// Cash effect of each account on the given lines, skipping accounts that did not move
    fn cash_effects(&self, accept: impl Fn(ReportingLine) -> bool) -> Vec<AccountLine> {
        self.chart
            .iter()
            .filter(|entry| accept(entry.line))
            .filter_map(|entry| {
                let change = self.closing.debit_balance(&entry.code) - self.opening.debit_balance(&entry.code);
                (!change.is_zero()).then(|| AccountLine {
                    code: entry.code.clone(),
                    name: entry.name.clone(),
                    amount: -change,
                })
            })
            .collect()
    }

    fn cash_effect(&self, accept: impl Fn(ReportingLine) -> bool) -> Money {
        let total: Decimal = self.cash_effects(accept).iter().map(|l| l.amount.amount()).sum();
        Money::new(total, self.currency)
    }

    fn class(&self, class: CashFlowClass) -> StatementSection {
        StatementSection::from_lines(self.currency, self.cash_effects(|line| line.cash_flow_class() == Some(class)))
    }
}

impl CashFlowStatement {
    /// Builds the cash flow statement for a period
    ///
    /// # Errors
    ///
    /// - `StatementError::Temporal` if the period starts on the first representable date
    /// - `StatementError::Reconciliation` if closing cash differs from the
    ///   cash balance at the end of the period
    pub fn generate(snapshot: &LedgerSnapshot, period: &ReportingPeriod) -> Result<Self, StatementError> {
        let chart = snapshot.chart();
        let before = period
            .day_before_start()
            .ok_or_else(|| TemporalError::OutOfRange(format!("day before {}", period.start)))?;
        let movements = Movements {
            chart,
            opening: AccountBalances::as_of(snapshot, before),
            closing: AccountBalances::as_of(snapshot, period.end),
            currency: snapshot.currency(),
        };

        let net_income = AccountBalances::movements(snapshot, period).net_income(chart);
        let depreciation = movements.cash_effect(|line| line.cash_flow_class() == Some(CashFlowClass::NonCash));
        let changes_in_receivables = movements.cash_effect(|line| line == ReportingLine::Receivables);
        let changes_in_inventory = movements.cash_effect(|line| line == ReportingLine::Inventory);
        let changes_in_payables = movements.cash_effect(|line| line == ReportingLine::Payables);
        let other_working_capital = movements.cash_effect(|line| {
            matches!(
                line,
                ReportingLine::OtherCurrentAssets | ReportingLine::TaxLiabilities | ReportingLine::OtherCurrentLiabilities
            )
        });
        let net_cash_from_operating = net_income
            + depreciation
            + changes_in_receivables
            + changes_in_inventory
            + changes_in_payables
            + other_working_capital;

        let investing_activities = movements.class(CashFlowClass::Investing);
        let financing_activities = movements.class(CashFlowClass::Financing);
        let net_cash_flow = net_cash_from_operating + investing_activities.total + financing_activities.total;

        let opening_cash = movements.opening.line_total(chart, ReportingLine::Cash);
        let closing_cash = opening_cash + net_cash_flow;
        let balance_sheet_cash = movements.closing.line_total(chart, ReportingLine::Cash);
        if !(closing_cash - balance_sheet_cash).round_to_currency().is_zero() {
            return Err(ReconciliationError::CashMismatch {
                as_of: period.end,
                closing_cash,
                balance_sheet_cash,
            }
            .into());
        }

        Ok(Self {
            period: *period,
            operating_activities: OperatingActivities {
                net_income,
                depreciation,
                changes_in_receivables,
                changes_in_inventory,
                changes_in_payables,
                other_working_capital,
                net_cash_from_operating,
            },
            investing_activities,
            financing_activities,
            net_cash_flow,
            opening_cash,
            closing_cash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::{CompanyId, TaxConfig};
    use domain_ledger::{AccountKind, CompanyTaxProfile, LedgerInputs, OpeningBalance, TransactionRecord};
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_indirect_adjustments() {
        let inputs = LedgerInputs::new(CompanyId::new(), CompanyTaxProfile::new("Oasis LLC", dec!(500000)))
            .with_opening_balance(OpeningBalance::new("cash", AccountKind::Asset, dec!(40000)))
            .with_opening_balance(OpeningBalance::new("share_capital", AccountKind::Equity, dec!(40000)))
            .with_transactions(vec![
                TransactionRecord::new(date(1, 10), AccountKind::Revenue, "sales_revenue", dec!(60000)),
                TransactionRecord::new(date(1, 11), AccountKind::Revenue, "service_revenue", dec!(15000))
                    .against("accounts_receivable"),
                TransactionRecord::new(date(1, 12), AccountKind::Expense, "utilities", dec!(5000))
                    .against("accounts_payable"),
                TransactionRecord::new(date(1, 13), AccountKind::Expense, "depreciation", dec!(2000))
                    .against("accumulated_depreciation"),
                TransactionRecord::new(date(1, 14), AccountKind::Asset, "equipment", dec!(24000)),
                TransactionRecord::new(date(1, 15), AccountKind::Liability, "loans", dec!(10000)),
            ]);
        let snapshot = LedgerSnapshot::build(inputs, &TaxConfig::default()).unwrap();

        let cash_flow = CashFlowStatement::generate(&snapshot, &ReportingPeriod::calendar_year(2024).unwrap()).unwrap();
        let operating = &cash_flow.operating_activities;

        assert_eq!(operating.net_income.amount(), dec!(68000));
        assert_eq!(operating.depreciation.amount(), dec!(2000));
        assert_eq!(operating.changes_in_receivables.amount(), dec!(-15000));
        assert_eq!(operating.changes_in_payables.amount(), dec!(5000));
        assert_eq!(operating.net_cash_from_operating.amount(), dec!(60000));
        assert_eq!(cash_flow.investing_activities.total.amount(), dec!(-24000));
        assert_eq!(cash_flow.financing_activities.total.amount(), dec!(10000));
        assert_eq!(cash_flow.opening_cash.amount(), dec!(40000));
        assert_eq!(cash_flow.closing_cash.amount(), dec!(86000));
    }
}
