//! Balance sheet
//!
//! Closing balances are opening balances plus every transaction dated on or
//! before the reporting date. Income statement accounts are not shown
//! individually: their cumulative result is split into current-year earnings
//! and earnings of prior periods, which roll into retained earnings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, ReportingPeriod};
use domain_ledger::{AccountBalances, LedgerSnapshot, ReportingLine};

use crate::error::{ReconciliationError, StatementError};
use crate::section::StatementSection;

/// Code of the synthetic retained earnings line holding prior results
pub const PRIOR_PERIOD_EARNINGS: &str = "prior_period_earnings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    pub cash: StatementSection,
    pub receivables: StatementSection,
    pub inventory: StatementSection,
    pub other_current_assets: StatementSection,
    pub total_current_assets: Money,
    /// Net of accumulated depreciation
    pub property_and_equipment: StatementSection,
    pub other_non_current_assets: StatementSection,
    pub total_non_current_assets: Money,
    pub total_assets: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liabilities {
    pub payables: StatementSection,
    pub tax_liabilities: StatementSection,
    pub other_current_liabilities: StatementSection,
    pub total_current_liabilities: Money,
    pub borrowings: StatementSection,
    pub total_liabilities: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equity {
    pub share_capital: StatementSection,
    pub retained_earnings: StatementSection,
    pub current_year_earnings: Money,
    pub total_equity: Money,
}

/// Financial position at a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub as_of: NaiveDate,
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub equity: Equity,
    pub total_liabilities_and_equity: Money,
}

impl BalanceSheet {
    /// Builds the balance sheet as of a date
    ///
    /// Net income from `earnings_from` to `as_of` is reported as current-year
    /// earnings; everything earlier is part of retained earnings.
    ///
    /// # Errors
    ///
    /// - `StatementError::Temporal` if `earnings_from` is after `as_of`
    /// - `StatementError::Reconciliation` if the opening balances or the
    ///   resulting balance sheet do not balance
    pub fn generate(snapshot: &LedgerSnapshot, as_of: NaiveDate, earnings_from: NaiveDate) -> Result<Self, StatementError> {
        check_opening_balances(snapshot)?;

        let chart = snapshot.chart();
        let closing = AccountBalances::as_of(snapshot, as_of);
        let section = |lines: &[ReportingLine]| StatementSection::of(&closing, chart, lines);

        let current_year_earnings =
            AccountBalances::movements(snapshot, &ReportingPeriod::new(earnings_from, as_of)?).net_income(chart);
        let prior_earnings = closing.net_income(chart) - current_year_earnings;

        let cash = section(&[ReportingLine::Cash]);
        let receivables = section(&[ReportingLine::Receivables]);
        let inventory = section(&[ReportingLine::Inventory]);
        let other_current_assets = section(&[ReportingLine::OtherCurrentAssets]);
        let total_current_assets = cash.total + receivables.total + inventory.total + other_current_assets.total;
        let property_and_equipment = section(&[ReportingLine::PropertyAndEquipment, ReportingLine::AccumulatedDepreciation]);
        let other_non_current_assets = section(&[ReportingLine::OtherNonCurrentAssets]);
        let total_non_current_assets = property_and_equipment.total + other_non_current_assets.total;

        let payables = section(&[ReportingLine::Payables]);
        let tax_liabilities = section(&[ReportingLine::TaxLiabilities]);
        let other_current_liabilities = section(&[ReportingLine::OtherCurrentLiabilities]);
        let total_current_liabilities = payables.total + tax_liabilities.total + other_current_liabilities.total;
        let borrowings = section(&[ReportingLine::Borrowings]);

        let share_capital = section(&[ReportingLine::ShareCapital]);
        let mut retained_earnings = section(&[ReportingLine::RetainedEarnings]);
        if !prior_earnings.is_zero() {
            retained_earnings =
                retained_earnings.with_line(PRIOR_PERIOD_EARNINGS, "Earnings of prior periods", prior_earnings);
        }
        let total_equity = share_capital.total + retained_earnings.total + current_year_earnings;

        let liabilities = Liabilities {
            payables,
            tax_liabilities,
            other_current_liabilities,
            total_current_liabilities,
            total_liabilities: total_current_liabilities + borrowings.total,
            borrowings,
        };
        let sheet = Self {
            as_of,
            assets: Assets {
                cash,
                receivables,
                inventory,
                other_current_assets,
                total_current_assets,
                property_and_equipment,
                other_non_current_assets,
                total_non_current_assets,
                total_assets: total_current_assets + total_non_current_assets,
            },
            total_liabilities_and_equity: liabilities.total_liabilities + total_equity,
            liabilities,
            equity: Equity {
                share_capital,
                retained_earnings,
                current_year_earnings,
                total_equity,
            },
        };
        sheet.check_balanced()?;
        Ok(sheet)
    }

    /// `total_assets - total_liabilities_and_equity`
    pub fn difference(&self) -> Money {
        self.assets.total_assets - self.total_liabilities_and_equity
    }

    fn check_balanced(&self) -> Result<(), ReconciliationError> {
        if self.difference().round_to_currency().is_zero() {
            Ok(())
        } else {
            Err(ReconciliationError::BalanceSheetImbalance {
                as_of: self.as_of,
                assets: self.assets.total_assets,
                liabilities_and_equity: self.total_liabilities_and_equity,
            })
        }
    }
}

/// Checks that opening debits equal opening credits
pub fn check_opening_balances(snapshot: &LedgerSnapshot) -> Result<(), ReconciliationError> {
    let difference = AccountBalances::opening(snapshot).trial_balance_difference();
    if difference.round_to_currency().is_zero() {
        Ok(())
    } else {
        Err(ReconciliationError::OpeningBalancesUnbalanced { difference })
    }
}
