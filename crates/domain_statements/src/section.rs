//! Statement sections

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};
use domain_ledger::{AccountBalances, AccountLine, ChartOfAccounts, ReportingLine};

/// A statement line with its total and per-account detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSection {
    pub total: Money,
    /// Contributing accounts in code order
    pub lines: Vec<AccountLine>,
}

impl StatementSection {
    /// Builds a section from detail lines; the total is their sum
    pub fn from_lines(currency: Currency, lines: Vec<AccountLine>) -> Self {
        let total: Decimal = lines.iter().map(|l| l.amount.amount()).sum();
        Self {
            total: Money::new(total, currency),
            lines,
        }
    }

    /// Natural-orientation balances of the accounts on the given reporting lines
    pub fn of(balances: &AccountBalances, chart: &ChartOfAccounts, lines: &[ReportingLine]) -> Self {
        let details = lines
            .iter()
            .flat_map(|line| balances.line_details(chart, *line))
            .collect();
        Self::from_lines(balances.currency(), details)
    }

    /// Adds a synthetic line that has no chart account behind it
    pub fn with_line(mut self, code: &str, name: &str, amount: Money) -> Self {
        self.total = self.total + amount;
        self.lines.push(AccountLine {
            code: code.to_string(),
            name: name.to_string(),
            amount,
        });
        self
    }
}
