//! Account balance aggregation
//!
//! Balances are accumulated debit-positive from transaction legs, then read
//! back in each account's natural orientation. Because every transaction
//! contributes two legs that cancel, the debit-positive sum over all
//! accounts equals the opening-balance difference and nothing else.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Currency, Money, ReportingPeriod};
use crate::account::{AccountKind, ChartOfAccountEntry, ChartOfAccounts, ReportingLine};
use crate::snapshot::LedgerSnapshot;
use crate::transaction::Transaction;

/// One account's contribution to a statement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLine {
    pub code: String,
    pub name: String,
    pub amount: Money,
}

/// Debit-positive balances per account code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalances {
    currency: Currency,
    debits: BTreeMap<String, Decimal>,
}

impl AccountBalances {
    fn empty(currency: Currency) -> Self {
        Self {
            currency,
            debits: BTreeMap::new(),
        }
    }

    fn post(&mut self, tx: &Transaction) {
        for leg in tx.legs() {
            *self.debits.entry(leg.account.to_string()).or_default() += leg.amount.amount();
        }
    }

    /// Closing balances as of the end of `date`: opening balances plus every
    /// transaction dated on or before it
    pub fn as_of(snapshot: &LedgerSnapshot, date: NaiveDate) -> Self {
        let mut balances = Self::opening(snapshot);
        for tx in snapshot.transactions_through(date) {
            balances.post(tx);
        }
        balances
    }

    /// Opening balances only
    pub fn opening(snapshot: &LedgerSnapshot) -> Self {
        let mut balances = Self::empty(snapshot.currency());
        for (code, natural) in snapshot.opening_balances() {
            let debit_normal = snapshot
                .chart()
                .get(code)
                .map(|e| e.kind().is_debit_normal())
                .unwrap_or(true);
            let debit = if debit_normal { natural.amount() } else { -natural.amount() };
            balances.debits.insert(code.clone(), debit);
        }
        balances
    }

    /// Movements of transactions dated within the period, without opening balances
    pub fn movements(snapshot: &LedgerSnapshot, period: &ReportingPeriod) -> Self {
        let mut balances = Self::empty(snapshot.currency());
        for tx in snapshot.transactions_in(period) {
            balances.post(tx);
        }
        balances
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Debit-positive balance of an account (zero when it never moved)
    pub fn debit_balance(&self, code: &str) -> Money {
        Money::new(self.debits.get(code).copied().unwrap_or_default(), self.currency)
    }

    /// Balance in the account's natural orientation
    pub fn natural_balance(&self, entry: &ChartOfAccountEntry) -> Money {
        let debit = self.debit_balance(&entry.code);
        if entry.kind().is_debit_normal() {
            debit
        } else {
            -debit
        }
    }

    /// Natural-orientation total of every account on a reporting line
    pub fn line_total(&self, chart: &ChartOfAccounts, line: ReportingLine) -> Money {
        let total: Decimal = chart
            .accounts_on(line)
            .map(|entry| self.natural_balance(entry).amount())
            .sum();
        Money::new(total, self.currency)
    }

    /// Per-account detail of a reporting line, in code order, skipping
    /// accounts that never moved
    pub fn line_details(&self, chart: &ChartOfAccounts, line: ReportingLine) -> Vec<AccountLine> {
        chart
            .accounts_on(line)
            .filter(|entry| self.debits.contains_key(&entry.code))
            .map(|entry| AccountLine {
                code: entry.code.clone(),
                name: entry.name.clone(),
                amount: self.natural_balance(entry),
            })
            .collect()
    }

    /// Natural-orientation total of every account of a kind
    pub fn kind_total(&self, chart: &ChartOfAccounts, kind: AccountKind) -> Money {
        let total: Decimal = chart
            .iter()
            .filter(|entry| entry.kind() == kind)
            .map(|entry| self.natural_balance(entry).amount())
            .sum();
        Money::new(total, self.currency)
    }

    /// Revenue minus expenses accumulated in these balances
    pub fn net_income(&self, chart: &ChartOfAccounts) -> Money {
        self.kind_total(chart, AccountKind::Revenue) - self.kind_total(chart, AccountKind::Expense)
    }

    /// Sum of all debit-positive balances; zero for balanced books
    pub fn trial_balance_difference(&self) -> Money {
        Money::new(self.debits.values().copied().sum(), self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CompanyTaxProfile;
    use crate::record::{LedgerInputs, OpeningBalance, TransactionRecord};
    use core_kernel::{CompanyId, TaxConfig};
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn snapshot() -> LedgerSnapshot {
        let inputs = LedgerInputs::new(CompanyId::new(), CompanyTaxProfile::new("Oasis LLC", dec!(100000)))
            .with_opening_balance(OpeningBalance::new("cash", AccountKind::Asset, dec!(50000)))
            .with_opening_balance(OpeningBalance::new("share_capital", AccountKind::Equity, dec!(50000)))
            .with_transactions(vec![
                TransactionRecord::new(date(1, 5), AccountKind::Revenue, "sales_revenue", dec!(100000)),
                TransactionRecord::new(date(2, 5), AccountKind::Expense, "rent_expense", dec!(30000)),
                TransactionRecord::new(date(3, 5), AccountKind::Revenue, "service_revenue", dec!(8000))
                    .against("accounts_receivable"),
            ]);
        LedgerSnapshot::build(inputs, &TaxConfig::default()).unwrap()
    }

    #[test]
    fn test_closing_balances() {
        let snapshot = snapshot();
        let chart = snapshot.chart();
        let closing = AccountBalances::as_of(&snapshot, date(12, 31));
        assert_eq!(closing.line_total(chart, ReportingLine::Cash).amount(), dec!(120000));
        assert_eq!(closing.line_total(chart, ReportingLine::Receivables).amount(), dec!(8000));
        assert_eq!(closing.net_income(chart).amount(), dec!(78000));
        assert!(closing.trial_balance_difference().is_zero());
    }

    #[test]
    fn test_as_of_excludes_later_transactions() {
        let snapshot = snapshot();
        let feb = AccountBalances::as_of(&snapshot, date(1, 31));
        assert_eq!(feb.debit_balance("cash").amount(), dec!(150000));
        assert!(feb.debit_balance("rent_expense").is_zero());
    }

    #[test]
    fn test_movements_skip_opening() {
        let snapshot = snapshot();
        let q1 = ReportingPeriod::new(date(1, 1), date(3, 31)).unwrap();
        let moves = AccountBalances::movements(&snapshot, &q1);
        assert_eq!(moves.debit_balance("cash").amount(), dec!(70000));
        assert!(moves.debit_balance("share_capital").is_zero());
    }

    #[test]
    fn test_line_details_in_code_order() {
        let snapshot = snapshot();
        let closing = AccountBalances::as_of(&snapshot, date(12, 31));
        let lines = closing.line_details(snapshot.chart(), ReportingLine::OperatingRevenue);
        let codes: Vec<_> = lines.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["sales_revenue", "service_revenue"]);
        assert_eq!(lines[1].amount.amount(), dec!(8000));
    }
}
