//! Taxable income from the ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, ReportingPeriod};
use domain_ledger::{AccountBalances, AccountKind, LedgerSnapshot};

use crate::engine::TaxableIncome;
use crate::error::CitError;

/// How taxable income was derived for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxableIncomeComputation {
    pub period: ReportingPeriod,
    /// Net income per the income statement
    pub accounting_income: Money,
    /// Expenses disallowed for corporate tax and added back
    pub non_deductible_expenses: Money,
    /// Free Zone revenue on qualifying accounts before capping
    pub qualifying_revenue: Money,
    pub taxable_income: TaxableIncome,
}

/// Derives taxable income from a ledger snapshot
pub struct TaxableIncomeCalculator;

impl TaxableIncomeCalculator {
    /// Computes taxable income for a period
    ///
    /// Taxable income is accounting net income plus non-deductible expenses.
    /// Qualifying income is revenue booked as a Free Zone transaction on an
    /// account that qualifies for QFZP treatment, capped to the range
    /// `[0, max(taxable income, 0)]`.
    pub fn compute(snapshot: &LedgerSnapshot, period: &ReportingPeriod) -> Result<TaxableIncomeComputation, CitError> {
        let currency = snapshot.currency();
        let accounting_income = AccountBalances::movements(snapshot, period).net_income(snapshot.chart());

        let mut add_backs = Decimal::ZERO;
        let mut qualifying = Decimal::ZERO;
        for tx in snapshot.transactions_in(period) {
            let entry = snapshot.account(&tx.category)?;
            match tx.kind() {
                AccountKind::Expense if !tx.is_cit_deductible(entry) => {
                    add_backs += tx.signed_amount().amount();
                }
                AccountKind::Revenue if entry.qualifies_for_qfzp && tx.is_free_zone_supply() => {
                    qualifying += tx.signed_amount().amount();
                }
                _ => {}
            }
        }

        let non_deductible_expenses = Money::new(add_backs, currency);
        let qualifying_revenue = Money::new(qualifying, currency);
        let amount = accounting_income + non_deductible_expenses;
        let ceiling = amount.non_negative().amount();
        let qualifying_income = Money::new(qualifying.max(Decimal::ZERO).min(ceiling), currency);

        Ok(TaxableIncomeComputation {
            period: *period,
            accounting_income,
            non_deductible_expenses,
            qualifying_revenue,
            taxable_income: TaxableIncome::new(amount, qualifying_income),
        })
    }
}
