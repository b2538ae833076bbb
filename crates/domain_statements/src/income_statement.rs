//! Income statement

use serde::{Deserialize, Serialize};

use core_kernel::{Money, ReportingPeriod};
use domain_ledger::{AccountBalances, LedgerSnapshot, ReportingLine};

use crate::section::StatementSection;

/// Profit or loss for a period
///
/// - `gross_profit = operating_revenue - cost_of_sales`
/// - `operating_profit = gross_profit - operating_expenses - administrative_expenses`
/// - `net_income = total_revenue - total_expenses`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    pub period: ReportingPeriod,
    pub operating_revenue: StatementSection,
    pub other_income: StatementSection,
    pub total_revenue: Money,
    pub cost_of_sales: StatementSection,
    pub gross_profit: Money,
    pub operating_expenses: StatementSection,
    pub administrative_expenses: StatementSection,
    pub operating_profit: Money,
    pub finance_costs: StatementSection,
    pub other_expenses: StatementSection,
    pub total_expenses: Money,
    pub net_income: Money,
}

impl IncomeStatement {
    /// Builds the income statement from the movements of the period
    pub fn generate(snapshot: &LedgerSnapshot, period: &ReportingPeriod) -> Self {
        let balances = AccountBalances::movements(snapshot, period);
        let chart = snapshot.chart();
        let section = |line| StatementSection::of(&balances, chart, &[line]);

        let operating_revenue = section(ReportingLine::OperatingRevenue);
        let other_income = section(ReportingLine::OtherIncome);
        let cost_of_sales = section(ReportingLine::CostOfSales);
        let operating_expenses = section(ReportingLine::OperatingExpenses);
        let administrative_expenses = section(ReportingLine::AdministrativeExpenses);
        let finance_costs = section(ReportingLine::FinanceCosts);
        let other_expenses = section(ReportingLine::OtherExpenses);

        let total_revenue = operating_revenue.total + other_income.total;
        let gross_profit = operating_revenue.total - cost_of_sales.total;
        let operating_profit = gross_profit - operating_expenses.total - administrative_expenses.total;
        let total_expenses = cost_of_sales.total
            + operating_expenses.total
            + administrative_expenses.total
            + finance_costs.total
            + other_expenses.total;

        Self {
            period: *period,
            operating_revenue,
            other_income,
            total_revenue,
            cost_of_sales,
            gross_profit,
            operating_expenses,
            administrative_expenses,
            operating_profit,
            finance_costs,
            other_expenses,
            total_expenses,
            net_income: total_revenue - total_expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::{CompanyId, TaxConfig};
    use domain_ledger::{AccountKind, CompanyTaxProfile, LedgerInputs, TransactionRecord};
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_subtotals() {
        let records = vec![
            TransactionRecord::new(date(1, 5), AccountKind::Revenue, "sales_revenue", dec!(100000)),
            TransactionRecord::new(date(1, 6), AccountKind::Revenue, "interest_income", dec!(2000)),
            TransactionRecord::new(date(1, 7), AccountKind::Expense, "cost_of_goods_sold", dec!(40000)),
            TransactionRecord::new(date(1, 8), AccountKind::Expense, "rent_expense", dec!(10000)),
            TransactionRecord::new(date(1, 9), AccountKind::Expense, "salaries", dec!(15000)),
            TransactionRecord::new(date(1, 10), AccountKind::Expense, "bank_charges", dec!(500)),
            TransactionRecord::new(date(1, 11), AccountKind::Expense, "fines_penalties", dec!(1500)),
        ];
        let inputs = LedgerInputs::new(CompanyId::new(), CompanyTaxProfile::new("Oasis LLC", dec!(500000)))
            .with_transactions(records);
        let snapshot = LedgerSnapshot::build(inputs, &TaxConfig::default()).unwrap();

        let statement = IncomeStatement::generate(&snapshot, &ReportingPeriod::calendar_year(2024).unwrap());

        assert_eq!(statement.total_revenue.amount(), dec!(102000));
        assert_eq!(statement.gross_profit.amount(), dec!(60000));
        assert_eq!(statement.operating_profit.amount(), dec!(35000));
        assert_eq!(statement.total_expenses.amount(), dec!(67000));
        assert_eq!(statement.net_income.amount(), dec!(35000));
        assert_eq!(statement.operating_expenses.lines[0].code, "rent_expense");
        assert!(statement.operating_expenses.lines.iter().all(|l| l.code != "marketing"));
    }
}
