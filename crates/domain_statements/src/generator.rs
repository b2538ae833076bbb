//! Consistent statement sets

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{temporal::financial_year_start, CompanyId, Currency, ReportingPeriod, TaxConfig};
use domain_ledger::LedgerSnapshot;

use crate::balance_sheet::{check_opening_balances, BalanceSheet};
use crate::cash_flow::CashFlowStatement;
use crate::error::{ReconciliationError, StatementError};
use crate::income_statement::IncomeStatement;
use crate::notes::{self, NoteContext, StatementNote};

/// Income statement, balance sheet and cash flow for one period, with notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatements {
    pub company_id: CompanyId,
    pub company_name: String,
    pub currency: Currency,
    pub period: ReportingPeriod,
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
    pub cash_flow: CashFlowStatement,
    pub notes: Vec<StatementNote>,
    pub generation_date: NaiveDate,
}

/// Generates financial statements from ledger snapshots
#[derive(Debug, Clone, Default)]
pub struct FinancialStatementGenerator {
    config: TaxConfig,
}

impl FinancialStatementGenerator {
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    pub fn generate_income_statement(&self, snapshot: &LedgerSnapshot, period: &ReportingPeriod) -> IncomeStatement {
        IncomeStatement::generate(snapshot, period)
    }

    /// Balance sheet with current-year earnings measured from the start of
    /// the financial year containing `as_of`
    pub fn generate_balance_sheet(&self, snapshot: &LedgerSnapshot, as_of: NaiveDate) -> Result<BalanceSheet, StatementError> {
        BalanceSheet::generate(snapshot, as_of, financial_year_start(as_of))
    }

    pub fn generate_cash_flow(
        &self,
        snapshot: &LedgerSnapshot,
        period: &ReportingPeriod,
    ) -> Result<CashFlowStatement, StatementError> {
        CashFlowStatement::generate(snapshot, period)
    }

    /// Generates and cross-checks the full set for a period
    ///
    /// The balance sheet is drawn up at the period end with the period's net
    /// income as current-year earnings.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Validated ledger
    /// * `period` - Reporting period
    /// * `generation_date` - Date printed on the statements
    ///
    /// # Errors
    ///
    /// `StatementError::Reconciliation` if the opening balances do not
    /// balance, the balance sheet does not balance, or closing cash differs
    /// from balance sheet cash
    pub fn generate(
        &self,
        snapshot: &LedgerSnapshot,
        period: &ReportingPeriod,
        generation_date: NaiveDate,
    ) -> Result<FinancialStatements, StatementError> {
        check_opening_balances(snapshot)?;

        let income_statement = IncomeStatement::generate(snapshot, period);
        let balance_sheet = BalanceSheet::generate(snapshot, period.end, period.start)?;
        let cash_flow = CashFlowStatement::generate(snapshot, period)?;

        if cash_flow.closing_cash != balance_sheet.assets.cash.total {
            return Err(ReconciliationError::CashMismatch {
                as_of: period.end,
                closing_cash: cash_flow.closing_cash,
                balance_sheet_cash: balance_sheet.assets.cash.total,
            }
            .into());
        }

        let notes = notes::prepare(&NoteContext {
            profile: snapshot.profile(),
            config: &self.config,
            income_statement: &income_statement,
            balance_sheet: &balance_sheet,
            cash_flow: &cash_flow,
            generation_date,
        });

        debug!(
            company = %snapshot.company_id(),
            %period,
            net_income = %income_statement.net_income,
            total_assets = %balance_sheet.assets.total_assets,
            closing_cash = %cash_flow.closing_cash,
            "financial statements generated"
        );

        Ok(FinancialStatements {
            company_id: snapshot.company_id(),
            company_name: snapshot.profile().company_name.clone(),
            currency: snapshot.currency(),
            period: *period,
            income_statement,
            balance_sheet,
            cash_flow,
            notes,
            generation_date,
        })
    }
}
