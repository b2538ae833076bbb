//! Chart of accounts
//!
//! Each account carries the metadata the tax engines treat as authoritative:
//! its VAT treatment, CIT deductibility, Free Zone qualification, and the
//! reporting line it rolls up into on the financial statements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LedgerError;

/// Kinds of accounts (and of the transactions posted to them)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountKind {
    /// Revenue accounts (credit normal balance)
    Revenue,
    /// Expense accounts (debit normal balance)
    Expense,
    /// Asset accounts (debit normal balance)
    Asset,
    /// Liability accounts (credit normal balance)
    Liability,
    /// Equity accounts (credit normal balance)
    Equity,
}

impl AccountKind {
    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountKind::Asset | AccountKind::Expense)
    }

    /// Returns true for accounts reported on the balance sheet
    pub fn is_balance_sheet(&self) -> bool {
        matches!(self, AccountKind::Asset | AccountKind::Liability | AccountKind::Equity)
    }
}

/// VAT treatment of supplies or purchases booked to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VatTreatment {
    /// Standard rate (5%)
    Standard,
    /// Zero-rated: taxable at 0%, input VAT remains recoverable
    ZeroRated,
    /// Exempt: no VAT charged, related input VAT not recoverable
    Exempt,
    /// Input VAT blocked from recovery (entertainment, personal use)
    Blocked,
    /// Outside the scope of VAT (salaries, depreciation, balance-sheet movements)
    NotApplicable,
}

/// Section of the cash flow statement a balance-sheet line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CashFlowClass {
    /// The cash position itself
    Cash,
    /// Working capital, reported under operating activities
    Operating,
    /// Non-cash charges added back to net income
    NonCash,
    /// Investing activities
    Investing,
    /// Financing activities
    Financing,
}

/// The line of the financial statements an account rolls up into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportingLine {
    // Income statement
    OperatingRevenue,
    OtherIncome,
    CostOfSales,
    OperatingExpenses,
    AdministrativeExpenses,
    FinanceCosts,
    OtherExpenses,
    // Balance sheet: assets
    Cash,
    Receivables,
    Inventory,
    OtherCurrentAssets,
    PropertyAndEquipment,
    AccumulatedDepreciation,
    OtherNonCurrentAssets,
    // Balance sheet: liabilities
    Payables,
    TaxLiabilities,
    OtherCurrentLiabilities,
    Borrowings,
    // Balance sheet: equity
    ShareCapital,
    RetainedEarnings,
}

impl ReportingLine {
    /// The account kind implied by this line
    pub fn kind(&self) -> AccountKind {
        use ReportingLine::*;
        match self {
            OperatingRevenue | OtherIncome => AccountKind::Revenue,
            CostOfSales | OperatingExpenses | AdministrativeExpenses | FinanceCosts | OtherExpenses => {
                AccountKind::Expense
            }
            Cash | Receivables | Inventory | OtherCurrentAssets | PropertyAndEquipment
            | AccumulatedDepreciation | OtherNonCurrentAssets => AccountKind::Asset,
            Payables | TaxLiabilities | OtherCurrentLiabilities | Borrowings => AccountKind::Liability,
            ShareCapital | RetainedEarnings => AccountKind::Equity,
        }
    }

    /// Cash flow section for balance-sheet lines; `None` for income-statement lines
    pub fn cash_flow_class(&self) -> Option<CashFlowClass> {
        use ReportingLine::*;
        match self {
            Cash => Some(CashFlowClass::Cash),
            Receivables | Inventory | OtherCurrentAssets | Payables | TaxLiabilities
            | OtherCurrentLiabilities => Some(CashFlowClass::Operating),
            AccumulatedDepreciation => Some(CashFlowClass::NonCash),
            PropertyAndEquipment | OtherNonCurrentAssets => Some(CashFlowClass::Investing),
            Borrowings | ShareCapital | RetainedEarnings => Some(CashFlowClass::Financing),
            _ => None,
        }
    }
}

/// An account in the chart of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOfAccountEntry {
    /// Account code, the category key transactions refer to (e.g. "sales_revenue")
    pub code: String,
    /// Account name
    pub name: String,
    /// Reporting line
    pub line: ReportingLine,
    /// VAT treatment
    pub vat_treatment: VatTreatment,
    /// Whether expenses on this account are deductible for corporate tax
    pub cit_deductible: bool,
    /// Whether income on this account can be qualifying income of a QFZP
    #[serde(rename = "qualifiesForQFZP")]
    pub qualifies_for_qfzp: bool,
}

impl ChartOfAccountEntry {
    /// Creates a new account
    ///
    /// Income-statement accounts default to standard-rated VAT; balance-sheet
    /// accounts default to `NotApplicable`. All accounts start CIT deductible
    /// and non-qualifying.
    ///
    /// # Arguments
    ///
    /// * `code` - Account code
    /// * `name` - Account name
    /// * `line` - Reporting line
    pub fn new(code: impl Into<String>, name: impl Into<String>, line: ReportingLine) -> Self {
        let vat_treatment = if line.kind().is_balance_sheet() {
            VatTreatment::NotApplicable
        } else {
            VatTreatment::Standard
        };
        Self {
            code: code.into(),
            name: name.into(),
            line,
            vat_treatment,
            cit_deductible: true,
            qualifies_for_qfzp: false,
        }
    }

    /// Sets the VAT treatment
    pub fn with_vat(mut self, treatment: VatTreatment) -> Self {
        self.vat_treatment = treatment;
        self
    }

    /// Marks the account as non-deductible for corporate tax
    pub fn non_deductible(mut self) -> Self {
        self.cit_deductible = false;
        self
    }

    /// Marks income on the account as potentially qualifying for QFZP relief
    pub fn qualifying_for_qfzp(mut self) -> Self {
        self.qualifies_for_qfzp = true;
        self
    }

    /// The account kind, derived from its reporting line
    pub fn kind(&self) -> AccountKind {
        self.line.kind()
    }
}

/// Chart of accounts keyed by account code
///
/// Ordered by code so every aggregate built from it iterates deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<ChartOfAccountEntry>", try_from = "Vec<ChartOfAccountEntry>")]
pub struct ChartOfAccounts {
    entries: BTreeMap<String, ChartOfAccountEntry>,
}

impl ChartOfAccounts {
    /// Creates an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chart from a list of entries, rejecting duplicate codes
    pub fn from_entries(entries: impl IntoIterator<Item = ChartOfAccountEntry>) -> Result<Self, LedgerError> {
        let mut chart = Self::new();
        for entry in entries {
            chart.add(entry)?;
        }
        Ok(chart)
    }

    /// Adds an account to the chart
    ///
    /// # Errors
    ///
    /// Returns error if an account with the same code already exists
    pub fn add(&mut self, entry: ChartOfAccountEntry) -> Result<(), LedgerError> {
        if self.entries.contains_key(&entry.code) {
            return Err(LedgerError::DuplicateAccount(entry.code));
        }
        self.entries.insert(entry.code.clone(), entry);
        Ok(())
    }

    /// Gets an account by code
    pub fn get(&self, code: &str) -> Option<&ChartOfAccountEntry> {
        self.entries.get(code)
    }

    /// Iterates accounts in code order
    pub fn iter(&self) -> impl Iterator<Item = &ChartOfAccountEntry> {
        self.entries.values()
    }

    /// Accounts rolling up into the given line, in code order
    pub fn accounts_on(&self, line: ReportingLine) -> impl Iterator<Item = &ChartOfAccountEntry> {
        self.entries.values().filter(move |e| e.line == line)
    }

    /// The account used as contra when a transaction names none
    ///
    /// Prefers the account coded `cash`, otherwise the first cash-line account.
    pub fn default_cash_account(&self) -> Option<&ChartOfAccountEntry> {
        self.entries
            .get("cash")
            .filter(|e| e.line == ReportingLine::Cash)
            .or_else(|| self.accounts_on(ReportingLine::Cash).next())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Standard chart for a UAE small or medium enterprise
    pub fn uae_standard() -> Self {
        use ReportingLine::*;
        let entries = vec![
            // Revenue
            ChartOfAccountEntry::new("sales_revenue", "Sales of Goods", OperatingRevenue).qualifying_for_qfzp(),
            ChartOfAccountEntry::new("service_revenue", "Services Rendered", OperatingRevenue).qualifying_for_qfzp(),
            ChartOfAccountEntry::new("export_sales", "Exports of Goods and Services", OperatingRevenue)
                .with_vat(VatTreatment::ZeroRated)
                .qualifying_for_qfzp(),
            ChartOfAccountEntry::new("residential_rent_income", "Residential Rental Income", OtherIncome)
                .with_vat(VatTreatment::Exempt),
            ChartOfAccountEntry::new("interest_income", "Interest Income", OtherIncome)
                .with_vat(VatTreatment::Exempt),
            ChartOfAccountEntry::new("dividend_income", "Dividend Income", OtherIncome)
                .with_vat(VatTreatment::NotApplicable)
                .qualifying_for_qfzp(),
            ChartOfAccountEntry::new("other_income", "Other Income", OtherIncome),
            // Expenses
            ChartOfAccountEntry::new("cost_of_goods_sold", "Cost of Goods Sold", CostOfSales),
            ChartOfAccountEntry::new("rent_expense", "Commercial Rent", OperatingExpenses),
            ChartOfAccountEntry::new("utilities", "Utilities", OperatingExpenses),
            ChartOfAccountEntry::new("marketing", "Marketing and Advertising", OperatingExpenses),
            ChartOfAccountEntry::new("depreciation", "Depreciation", OperatingExpenses)
                .with_vat(VatTreatment::NotApplicable),
            ChartOfAccountEntry::new("entertainment", "Client Entertainment", OperatingExpenses)
                .with_vat(VatTreatment::Blocked)
                .non_deductible(),
            ChartOfAccountEntry::new("exempt_supply_costs", "Costs of Exempt Supplies", OperatingExpenses)
                .with_vat(VatTreatment::Blocked),
            ChartOfAccountEntry::new("salaries", "Salaries and Wages", AdministrativeExpenses)
                .with_vat(VatTreatment::NotApplicable),
            ChartOfAccountEntry::new("office_supplies", "Office Supplies", AdministrativeExpenses),
            ChartOfAccountEntry::new("professional_fees", "Professional Fees", AdministrativeExpenses),
            ChartOfAccountEntry::new("bank_charges", "Bank Charges", FinanceCosts),
            ChartOfAccountEntry::new("interest_expense", "Interest Expense", FinanceCosts)
                .with_vat(VatTreatment::NotApplicable),
            ChartOfAccountEntry::new("personal_expenses", "Personal Expenses", OtherExpenses)
                .with_vat(VatTreatment::Blocked)
                .non_deductible(),
            ChartOfAccountEntry::new("fines_penalties", "Fines and Penalties", OtherExpenses)
                .with_vat(VatTreatment::NotApplicable)
                .non_deductible(),
            // Assets
            ChartOfAccountEntry::new("cash", "Cash on Hand", Cash),
            ChartOfAccountEntry::new("bank", "Bank Accounts", Cash),
            ChartOfAccountEntry::new("accounts_receivable", "Trade Receivables", Receivables),
            ChartOfAccountEntry::new("inventory", "Inventory", Inventory),
            ChartOfAccountEntry::new("prepaid_expenses", "Prepaid Expenses", OtherCurrentAssets),
            ChartOfAccountEntry::new("vat_receivable", "VAT Recoverable", OtherCurrentAssets),
            ChartOfAccountEntry::new("equipment", "Property, Plant and Equipment", PropertyAndEquipment),
            ChartOfAccountEntry::new("accumulated_depreciation", "Accumulated Depreciation", AccumulatedDepreciation),
            // Liabilities
            ChartOfAccountEntry::new("accounts_payable", "Trade Payables", Payables),
            ChartOfAccountEntry::new("vat_payable", "VAT Payable", TaxLiabilities),
            ChartOfAccountEntry::new("accrued_expenses", "Accrued Expenses", OtherCurrentLiabilities),
            ChartOfAccountEntry::new("loans", "Bank Borrowings", Borrowings),
            // Equity
            ChartOfAccountEntry::new("share_capital", "Share Capital", ShareCapital),
            ChartOfAccountEntry::new("retained_earnings", "Retained Earnings", RetainedEarnings),
            ChartOfAccountEntry::new("owner_drawings", "Owner Drawings", RetainedEarnings),
        ];

        let mut chart = Self::new();
        for entry in entries {
            chart.entries.insert(entry.code.clone(), entry);
        }
        chart
    }
}

impl From<ChartOfAccounts> for Vec<ChartOfAccountEntry> {
    fn from(chart: ChartOfAccounts) -> Self {
        chart.entries.into_values().collect()
    }
}

impl TryFrom<Vec<ChartOfAccountEntry>> for ChartOfAccounts {
    type Error = LedgerError;

    fn try_from(entries: Vec<ChartOfAccountEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_kind_mapping() {
        assert_eq!(ReportingLine::CostOfSales.kind(), AccountKind::Expense);
        assert_eq!(ReportingLine::AccumulatedDepreciation.kind(), AccountKind::Asset);
        assert_eq!(ReportingLine::TaxLiabilities.kind(), AccountKind::Liability);
        assert_eq!(ReportingLine::OperatingRevenue.cash_flow_class(), None);
        assert_eq!(ReportingLine::Borrowings.cash_flow_class(), Some(CashFlowClass::Financing));
    }

    #[test]
    fn test_entry_defaults_follow_line() {
        let revenue = ChartOfAccountEntry::new("sales", "Sales", ReportingLine::OperatingRevenue);
        assert_eq!(revenue.vat_treatment, VatTreatment::Standard);

        let cash = ChartOfAccountEntry::new("petty_cash", "Petty Cash", ReportingLine::Cash);
        assert_eq!(cash.vat_treatment, VatTreatment::NotApplicable);
        assert!(cash.cit_deductible);
        assert!(!cash.qualifies_for_qfzp);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let mut chart = ChartOfAccounts::uae_standard();
        let result = chart.add(ChartOfAccountEntry::new("cash", "Cash", ReportingLine::Cash));
        assert!(matches!(result, Err(LedgerError::DuplicateAccount(code)) if code == "cash"));
    }

    #[test]
    fn test_default_cash_account() {
        let chart = ChartOfAccounts::uae_standard();
        assert_eq!(chart.default_cash_account().map(|e| e.code.as_str()), Some("cash"));

        let chart = ChartOfAccounts::from_entries(vec![
            ChartOfAccountEntry::new("main_bank", "Main Bank", ReportingLine::Cash),
        ])
        .unwrap();
        assert_eq!(chart.default_cash_account().map(|e| e.code.as_str()), Some("main_bank"));
    }

    #[test]
    fn test_standard_chart_blocks_policy_categories() {
        let chart = ChartOfAccounts::uae_standard();
        for code in ["entertainment", "personal_expenses", "exempt_supply_costs"] {
            assert_eq!(chart.get(code).unwrap().vat_treatment, VatTreatment::Blocked, "{}", code);
        }
    }
}
