//! Typed transactions
//!
//! A [`Transaction`] is immutable once validated. Corrections are new
//! transactions booked in the opposite [`EntryDirection`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, TransactionId};
use crate::account::{AccountKind, ChartOfAccountEntry, VatTreatment};

/// Whether a transaction increases or reverses its account's natural balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryDirection {
    /// Ordinary entry (a sale, a purchase, a capital injection)
    #[default]
    Increase,
    /// Reversing entry (a credit note, a purchase return, a repayment)
    Decrease,
}

/// Attributes of a supply (revenue transaction)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyDetail {
    /// Treatment forced by the transaction's own flags, if any
    pub vat_override: Option<VatTreatment>,
    /// VAT stated on the invoice, overriding the computed amount
    pub vat_amount: Option<Money>,
    /// Supply made by a Free Zone establishment
    pub free_zone: bool,
}

/// Attributes of a purchase (expense transaction)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    /// Treatment forced by the transaction's own flags, if any
    pub vat_override: Option<VatTreatment>,
    /// VAT stated on the supplier invoice, overriding the computed amount
    pub vat_amount: Option<Money>,
    /// Per-transaction override of the account's CIT deductibility
    pub cit_deductible: Option<bool>,
}

/// Kind-specific data of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransactionDetail {
    Revenue(SupplyDetail),
    Expense(PurchaseDetail),
    Asset,
    Liability,
    Equity,
}

impl TransactionDetail {
    pub fn kind(&self) -> AccountKind {
        match self {
            TransactionDetail::Revenue(_) => AccountKind::Revenue,
            TransactionDetail::Expense(_) => AccountKind::Expense,
            TransactionDetail::Asset => AccountKind::Asset,
            TransactionDetail::Liability => AccountKind::Liability,
            TransactionDetail::Equity => AccountKind::Equity,
        }
    }
}

/// One side of a transaction, signed debit-positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg<'a> {
    /// Account code
    pub account: &'a str,
    /// Debit-positive amount (a credit is negative)
    pub amount: Money,
}

/// A validated, categorized ledger transaction
///
/// # Invariants
///
/// - `amount` is non-negative and in the ledger currency
/// - `category` resolves to a chart account of the same kind
/// - `contra_account` is a balance-sheet account different from `category`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    /// Account code the transaction is booked to
    pub category: String,
    pub amount: Money,
    pub direction: EntryDirection,
    /// Balance-sheet account on the other side of the entry
    pub contra_account: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub detail: TransactionDetail,
}

impl Transaction {
    pub fn kind(&self) -> AccountKind {
        self.detail.kind()
    }

    /// Amount signed by direction: positive for increases, negative for reversals
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            EntryDirection::Increase => self.amount,
            EntryDirection::Decrease => -self.amount,
        }
    }

    /// The two balanced legs of this transaction, category first
    pub fn legs(&self) -> [Leg<'_>; 2] {
        let signed = self.signed_amount();
        let primary = if self.kind().is_debit_normal() { signed } else { -signed };
        [
            Leg {
                account: &self.category,
                amount: primary,
            },
            Leg {
                account: &self.contra_account,
                amount: -primary,
            },
        ]
    }

    /// VAT treatment that applies to this transaction
    ///
    /// A `Blocked` account always wins; otherwise the transaction's own
    /// exemption or zero-rating flag overrides the account default.
    /// Balance-sheet transactions are outside the scope of VAT.
    pub fn effective_vat_treatment(&self, entry: &ChartOfAccountEntry) -> VatTreatment {
        let vat_override = match &self.detail {
            TransactionDetail::Revenue(supply) => supply.vat_override,
            TransactionDetail::Expense(purchase) => purchase.vat_override,
            _ => return VatTreatment::NotApplicable,
        };
        if entry.vat_treatment == VatTreatment::Blocked {
            return VatTreatment::Blocked;
        }
        vat_override.unwrap_or(entry.vat_treatment)
    }

    /// VAT amount stated on the underlying invoice, if any
    pub fn stated_vat(&self) -> Option<Money> {
        match &self.detail {
            TransactionDetail::Revenue(supply) => supply.vat_amount,
            TransactionDetail::Expense(purchase) => purchase.vat_amount,
            _ => None,
        }
    }

    /// Whether an expense may be deducted for corporate tax
    ///
    /// Non-expense transactions are never add-backs and return true.
    pub fn is_cit_deductible(&self, entry: &ChartOfAccountEntry) -> bool {
        match &self.detail {
            TransactionDetail::Expense(purchase) => purchase.cit_deductible.unwrap_or(entry.cit_deductible),
            _ => true,
        }
    }

    /// Whether this is a supply made as a Free Zone transaction
    pub fn is_free_zone_supply(&self) -> bool {
        matches!(&self.detail, TransactionDetail::Revenue(supply) if supply.free_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::ReportingLine;
    use rust_decimal_macros::dec;

    fn tx(detail: TransactionDetail, category: &str, amount: Money, direction: EntryDirection) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            category: category.to_string(),
            amount,
            direction,
            contra_account: "cash".to_string(),
            description: None,
            detail,
        }
    }

    #[test]
    fn test_revenue_legs_credit_the_category() {
        let sale = tx(
            TransactionDetail::Revenue(SupplyDetail::default()),
            "sales_revenue",
            Money::aed(dec!(1000)),
            EntryDirection::Increase,
        );
        let [primary, contra] = sale.legs();
        assert_eq!(primary.account, "sales_revenue");
        assert_eq!(primary.amount.amount(), dec!(-1000));
        assert_eq!(contra.account, "cash");
        assert_eq!(contra.amount.amount(), dec!(1000));
    }

    #[test]
    fn test_reversal_flips_legs() {
        let refund = tx(
            TransactionDetail::Expense(PurchaseDetail::default()),
            "office_supplies",
            Money::aed(dec!(200)),
            EntryDirection::Decrease,
        );
        let [primary, contra] = refund.legs();
        assert_eq!(primary.amount.amount(), dec!(-200));
        assert_eq!(contra.amount.amount(), dec!(200));
        assert_eq!(refund.signed_amount().amount(), dec!(-200));
    }

    #[test]
    fn test_blocked_account_overrides_transaction_flags() {
        let entry = ChartOfAccountEntry::new("entertainment", "Entertainment", ReportingLine::OperatingExpenses)
            .with_vat(VatTreatment::Blocked);
        let purchase = tx(
            TransactionDetail::Expense(PurchaseDetail {
                vat_override: Some(VatTreatment::ZeroRated),
                ..Default::default()
            }),
            "entertainment",
            Money::aed(dec!(500)),
            EntryDirection::Increase,
        );
        assert_eq!(purchase.effective_vat_treatment(&entry), VatTreatment::Blocked);
    }

    #[test]
    fn test_transaction_override_beats_account_default() {
        let entry = ChartOfAccountEntry::new("sales_revenue", "Sales", ReportingLine::OperatingRevenue);
        let export = tx(
            TransactionDetail::Revenue(SupplyDetail {
                vat_override: Some(VatTreatment::ZeroRated),
                ..Default::default()
            }),
            "sales_revenue",
            Money::aed(dec!(500)),
            EntryDirection::Increase,
        );
        assert_eq!(export.effective_vat_treatment(&entry), VatTreatment::ZeroRated);
    }

    #[test]
    fn test_cit_deductibility_override() {
        let entry = ChartOfAccountEntry::new("marketing", "Marketing", ReportingLine::OperatingExpenses);
        let gift = tx(
            TransactionDetail::Expense(PurchaseDetail {
                cit_deductible: Some(false),
                ..Default::default()
            }),
            "marketing",
            Money::aed(dec!(50)),
            EntryDirection::Increase,
        );
        assert!(!gift.is_cit_deductible(&entry));
    }

    #[test]
    fn test_serialized_form_is_tagged_by_kind() {
        let equity = tx(TransactionDetail::Equity, "share_capital", Money::aed(dec!(10)), EntryDirection::Increase);
        let json = serde_json::to_value(&equity).unwrap();
        assert_eq!(json["kind"], "Equity");
        assert_eq!(json["contraAccount"], "cash");
    }
}
