//! Notes to the financial statements
//!
//! Standard paragraphs filled in with the company's status and figures
//! taken from the statements themselves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, TaxConfig};
use domain_ledger::{AccountingBasis, CompanyTaxProfile};

use crate::balance_sheet::BalanceSheet;
use crate::cash_flow::CashFlowStatement;
use crate::income_statement::IncomeStatement;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementNote {
    pub number: u32,
    pub title: String,
    pub body: String,
}

/// Inputs the notes draw on
pub(crate) struct NoteContext<'a> {
    pub profile: &'a CompanyTaxProfile,
    pub config: &'a TaxConfig,
    pub income_statement: &'a IncomeStatement,
    pub balance_sheet: &'a BalanceSheet,
    pub cash_flow: &'a CashFlowStatement,
    pub generation_date: NaiveDate,
}

pub(crate) fn prepare(ctx: &NoteContext<'_>) -> Vec<StatementNote> {
    let mut notes = vec![
        ("Basis of preparation", basis_of_preparation(ctx)),
        ("Corporate tax status", tax_status(ctx)),
        ("Value added tax", value_added_tax(ctx)),
        ("Revenue", revenue(ctx)),
    ];
    if !ctx.balance_sheet.assets.property_and_equipment.total.is_zero() {
        notes.push(("Property and equipment", property_and_equipment(ctx)));
    }
    notes.push(("Cash and cash equivalents", cash(ctx)));

    notes
        .into_iter()
        .zip(1u32..)
        .map(|((title, body), number)| StatementNote {
            number,
            title: title.to_string(),
            body,
        })
        .collect()
}

fn basis_of_preparation(ctx: &NoteContext<'_>) -> String {
    let basis = match ctx.profile.accounting_basis {
        AccountingBasis::Accrual => "the accrual basis: income and expenses are recognised when earned or incurred",
        AccountingBasis::Cash => "the cash basis: income and expenses are recognised when cash is received or paid",
    };
    format!(
        "These financial statements of {} cover the period {} to {} and were prepared on {}. \
         They are prepared on {}. Amounts are stated in {}.",
        ctx.profile.company_name,
        ctx.income_statement.period.start,
        ctx.income_statement.period.end,
        ctx.generation_date,
        basis,
        ctx.income_statement.net_income.currency().code()
    )
}

fn tax_status(ctx: &NoteContext<'_>) -> String {
    let config = ctx.config;
    let band = Money::new(config.cit_small_business_threshold, ctx.income_statement.net_income.currency());
    if ctx.profile.qfzp_conditions_met(config) {
        format!(
            "The Company is a Qualifying Free Zone Person. Qualifying income is subject to Corporate Tax at 0%; \
             other taxable income is subject to Corporate Tax at {}.",
            config.cit_standard_rate
        )
    } else if ctx.profile.is_free_zone {
        format!(
            "The Company is registered in a Free Zone but does not meet the conditions of a Qualifying Free Zone \
             Person. Taxable income is subject to Corporate Tax at 0% up to {} and at {} above that amount.",
            band, config.cit_standard_rate
        )
    } else {
        format!(
            "The Company is a mainland entity. Taxable income is subject to Corporate Tax at 0% up to {} and at {} \
             above that amount.",
            band, config.cit_standard_rate
        )
    }
}

fn value_added_tax(ctx: &NoteContext<'_>) -> String {
    let registration = match &ctx.profile.trn {
        Some(trn) => format!("The Company is registered for VAT under TRN {}.", trn),
        None => "The Company has no VAT registration number on record.".to_string(),
    };
    format!(
        "{} Standard-rated supplies are subject to VAT at {}. Revenue and expenses are stated net of VAT.",
        registration, ctx.config.vat_standard_rate
    )
}

fn revenue(ctx: &NoteContext<'_>) -> String {
    let statement = ctx.income_statement;
    format!(
        "Revenue for the period amounted to {}, of which {} arose from operating activities and {} from other \
         income. Net income for the period was {}.",
        statement.total_revenue, statement.operating_revenue.total, statement.other_income.total, statement.net_income
    )
}

fn property_and_equipment(ctx: &NoteContext<'_>) -> String {
    let section = &ctx.balance_sheet.assets.property_and_equipment;
    format!(
        "Property and equipment are stated at cost less accumulated depreciation. The net carrying amount at {} \
         was {}. Depreciation added back in the cash flow statement amounted to {}.",
        ctx.balance_sheet.as_of, section.total, ctx.cash_flow.operating_activities.depreciation
    )
}

fn cash(ctx: &NoteContext<'_>) -> String {
    format!(
        "Cash and cash equivalents comprise cash on hand and bank balances. They moved from {} to {} over the \
         period, a net movement of {}.",
        ctx.cash_flow.opening_cash, ctx.cash_flow.closing_cash, ctx.cash_flow.net_cash_flow
    )
}
