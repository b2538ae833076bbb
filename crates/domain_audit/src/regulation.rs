//! Statutory citations attached to audit trail entries

/// Output tax on taxable supplies at the standard rate
pub const VAT_STANDARD_RATE: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Article 3";
pub const VAT_ZERO_RATED_SUPPLIES: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Article 45";
pub const VAT_EXEMPT_SUPPLIES: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Article 46";
/// Recovery of input tax
pub const VAT_INPUT_RECOVERY: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Article 54";
/// Input tax that may not be recovered (entertainment, personal use)
pub const VAT_BLOCKED_INPUT: &str = "Cabinet Decision No. 52 of 2017 (VAT Executive Regulation), Article 53";
pub const VAT_OUTPUT_ADJUSTMENTS: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Articles 61-62";
pub const VAT_BAD_DEBT_RELIEF: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Article 64";
/// Payable tax and refunds for a tax period
pub const VAT_NET_POSITION: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Articles 67-70";
pub const VAT_MANDATORY_REGISTRATION: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Article 13";
pub const VAT_VOLUNTARY_REGISTRATION: &str = "Federal Decree-Law No. 8 of 2017 on VAT, Article 17";

pub const CIT_TAXABLE_INCOME: &str = "Federal Decree-Law No. 47 of 2022 on Corporate Tax, Article 20";
pub const CIT_RATES: &str = "Federal Decree-Law No. 47 of 2022 on Corporate Tax, Article 3";
/// The AED 375,000 zero-rate band
pub const CIT_ZERO_RATE_BAND: &str = "Cabinet Decision No. 116 of 2022";
pub const CIT_QUALIFYING_FREE_ZONE_PERSON: &str = "Federal Decree-Law No. 47 of 2022 on Corporate Tax, Article 18";
pub const CIT_SMALL_BUSINESS_RELIEF: &str = "Federal Decree-Law No. 47 of 2022 on Corporate Tax, Article 21";
