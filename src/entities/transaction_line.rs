use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use super::{DebitCredit, LineType, MatchStatus, PerformanceType};

/// One accounting entry within a transaction.
///
/// Which fields Twinfield fills in depends on the line type: totals carry the VAT and open item
/// totals, details carry a VAT code and value, and VAT lines only carry the VAT code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub line_type: LineType,
    pub id: String,
    pub dim1: Option<String>,
    pub dim2: Option<String>,
    pub dim3: Option<String>,
    pub debit_credit: Option<DebitCredit>,
    /// Amount in the transaction currency.
    pub value: Option<Decimal>,
    /// Amount in the office's base currency.
    pub base_value: Option<Decimal>,
    /// Exchange rate from transaction to base currency.
    pub rate: Option<Decimal>,
    /// Amount in the reporting currency.
    pub rep_value: Option<Decimal>,
    pub rep_rate: Option<Decimal>,
    pub description: Option<String>,
    pub vat_code: Option<String>,
    pub vat_value: Option<Decimal>,
    pub vat_total: Option<Decimal>,
    pub vat_base_total: Option<Decimal>,
    pub match_status: Option<MatchStatus>,
    pub match_level: Option<u8>,
    pub base_value_open: Option<Decimal>,
    pub value_open: Option<Decimal>,
    pub performance_type: Option<PerformanceType>,
    pub performance_country: Option<String>,
    pub performance_vat_number: Option<String>,
    pub performance_date: Option<Date>,
}

impl TransactionLine {
    #[must_use]
    pub fn new(line_type: LineType, id: impl Into<String>) -> Self {
        Self {
            line_type,
            id: id.into(),
            dim1: None,
            dim2: None,
            dim3: None,
            debit_credit: None,
            value: None,
            base_value: None,
            rate: None,
            rep_value: None,
            rep_rate: None,
            description: None,
            vat_code: None,
            vat_value: None,
            vat_total: None,
            vat_base_total: None,
            match_status: None,
            match_level: None,
            base_value_open: None,
            value_open: None,
            performance_type: None,
            performance_country: None,
            performance_vat_number: None,
            performance_date: None,
        }
    }

    /// The value with debits positive and credits negative.
    #[must_use]
    pub fn signed_value(&self) -> Option<Decimal> {
        match (self.value, self.debit_credit) {
            (Some(value), Some(DebitCredit::Credit)) => Some(-value),
            (value, _) => value,
        }
    }
}
