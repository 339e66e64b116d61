use serde::{Deserialize, Serialize};
use time::Date;

use super::{Destiny, Period, TransactionLine};
use crate::error::{Error, Result};

/// The daybook family a transaction belongs to. It decides which header and line fields exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Sales,
    Purchase,
    Journal,
}

impl TransactionKind {
    /// Invoice number and due date.
    #[must_use]
    pub fn has_invoice_fields(self) -> bool {
        matches!(self, Self::Sales | Self::Purchase)
    }

    #[must_use]
    pub fn has_payment_reference(self) -> bool {
        self == Self::Sales
    }

    /// Performance (ICT) fields on lines.
    #[must_use]
    pub fn has_performance_fields(self) -> bool {
        self == Self::Sales
    }
}

/// A financial document such as a sales invoice, made of ordered lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub destiny: Option<Destiny>,
    pub raise_warning: Option<bool>,
    pub auto_balance_vat: Option<bool>,
    pub office: Option<String>,
    pub code: Option<String>,
    /// Assigned by Twinfield; only present on transactions read back.
    pub number: Option<u64>,
    pub period: Option<Period>,
    pub currency: Option<String>,
    pub date: Option<Date>,
    /// Set by Twinfield (e.g. `import`); never sent.
    pub origin: Option<String>,
    pub free_text_1: Option<String>,
    pub free_text_2: Option<String>,
    pub free_text_3: Option<String>,
    pub due_date: Option<Date>,
    pub invoice_number: Option<String>,
    pub payment_reference: Option<String>,
    pub origin_reference: Option<String>,
    pub lines: Vec<TransactionLine>,
}

impl Transaction {
    #[must_use]
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            destiny: None,
            raise_warning: None,
            auto_balance_vat: None,
            office: None,
            code: None,
            number: None,
            period: None,
            currency: None,
            date: None,
            origin: None,
            free_text_1: None,
            free_text_2: None,
            free_text_3: None,
            due_date: None,
            invoice_number: None,
            payment_reference: None,
            origin_reference: None,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn sales() -> Self {
        Self::new(TransactionKind::Sales)
    }

    #[must_use]
    pub fn purchase() -> Self {
        Self::new(TransactionKind::Purchase)
    }

    #[must_use]
    pub fn journal() -> Self {
        Self::new(TransactionKind::Journal)
    }

    /// Appends a line, keeping line ids unique.
    pub fn add_line(&mut self, line: TransactionLine) -> Result<&mut Self> {
        if self.line(&line.id).is_some() {
            return Err(Error::DuplicateLine { id: line.id });
        }
        self.lines.push(line);
        Ok(self)
    }

    #[must_use]
    pub fn line(&self, id: &str) -> Option<&TransactionLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Checks invariants that cannot be enforced through the public fields.
    pub fn validate(&self) -> Result<()> {
        for (index, line) in self.lines.iter().enumerate() {
            if self.lines[..index].iter().any(|other| other.id == line.id) {
                return Err(Error::DuplicateLine {
                    id: line.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LineType;

    #[test]
    fn add_line_rejects_duplicate_ids() {
        let mut transaction = Transaction::sales();
        transaction
            .add_line(TransactionLine::new(LineType::Total, "1"))
            .unwrap()
            .add_line(TransactionLine::new(LineType::Detail, "2"))
            .unwrap();

        let err = transaction
            .add_line(TransactionLine::new(LineType::Vat, "2"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateLine { id } if id == "2"));
        assert_eq!(transaction.lines.len(), 2);
        assert_eq!(transaction.line("2").unwrap().line_type, LineType::Detail);
    }

    #[test]
    fn validate_catches_duplicates_pushed_directly() {
        let mut transaction = Transaction::journal();
        transaction.lines.push(TransactionLine::new(LineType::Detail, "1"));
        assert!(transaction.validate().is_ok());
        transaction.lines.push(TransactionLine::new(LineType::Detail, "1"));
        assert!(matches!(
            transaction.validate(),
            Err(Error::DuplicateLine { .. })
        ));
    }

    #[test]
    fn kinds_select_header_fields() {
        assert!(TransactionKind::Sales.has_payment_reference());
        assert!(!TransactionKind::Purchase.has_payment_reference());
        assert!(TransactionKind::Purchase.has_invoice_fields());
        assert!(!TransactionKind::Journal.has_invoice_fields());
        assert!(!TransactionKind::Journal.has_performance_fields());
    }
}
