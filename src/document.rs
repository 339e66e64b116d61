use crate::entities::Transaction;
use crate::error::Result;
use crate::mapper;
use crate::xml::Element;

/// A `<transactions>` request carrying one or more transactions to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionsDocument {
    root: Element,
}

impl Default for TransactionsDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionsDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Element::new("transactions"),
        }
    }

    /// Maps a transaction and appends it. Fails without modifying the document if the transaction
    /// violates an invariant such as unique line ids.
    pub fn add_transaction(&mut self, transaction: &Transaction) -> Result<&mut Self> {
        let element = mapper::transaction_to_xml(transaction)?;
        self.root.push(element);
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.children().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn to_xml(&self) -> Result<String> {
        self.root.to_xml()
    }
}
