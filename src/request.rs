use crate::xml::Element;

/// A `<read>` request for a single transaction, identified by office, daybook code and number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadTransaction {
    pub office: String,
    pub code: String,
    pub number: u64,
}

impl ReadTransaction {
    #[must_use]
    pub fn new(office: impl Into<String>, code: impl Into<String>, number: u64) -> Self {
        Self {
            office: office.into(),
            code: code.into(),
            number,
        }
    }

    /// Human readable key, used in logs and not-found errors.
    #[must_use]
    pub fn key(&self) -> String {
        format!("office {} / {} {}", self.office, self.code, self.number)
    }

    #[must_use]
    pub fn to_element(&self) -> Element {
        Element::new("read")
            .with_child(Element::new("type").with_text("transaction"))
            .with_child(Element::new("office").with_text(self.office.as_str()))
            .with_child(Element::new("code").with_text(self.code.as_str()))
            .with_child(Element::new("number").with_text(self.number.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_read_element() {
        let request = ReadTransaction::new("001", "SLS", 201_300_095);
        assert_eq!(
            request.to_element().to_xml().unwrap(),
            "<read><type>transaction</type><office>001</office><code>SLS</code><number>201300095</number></read>"
        );
        assert_eq!(request.key(), "office 001 / SLS 201300095");
    }
}
