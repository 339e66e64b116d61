use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::xml::Element;

/// Severity of a message Twinfield attaches to an element of a processed document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
}

/// A message Twinfield attached to an element via its `msg` / `msgtype` attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Name of the element carrying the message.
    pub element: String,
    pub text: String,
    pub kind: MessageKind,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.element, self.text)
    }
}

/// A document returned by the process XML service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    root: Element,
}

impl Response {
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn parse(xml: &str) -> Result<Self> {
        Element::parse(xml).map(Self::new)
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> Element {
        self.root
    }

    /// Twinfield marks the root of a processed document with `result="1"` on success and
    /// `result="0"` on failure. Documents without the attribute were not processed and count as
    /// successful.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.root.attribute("result").is_none_or(|result| result == "1")
    }

    #[must_use]
    pub fn error_messages(&self) -> Vec<Message> {
        self.messages(MessageKind::Error)
    }

    #[must_use]
    pub fn warning_messages(&self) -> Vec<Message> {
        self.messages(MessageKind::Warning)
    }

    fn messages(&self, kind: MessageKind) -> Vec<Message> {
        let msgtype = match kind {
            MessageKind::Error => "error",
            MessageKind::Warning => "warning",
        };
        self.root
            .descendants()
            .into_iter()
            .filter(|element| element.attribute("msgtype") == Some(msgtype))
            .map(|element| Message {
                element: element.name().to_string(),
                text: element.attribute("msg").unwrap_or_default().to_string(),
                kind,
            })
            .collect()
    }

    /// Returns an [`Error::Validation`] carrying the error messages when the document was
    /// rejected.
    pub fn assert_successful(&self) -> Result<()> {
        if self.is_successful() {
            return Ok(());
        }
        Err(Error::Validation {
            messages: self.error_messages(),
            span_trace: tracing_error::SpanTrace::capture(),
        })
    }
}
