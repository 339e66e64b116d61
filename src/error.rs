use miette::Diagnostic;
use reqwest::StatusCode;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::response::Message;

/// Errors that can occur when interacting with the Twinfield web services.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("error making request: {0:?}")]
    #[diagnostic(
        code(twinfield_rs::request_error),
        help("Check your network connection and Twinfield availability")
    )]
    Request(#[source] reqwest::Error),

    #[error("unexpected HTTP status {status_code} from {url}")]
    #[diagnostic(
        code(twinfield_rs::unexpected_status),
        help("The web service answered outside of the SOAP protocol; inspect the response body")
    )]
    UnexpectedStatus {
        status_code: StatusCode,
        url: String,
        response_body: Option<String>,
    },

    #[error("error reading XML: {0}")]
    #[diagnostic(
        code(twinfield_rs::xml_error),
        help("The document is not well-formed XML")
    )]
    Xml(#[source] quick_xml::Error),

    #[error("invalid XML document: {reason}")]
    #[diagnostic(
        code(twinfield_rs::invalid_document),
        help("The document is well-formed so far but structurally incomplete")
    )]
    InvalidDocument { reason: String },

    /// An element was present but its content could not be mapped onto the domain type.
    #[error("cannot map <{element}> value {value:?}: {reason}")]
    #[diagnostic(
        code(twinfield_rs::mapping_error),
        help("The response does not follow the Twinfield transaction schema")
    )]
    Mapping {
        element: String,
        value: String,
        reason: String,
    },

    #[error("missing required <{element}> in <{parent}>")]
    #[diagnostic(
        code(twinfield_rs::missing_element),
        help("The response does not follow the Twinfield transaction schema")
    )]
    MissingElement { parent: String, element: String },

    #[error("object not found: {entity} ({key}): {}", join_messages(.messages))]
    #[diagnostic(
        code(twinfield_rs::not_found),
        help("Verify that the {entity} exists in the given office and that you may read it")
    )]
    NotFound {
        entity: String,
        key: String,
        messages: Vec<Message>,
        span_trace: SpanTrace,
    },

    /// The login service refused the credentials, or the session is no longer valid.
    #[error("authentication failed: {reason}")]
    #[diagnostic(
        code(twinfield_rs::authentication),
        help("Check the user, password and organisation, and that the user is not blocked")
    )]
    Authentication { reason: String, span_trace: SpanTrace },

    /// Twinfield processed the document but rejected it.
    #[error("document rejected by Twinfield: {}", join_messages(.messages))]
    #[diagnostic(
        code(twinfield_rs::validation),
        help("Review the messages returned by Twinfield for each rejected element")
    )]
    Validation {
        messages: Vec<Message>,
        span_trace: SpanTrace,
    },

    #[error("SOAP fault {code}: {message}")]
    #[diagnostic(
        code(twinfield_rs::soap_fault),
        help("The web service failed to process the envelope")
    )]
    SoapFault {
        code: String,
        message: String,
        span_trace: SpanTrace,
    },

    #[error("duplicate transaction line id {id:?}")]
    #[diagnostic(
        code(twinfield_rs::duplicate_line),
        help("Line ids must be unique within a transaction")
    )]
    DuplicateLine { id: String },

    #[error("no transactions to send")]
    #[diagnostic(code(twinfield_rs::empty_document))]
    EmptyDocument,

    #[error("endpoint could not be parsed as a URL")]
    #[diagnostic(
        code(twinfield_rs::invalid_endpoint),
        help("Check that the cluster or login URL is correctly formatted")
    )]
    InvalidEndpoint,
}

impl Error {
    /// The span trace captured when a vendor-side error was created, if any.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::NotFound { span_trace, .. }
            | Self::Authentication { span_trace, .. }
            | Self::Validation { span_trace, .. }
            | Self::SoapFault { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }

    /// Messages returned by Twinfield along with a rejected or unanswered request.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        match self {
            Self::NotFound { messages, .. } | Self::Validation { messages, .. } => messages,
            _ => &[],
        }
    }

    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status_code, .. } => Some(*status_code),
            Self::Request(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the same request may succeed if sent again. Only safe for requests without side
    /// effects, such as logging on.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::UnexpectedStatus { status_code, .. } => {
                status_code.is_server_error() || *status_code == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Whether Twinfield certainly did not process the request: the connection was never made,
    /// or the service answered that it is busy or unavailable. Only these failures may be resent
    /// for documents that store data.
    #[must_use]
    pub fn is_unprocessed(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect(),
            Self::UnexpectedStatus { status_code, .. } => {
                *status_code == StatusCode::TOO_MANY_REQUESTS
                    || *status_code == StatusCode::SERVICE_UNAVAILABLE
            }
            _ => false,
        }
    }

    pub(crate) fn mapping(element: &str, value: &str, reason: impl ToString) -> Self {
        Self::Mapping {
            element: element.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn join_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "no messages".to_string();
    }
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;
