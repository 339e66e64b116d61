//! Sentry integration for twinfield-rs errors.
//!
//! This module provides integration with Sentry for error reporting and breadcrumb capture.
//! It is only available when the `sentry` feature is enabled.
//!
//! # Usage
//!
//! Enable the `sentry` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! twinfield-rs = { version = "0.1", features = ["sentry"] }
//! ```
//!
//! Errors from twinfield-rs include span traces when they occur within an instrumented span and
//! an `ErrorLayer` is installed.

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;
use crate::response::Message;

fn messages_value(messages: &[Message]) -> Value {
    Value::from(
        messages
            .iter()
            .map(|message| Value::from(message.to_string()))
            .collect::<Vec<_>>(),
    )
}

/// Convert a twinfield-rs Error into a Sentry breadcrumb.
impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let (category, message, data) = match error {
            Error::Request(source) => (
                "http.request",
                format!("HTTP request error: {source}"),
                BTreeMap::new(),
            ),

            Error::UnexpectedStatus {
                status_code, url, ..
            } => {
                let mut data = BTreeMap::new();
                data.insert("url".to_string(), Value::from(url.clone()));
                data.insert("status_code".to_string(), Value::from(status_code.as_u16()));
                ("http.response", format!("Unexpected status {status_code}"), data)
            }

            Error::Xml(_) | Error::InvalidDocument { .. } => (
                "twinfield.xml",
                error.to_string(),
                BTreeMap::new(),
            ),

            Error::Mapping { element, value, .. } => {
                let mut data = BTreeMap::new();
                data.insert("element".to_string(), Value::from(element.clone()));
                data.insert("value".to_string(), Value::from(value.clone()));
                ("twinfield.mapping", format!("Cannot map <{element}>"), data)
            }

            Error::MissingElement { parent, element } => {
                let mut data = BTreeMap::new();
                data.insert("parent".to_string(), Value::from(parent.clone()));
                data.insert("element".to_string(), Value::from(element.clone()));
                ("twinfield.mapping", format!("Missing <{element}>"), data)
            }

            Error::NotFound {
                entity,
                key,
                messages,
                ..
            } => {
                let mut data = BTreeMap::new();
                data.insert("entity".to_string(), Value::from(entity.clone()));
                data.insert("key".to_string(), Value::from(key.clone()));
                data.insert("messages".to_string(), messages_value(messages));
                ("twinfield.api", format!("{entity} not found"), data)
            }

            Error::Validation { messages, .. } => {
                let mut data = BTreeMap::new();
                data.insert("messages".to_string(), messages_value(messages));
                (
                    "twinfield.api",
                    format!("Document rejected with {} errors", messages.len()),
                    data,
                )
            }

            Error::SoapFault { code, message, .. } => {
                let mut data = BTreeMap::new();
                data.insert("fault_code".to_string(), Value::from(code.clone()));
                ("twinfield.soap", message.clone(), data)
            }

            Error::Authentication { reason, .. } => ("auth", reason.clone(), BTreeMap::new()),

            Error::DuplicateLine { .. } | Error::EmptyDocument => (
                "twinfield.validation",
                error.to_string(),
                BTreeMap::new(),
            ),

            Error::InvalidEndpoint => (
                "twinfield.config",
                "Invalid endpoint URL".to_string(),
                BTreeMap::new(),
            ),
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(message),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Convert a twinfield-rs Error into Sentry context data.
///
/// # Example
///
/// ```ignore
/// use sentry::configure_scope;
/// use twinfield_rs::sentry_integration::error_to_sentry_context;
///
/// if let Err(e) = client.transactions().send(&transactions).await {
///     configure_scope(|scope| {
///         for (key, value) in error_to_sentry_context(&e) {
///             scope.set_extra(&key, value);
///         }
///     });
/// }
/// ```
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "twinfield.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    if let Some(status) = error.status_code() {
        context.insert(
            "twinfield.status_code".to_string(),
            Value::from(status.as_u16()),
        );
    }

    if let Error::UnexpectedStatus {
        response_body: Some(body),
        ..
    } = error
    {
        // Truncate for Sentry
        let truncated: String = body.chars().take(500).collect();
        context.insert("twinfield.response_body".to_string(), Value::from(truncated));
    }

    let messages = error.messages();
    if !messages.is_empty() {
        context.insert("twinfield.messages".to_string(), messages_value(messages));
    }

    context
}
