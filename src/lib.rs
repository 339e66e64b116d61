//! # twinfield-rs
//!
//! A Rust client library for the Twinfield accounting web services.
//!
//! Transactions are plain data ([`Transaction`], [`TransactionLine`]) that the [`mapper`] turns
//! into Twinfield's transaction XML and back. A [`Client`] logs on, then sends request documents
//! to the process XML service of the session's cluster.
//!
//! ```ignore
//! use twinfield_rs::{Client, Credentials, TransactionKind};
//!
//! let client = Client::login(&Credentials::from_env().expect("credentials")).await?;
//! let transactions = client
//!     .transactions()
//!     .get(TransactionKind::Sales, "SLS", 201_300_095, "001")
//!     .await?;
//! ```
//!
//! ## Testing without Twinfield
//!
//! [`TransactionsApi`](client::TransactionsApi) is generic over the [`Service`] trait, so a type
//! that answers `process_xml` with canned documents can stand in for the web service.
//!
//! ## Sentry Integration
//!
//! Vendor-side errors capture a [`SpanTrace`]. Install `tracing_error::ErrorLayer` in your
//! subscriber to fill it, and enable the `sentry` feature to turn errors into breadcrumbs:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())  // Required for SpanTrace capture
//!     .init();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod document;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod mapper;
pub mod request;
pub mod response;
pub mod service;
pub mod session;
pub mod soap;
pub mod utils;
pub mod xml;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::{Client, TransactionsApi};
pub use document::TransactionsDocument;
pub use endpoints::TwinfieldEndpoint;
pub use entities::*;
pub use error::{Error, Result};
pub use response::{Message, MessageKind, Response};
pub use service::Service;
pub use session::{Credentials, Session};
pub use xml::Element;

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;
