use std::time::Duration;

use reqwest::{StatusCode, header};
use tokio_retry::{
    RetryIf,
    strategy::{ExponentialBackoff, jitter},
};
use tracing_error::SpanTrace;
use url::Url;

use crate::document::TransactionsDocument;
use crate::endpoints::TwinfieldEndpoint;
use crate::entities::{Transaction, TransactionKind};
use crate::error::{Error, Result};
use crate::mapper;
use crate::request::ReadTransaction;
use crate::response::Response;
use crate::service::Service;
use crate::session::{Credentials, Session};
use crate::soap;

const MAX_RETRIES: usize = 3;
/// Retry delays grow as 200ms, 400ms, 800ms before jitter.
const RETRY_FACTOR_MS: u64 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
/// This is the client that is used for interacting with the Twinfield web services. It holds the
/// session obtained at logon and sends every request to the session's cluster.
pub struct Client {
    http: reqwest::Client,
    session: Session,
}

impl Client {
    fn build_http_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Request)
    }

    /// Logs on to the Twinfield login service.
    ///
    /// # Errors
    /// Returns [`Error::Authentication`] if Twinfield refuses the credentials.
    #[instrument(skip(credentials), fields(user = credentials.user(), organisation = credentials.organisation()))]
    pub async fn login(credentials: &Credentials) -> Result<Self> {
        Self::login_at(credentials, TwinfieldEndpoint::Session).await
    }

    /// Logs on against a specific session service, e.g. a sandbox.
    #[instrument(skip(credentials))]
    pub async fn login_at(credentials: &Credentials, endpoint: TwinfieldEndpoint) -> Result<Self> {
        let http = Self::build_http_client()?;
        let url = endpoint.to_url()?;
        let envelope = soap::logon_envelope(credentials).to_xml()?;

        let reply = post_with_retry(
            &http,
            &url,
            soap::LOGON_ACTION,
            &envelope,
            Error::is_transient,
        )
        .await?;
        let session = soap::parse_logon_response(&reply)?;
        info!(cluster = %session.cluster(), "logged on to Twinfield");

        Ok(Self { http, session })
    }

    /// Creates a client for a session obtained earlier.
    pub fn from_session(session: Session) -> Result<Self> {
        Ok(Self {
            http: Self::build_http_client()?,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Access the transactions API
    #[must_use]
    pub fn transactions(&self) -> TransactionsApi<'_, Self> {
        TransactionsApi::new(self)
    }
}

impl Service for Client {
    #[instrument(skip(self, request))]
    async fn process_xml(&self, request: &str) -> Result<String> {
        let url = TwinfieldEndpoint::ProcessXml(self.session.cluster.clone()).to_url()?;
        let envelope = soap::process_xml_envelope(&self.session.session_id, request).to_xml()?;

        // a request document may store transactions; resend only what Twinfield did not process
        let reply = post_with_retry(
            &self.http,
            &url,
            soap::PROCESS_XML_ACTION,
            &envelope,
            Error::is_unprocessed,
        )
        .await?;
        soap::parse_process_xml_response(&reply)
    }
}

/// Posts an envelope, retrying with exponential backoff while `retryable` holds for the failure.
async fn post_with_retry(
    http: &reqwest::Client,
    url: &Url,
    soap_action: &str,
    envelope: &str,
    retryable: fn(&Error) -> bool,
) -> Result<String> {
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(RETRY_FACTOR_MS)
        .map(jitter)
        .take(MAX_RETRIES);

    RetryIf::start(
        strategy,
        move || post_envelope(http, url, soap_action, envelope),
        |e: &Error| {
            let retry = retryable(e);
            if retry {
                warn!("Failure calling {}, retrying: {}", url, e);
            }
            retry
        },
    )
    .await
}

async fn post_envelope(
    http: &reqwest::Client,
    url: &Url,
    soap_action: &str,
    envelope: &str,
) -> Result<String> {
    trace!(%url, soap_action, "making SOAP request");
    let response = http
        .post(url.clone())
        .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
        .header("SOAPAction", soap_action)
        .body(envelope.to_owned())
        .send()
        .await?;

    handle_response(response).await
}

#[instrument(skip(response))]
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    debug!("Response from {}: status={}, {} bytes", url, status, text.len());
    trace!("Response text:\n{}", text);

    if status.is_success() {
        return Ok(text);
    }

    // SOAP faults arrive with a 500 status
    if let Some(fault) = soap::fault(&text) {
        error!("SOAP fault from {}: {}", url, fault);
        return Err(fault);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            reason: format!("HTTP {status} from {url}"),
            span_trace: SpanTrace::capture(),
        });
    }

    error!("Unexpected status code: {}", status);
    Err(Error::UnexpectedStatus {
        status_code: status,
        url,
        response_body: Some(text),
    })
}

/// API handler for transactions: reading one back and sending new ones.
#[derive(Debug)]
pub struct TransactionsApi<'a, S> {
    service: &'a S,
}

impl<'a, S: Service> TransactionsApi<'a, S> {
    #[must_use]
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Reads the transaction with the given daybook code and number from an office.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if Twinfield has no matching transaction.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        kind: TransactionKind,
        code: &str,
        number: u64,
        office: &str,
    ) -> Result<Vec<Transaction>> {
        let request = ReadTransaction::new(office, code, number);
        let response = self.service.send(&request.to_element()).await?;

        if !response.is_successful() {
            let messages = response.error_messages();
            error!("Transaction {} not found: {:?}", request.key(), messages);
            return Err(Error::NotFound {
                entity: "Transaction".to_string(),
                key: request.key(),
                messages,
                span_trace: SpanTrace::capture(),
            });
        }

        let transactions = mapper::transactions_from_response(kind, &response)?;
        if transactions.is_empty() {
            return Err(Error::NotFound {
                entity: "Transaction".to_string(),
                key: request.key(),
                messages: Vec::new(),
                span_trace: SpanTrace::capture(),
            });
        }

        debug!("Response contains {} transactions", transactions.len());
        Ok(transactions)
    }

    /// Sends transactions in a single document.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] with Twinfield's messages if the document is rejected.
    #[instrument(skip(self, transactions), fields(count = transactions.len()))]
    pub async fn send(&self, transactions: &[Transaction]) -> Result<Response> {
        if transactions.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let mut document = TransactionsDocument::new();
        for transaction in transactions {
            document.add_transaction(transaction)?;
        }

        let response = self.service.send(document.root()).await?;
        for warning in response.warning_messages() {
            warn!("Twinfield warning: {}", warning);
        }
        if let Err(e) = response.assert_successful() {
            error!("Transactions rejected: {}", e);
            return Err(e);
        }

        Ok(response)
    }
}
