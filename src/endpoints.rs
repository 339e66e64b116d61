use std::{convert::TryFrom, fmt};
use url::Url;

use crate::error::{Error, Result};

pub const LOGIN_URL: &str = "https://login.twinfield.com/webservices/session.asmx";

const PROCESS_XML_PATH: &str = "webservices/processxml.asmx";

/// A typed representation of Twinfield web service endpoints.
///
/// Logging on happens against a fixed login service; every other service lives on the cluster
/// the login returned.
#[derive(Debug, Clone)]
pub enum TwinfieldEndpoint {
    Session,
    ProcessXml(Url),

    /// Full URL, e.g. a sandbox login service
    Custom(String),
}

impl TwinfieldEndpoint {
    /// Converts the endpoint to a URL.
    pub fn to_url(&self) -> Result<Url> {
        match self {
            Self::Session => Url::parse(LOGIN_URL).map_err(|_| Error::InvalidEndpoint),
            Self::ProcessXml(cluster) => {
                // `join` replaces the last path segment unless the base ends with a slash
                let mut base = cluster.clone();
                if !base.path().ends_with('/') {
                    base.set_path(&format!("{}/", base.path()));
                }
                base.join(PROCESS_XML_PATH)
                    .map_err(|_| Error::InvalidEndpoint)
            }
            Self::Custom(url) => Url::parse(url).map_err(|_| Error::InvalidEndpoint),
        }
    }

    /// Creates a custom endpoint from a full URL string
    #[must_use]
    pub fn from_string(url: String) -> Self {
        Self::Custom(url)
    }
}

impl fmt::Display for TwinfieldEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_url() {
            Ok(url) => write!(f, "{url}"),
            Err(_) => write!(f, "Invalid endpoint"),
        }
    }
}

// Allow conversion from TwinfieldEndpoint to a Url
impl TryFrom<TwinfieldEndpoint> for Url {
    type Error = Error;

    fn try_from(endpoint: TwinfieldEndpoint) -> Result<Self> {
        endpoint.to_url()
    }
}
