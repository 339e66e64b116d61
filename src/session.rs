use std::fmt;

use url::Url;

/// User name, password and organisation used to log on to Twinfield.
#[derive(Clone)]
pub struct Credentials {
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) organisation: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        organisation: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            organisation: organisation.into(),
        }
    }

    /// Creates new `Credentials` from `TWINFIELD_USER`, `TWINFIELD_PASSWORD` and
    /// `TWINFIELD_ORGANISATION` environment variables.
    ///
    /// Returns `None` if any of them is not set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Some(Self {
            user: std::env::var("TWINFIELD_USER").ok()?,
            password: std::env::var("TWINFIELD_PASSWORD").ok()?,
            organisation: std::env::var("TWINFIELD_ORGANISATION").ok()?,
        })
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn organisation(&self) -> &str {
        &self.organisation
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("organisation", &self.organisation)
            .finish()
    }
}

/// A logged on session: the token sent with every request and the cluster serving it.
#[derive(Clone)]
pub struct Session {
    pub(crate) session_id: String,
    pub(crate) cluster: Url,
}

impl Session {
    #[must_use]
    pub fn new(session_id: impl Into<String>, cluster: Url) -> Self {
        Self {
            session_id: session_id.into(),
            cluster,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn cluster(&self) -> &Url {
        &self.cluster
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &"[redacted]")
            .field("cluster", &self.cluster.as_str())
            .finish()
    }
}
