//! The CRM client capability the lead submitter talks through.

use crate::errors::LeadError;
use crate::models::{SObject, SaveResult};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use url::Url;

/// Default Partner API login endpoint used when no WSDL or URL is configured.
pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com/services/Soap/u/59.0";

/// A Salesforce client able to authenticate and create records.
///
/// Implementations own their session; transport and authentication failures
/// surface as [`LeadError::Transport`]. Bad connection settings are caught
/// earlier as [`LeadError::Configuration`].
pub trait CrmClient {
    /// Establish a session. `combined_secret` is the password followed by the
    /// security token.
    fn login(
        &mut self,
        username: &str,
        combined_secret: &str,
    ) -> impl Future<Output = Result<(), LeadError>> + Send;

    /// Create the given objects, returning one result per object in order.
    fn create(
        &self,
        objects: &[SObject],
    ) -> impl Future<Output = Result<Vec<SaveResult>, LeadError>> + Send;
}

/// Salesforce login credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub security_token: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
        }
    }

    /// Password with the security token appended, as Salesforce expects at login.
    pub fn combined_secret(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Where the client finds its login endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionDescriptor {
    /// Login endpoint given directly.
    Endpoint(Url),
    /// Partner WSDL file; its `soap:address` location is the login endpoint.
    Wsdl(PathBuf),
}

impl ConnectionDescriptor {
    /// Treats `http://` and `https://` values (any case) as endpoints and
    /// anything else as a WSDL path.
    pub fn parse(raw: &str) -> Result<Self, LeadError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LeadError::Configuration(
                "Connection descriptor cannot be empty".to_string(),
            ));
        }

        let scheme = raw.to_ascii_lowercase();
        if scheme.starts_with("http://") || scheme.starts_with("https://") {
            let url = Url::parse(raw).map_err(|e| {
                LeadError::Configuration(format!("Invalid Salesforce endpoint '{}': {}", raw, e))
            })?;
            Ok(ConnectionDescriptor::Endpoint(url))
        } else {
            Ok(ConnectionDescriptor::Wsdl(PathBuf::from(raw)))
        }
    }
}

impl Default for ConnectionDescriptor {
    fn default() -> Self {
        // DEFAULT_LOGIN_URL is a constant, known-good URL
        ConnectionDescriptor::Endpoint(
            Url::parse(DEFAULT_LOGIN_URL).expect("default login URL is valid"),
        )
    }
}
