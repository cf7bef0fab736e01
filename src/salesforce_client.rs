use crate::crm_client::{ConnectionDescriptor, CrmClient};
use crate::errors::LeadError;
use crate::models::{SObject, SaveResult};
use crate::soap;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// Session returned by a successful `login`.
#[derive(Clone)]
struct Session {
    session_id: String,
    server_url: Url,
}

/// Salesforce Partner API client speaking SOAP over HTTP.
///
/// Mirrors the Partner toolkit flow: `create_connection`, then `login`, then
/// `create` against the server URL handed back by login.
#[derive(Clone)]
pub struct SoapPartnerClient {
    client: reqwest::Client,
    login_url: Url,
    session: Option<Session>,
}

impl std::fmt::Debug for SoapPartnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapPartnerClient")
            .field("login_url", &self.login_url.as_str())
            .field(
                "server_url",
                &self.session.as_ref().map(|s| s.server_url.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl SoapPartnerClient {
    /// Creates a client for the endpoint named by `descriptor`.
    ///
    /// A WSDL descriptor is read from disk and its `soap:address` location
    /// becomes the login endpoint.
    pub fn create_connection(descriptor: &ConnectionDescriptor) -> Result<Self, LeadError> {
        let login_url = match descriptor {
            ConnectionDescriptor::Endpoint(url) => url.clone(),
            ConnectionDescriptor::Wsdl(path) => {
                let wsdl = std::fs::read_to_string(path).map_err(|e| {
                    LeadError::Configuration(format!(
                        "Failed to read WSDL {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let location = soap::wsdl_location(&wsdl).ok_or_else(|| {
                    LeadError::Configuration(format!(
                        "WSDL {} declares no soap:address location",
                        path.display()
                    ))
                })?;
                Url::parse(location.trim()).map_err(|e| {
                    LeadError::Configuration(format!(
                        "WSDL {} declares an invalid location '{}': {}",
                        path.display(),
                        location,
                        e
                    ))
                })?
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                LeadError::Transport(format!("Failed to create Salesforce client: {}", e))
            })?;

        tracing::debug!("Salesforce login endpoint: {}", login_url);

        Ok(Self {
            client,
            login_url,
            session: None,
        })
    }

    /// Reuses a session established elsewhere.
    pub fn with_session(
        mut self,
        server_url: &str,
        session_id: impl Into<String>,
    ) -> Result<Self, LeadError> {
        self.session = Some(Session {
            session_id: session_id.into(),
            server_url: parse_url(server_url)?,
        });
        Ok(self)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    async fn call(&self, url: &Url, action: &str, envelope: String) -> Result<String, LeadError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", action)
            .body(envelope)
            .send()
            .await
            .map_err(|e| {
                LeadError::Transport(format!("Salesforce {} request failed: {}", action, e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            LeadError::Transport(format!("Failed to read Salesforce {} response: {}", action, e))
        })?;

        // Salesforce reports faults with HTTP 500, so check the body first
        if let Some(fault) = soap::fault_message(&body) {
            tracing::error!("Salesforce {} fault: {}", action, fault);
            return Err(LeadError::Transport(fault));
        }

        if !status.is_success() {
            tracing::error!("Salesforce {} returned {}: {}", action, status, body);
            return Err(LeadError::Transport(format!("HTTP {}: {}", status, body)));
        }

        Ok(body)
    }
}

impl CrmClient for SoapPartnerClient {
    async fn login(&mut self, username: &str, combined_secret: &str) -> Result<(), LeadError> {
        tracing::info!("Logging in to Salesforce as {}", username);

        let envelope = soap::login_envelope(username, combined_secret);
        let body = self.call(&self.login_url, "login", envelope).await?;

        let session_id = soap::extract_trimmed(&body, "sessionId").ok_or_else(|| {
            LeadError::Transport("Login response missing 'sessionId'".to_string())
        })?;
        let server_url = soap::extract_trimmed(&body, "serverUrl").ok_or_else(|| {
            LeadError::Transport("Login response missing 'serverUrl'".to_string())
        })?;

        self.session = Some(Session {
            session_id,
            server_url: parse_url(&server_url)?,
        });

        tracing::info!("✓ Salesforce session established");
        Ok(())
    }

    async fn create(&self, objects: &[SObject]) -> Result<Vec<SaveResult>, LeadError> {
        let session = self.session.as_ref().ok_or_else(|| {
            LeadError::Transport("Not logged in to Salesforce".to_string())
        })?;

        let envelope = soap::create_envelope(&session.session_id, objects)?;
        tracing::info!("Creating {} object(s) in Salesforce", objects.len());

        let body = self.call(&session.server_url, "create", envelope).await?;
        let results = soap::parse_save_results(&body)?;

        if results.len() != objects.len() {
            tracing::warn!(
                "Salesforce returned {} result(s) for {} object(s)",
                results.len(),
                objects.len()
            );
        }

        Ok(results)
    }
}

fn parse_url(raw: &str) -> Result<Url, LeadError> {
    Url::parse(raw.trim())
        .map_err(|e| LeadError::Transport(format!("Invalid Salesforce URL '{}': {}", raw, e)))
}
