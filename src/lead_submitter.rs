/// Alumni referral lead submission
///
/// Validates and normalizes a record, then creates it in Salesforce as a
/// Contact. In debug mode nothing is sent; a failure-shaped response is
/// returned so callers inspecting `success`/`errors` behave the same way.
use crate::config::Config;
use crate::crm_client::{CrmClient, Credentials};
use crate::errors::LeadError;
use crate::lead_fields::{
    CONTACT_OBJECT_TYPE, DEBUG_MESSAGE, DEBUG_SENTINEL_ID, DEBUG_STATUS_CODE,
};
use crate::models::{LeadRecord, SObject, SaveError, SaveResult, StatusCode};
use crate::salesforce_client::SoapPartnerClient;
use crate::validation::prepare_lead;

/// Pushes alumni referrals into Salesforce through a [`CrmClient`].
#[derive(Debug)]
pub struct LeadSubmitter<C> {
    client: C,
    debug_mode: bool,
}

impl<C: CrmClient> LeadSubmitter<C> {
    /// Logs `client` in with `credentials`. Login failures are returned as-is.
    pub async fn connect(mut client: C, credentials: &Credentials) -> Result<Self, LeadError> {
        client
            .login(&credentials.username, &credentials.combined_secret())
            .await?;
        Ok(Self::from_session(client))
    }

    /// Wraps a client whose session is already established.
    pub fn from_session(client: C) -> Self {
        Self {
            client,
            debug_mode: false,
        }
    }

    /// Switch to debug mode. There is no way back to live submission.
    pub fn set_debug_mode(&mut self) {
        if !self.debug_mode {
            tracing::warn!("Debug mode enabled: leads will not be pushed to Salesforce");
        }
        self.debug_mode = true;
    }

    /// Builder form of [`set_debug_mode`](Self::set_debug_mode).
    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        if enabled {
            self.set_debug_mode();
        }
        self
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validate and normalize a record without submitting it.
    pub fn prepare(&self, record: &LeadRecord) -> Result<LeadRecord, LeadError> {
        prepare_lead(record).map_err(|e| {
            tracing::warn!("❌ Lead rejected: {}", e);
            LeadError::from(e)
        })
    }

    /// Adds a lead to Salesforce.
    ///
    /// # Returns
    ///
    /// * `Ok(results)` - The client's response, unchanged. The created ID is
    ///   `results[0].id`. In debug mode, a single synthetic failed entry.
    /// * `Err(LeadError::Validation)` - The record was rejected; nothing was sent.
    /// * `Err(LeadError::Submission)` - Salesforce refused the record.
    /// * `Err(LeadError::Transport)` - The client call itself failed.
    pub async fn submit_lead(&self, record: &LeadRecord) -> Result<Vec<SaveResult>, LeadError> {
        let fields = self.prepare(record)?;
        let contact = SObject::new(CONTACT_OBJECT_TYPE, fields);

        if self.debug_mode {
            return Ok(debug_response(&contact));
        }

        tracing::info!("Submitting lead for {}", lead_label(&contact.fields));
        let response = self.client.create(std::slice::from_ref(&contact)).await?;

        let first = response.first().ok_or_else(|| {
            LeadError::Transport("Salesforce returned an empty create response".to_string())
        })?;

        if !first.success {
            let (message, status_code) = match first.first_error() {
                Some(err) => (err.message.clone(), err.status_code.clone()),
                None => (
                    String::new(),
                    StatusCode::Named("UNKNOWN_EXCEPTION".to_string()),
                ),
            };
            tracing::warn!("Insert failed: Status - {}, Message - {}", status_code, message);
            return Err(LeadError::Submission {
                message,
                status_code,
            });
        }

        tracing::info!(
            "✓ Lead created successfully: {}",
            first.id.as_deref().unwrap_or("<no id>")
        );
        Ok(response)
    }
}

impl LeadSubmitter<SoapPartnerClient> {
    /// Connects with the Salesforce settings from `config`.
    pub async fn from_config(config: &Config) -> Result<Self, LeadError> {
        let client = SoapPartnerClient::create_connection(&config.connection)?;
        let submitter = Self::connect(client, &config.credentials).await?;
        Ok(submitter.with_debug_mode(config.debug_mode))
    }
}

/// Emit the would-be payload and build the stand-in response.
fn debug_response(contact: &SObject) -> Vec<SaveResult> {
    match serde_json::to_string_pretty(contact) {
        Ok(payload) => tracing::info!("Debug mode, not submitting:\n{}", payload),
        Err(e) => tracing::info!("Debug mode, not submitting {:?} ({})", contact, e),
    }

    vec![SaveResult {
        id: Some(DEBUG_SENTINEL_ID.to_string()),
        success: false,
        errors: vec![SaveError {
            message: DEBUG_MESSAGE.to_string(),
            status_code: StatusCode::Numeric(DEBUG_STATUS_CODE),
            fields: Vec::new(),
        }],
    }]
}

fn lead_label(fields: &LeadRecord) -> String {
    match (fields.get("FirstName"), fields.get("LastName")) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (None, Some(last)) => last.clone(),
        _ => "<unnamed>".to_string(),
    }
}
