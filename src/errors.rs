use crate::models::StatusCode;
use std::fmt;

/// Reasons a record is rejected before anything is sent to Salesforce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is not present in the record.
    MissingRequiredField(String),
    /// A required field is present but blank after trimming.
    EmptyRequiredField(String),
    /// The record carries a field outside the allow-list.
    UnknownField(String),
}

impl ValidationError {
    /// Name of the field that caused the rejection.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingRequiredField(name)
            | ValidationError::EmptyRequiredField(name)
            | ValidationError::UnknownField(name) => name,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequiredField(name) => {
                write!(f, "New Record is missing required field: {}", name)
            }
            ValidationError::EmptyRequiredField(name) => {
                write!(f, "New Record has empty string in required field: {}", name)
            }
            ValidationError::UnknownField(name) => {
                write!(f, "{} is not a valid field for a new record", name)
            }
        }
    }
}

/// Coarse classification of a [`LeadError`], for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Submission,
    Transport,
    Configuration,
}

/// Errors returned by the lead submitter and the CRM clients.
#[derive(Debug, Clone)]
pub enum LeadError {
    /// The record failed validation; no CRM call was made.
    Validation(ValidationError),
    /// Salesforce accepted the call but refused to create the record.
    Submission {
        /// Message reported by Salesforce.
        message: String,
        /// Status code reported by Salesforce.
        status_code: StatusCode,
    },
    /// Connection, authentication, SOAP fault or malformed response.
    Transport(String),
    /// Unusable connection settings, found before any request is made.
    Configuration(String),
}

impl LeadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LeadError::Validation(_) => ErrorKind::Validation,
            LeadError::Submission { .. } => ErrorKind::Submission,
            LeadError::Transport(_) => ErrorKind::Transport,
            LeadError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

impl fmt::Display for LeadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadError::Validation(e) => write!(f, "Validation error: {}", e),
            LeadError::Submission {
                message,
                status_code,
            } => write!(
                f,
                "Insert Failed: Status - {}, Message - {}",
                status_code, message
            ),
            LeadError::Transport(msg) => write!(f, "Transport error: {}", msg),
            LeadError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for LeadError {}

impl From<ValidationError> for LeadError {
    fn from(err: ValidationError) -> Self {
        LeadError::Validation(err)
    }
}

impl From<reqwest::Error> for LeadError {
    fn from(err: reqwest::Error) -> Self {
        LeadError::Transport(err.to_string())
    }
}
