use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A lead as supplied by the caller: Salesforce field name to value.
pub type LeadRecord = BTreeMap<String, String>;

// ============ Salesforce Partner API Models ============

/// A generic Salesforce object as sent to `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SObject {
    /// Salesforce object type (e.g., "Contact").
    #[serde(rename = "type")]
    pub object_type: String,
    /// Field values keyed by API name.
    pub fields: LeadRecord,
}

impl SObject {
    pub fn new(object_type: impl Into<String>, fields: LeadRecord) -> Self {
        Self {
            object_type: object_type.into(),
            fields,
        }
    }
}

/// Status code attached to a failed save.
///
/// Salesforce reports symbolic codes such as `REQUIRED_FIELD_MISSING`;
/// the debug response uses a numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    Numeric(u32),
    Named(String),
}

impl StatusCode {
    /// Parses a status code as read off the wire, preferring the numeric form.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u32>() {
            Ok(code) => StatusCode::Numeric(code),
            Err(_) => StatusCode::Named(raw.to_string()),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Numeric(code) => write!(f, "{}", code),
            StatusCode::Named(name) => write!(f, "{}", name),
        }
    }
}

/// One error entry in a [`SaveResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveError {
    /// Human-readable message.
    pub message: String,
    /// Salesforce status code.
    pub status_code: StatusCode,
    /// Fields the error relates to, when Salesforce names any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Result entry returned by `create`, one per submitted object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    /// Identifier of the created record (or the debug sentinel).
    #[serde(default)]
    pub id: Option<String>,
    /// Whether the record was created.
    pub success: bool,
    /// Errors reported for a failed save.
    #[serde(default)]
    pub errors: Vec<SaveError>,
}

impl SaveResult {
    /// The first reported error, if any.
    pub fn first_error(&self) -> Option<&SaveError> {
        self.errors.first()
    }
}
