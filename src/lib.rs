//! Alumni Referral Salesforce Lead Submitter
//!
//! Validates alumni-referral records and creates them in Salesforce as
//! Contacts through the Partner SOAP API.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `created_ids`: Append-only log of created record IDs.
//! - `crm_client`: The CRM client capability, credentials and connection descriptor.
//! - `errors`: Error handling types.
//! - `lead_fields`: Allow-list, required fields and normalization tables.
//! - `lead_submitter`: Validate, normalize and submit a lead.
//! - `models`: Record, sObject and save result types.
//! - `salesforce_client`: Partner API client over SOAP.
//! - `soap`: SOAP envelope and response helpers.
//! - `validation`: Record validation and normalization.

pub mod config;
pub mod created_ids;
pub mod crm_client;
pub mod errors;
pub mod lead_fields;
pub mod lead_submitter;
pub mod models;
pub mod salesforce_client;
pub mod soap;
pub mod validation;

pub use crm_client::{ConnectionDescriptor, CrmClient, Credentials};
pub use errors::{ErrorKind, LeadError, ValidationError};
pub use lead_submitter::LeadSubmitter;
pub use models::{LeadRecord, SObject, SaveError, SaveResult, StatusCode};
pub use salesforce_client::SoapPartnerClient;
