/// Validation and normalization of lead records
///
/// Runs before any Salesforce call, in this order:
/// 1. Required fields present and non-blank
/// 2. Every field allow-listed
/// 3. US country aliases dropped from `MailingCountry`
/// 4. Phone punctuation stripped from `Preferred_Phone__c`
use crate::errors::ValidationError;
use crate::lead_fields::{
    is_allowed_field, is_us_country_alias, MAILING_COUNTRY, PHONE_DELIMITER_PATTERN,
    PREFERRED_PHONE, REQUIRED_FIELDS,
};
use crate::models::LeadRecord;
use regex::Regex;
use std::sync::LazyLock;

static PHONE_DELIMITERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PHONE_DELIMITER_PATTERN).expect("phone delimiter pattern is a valid regex")
});

/// Check that every required field is present with a non-blank value.
pub fn validate_required_fields(record: &LeadRecord) -> Result<(), ValidationError> {
    for field in REQUIRED_FIELDS {
        match record.get(field) {
            None => {
                return Err(ValidationError::MissingRequiredField(field.to_string()));
            }
            Some(value) if value.trim().is_empty() => {
                return Err(ValidationError::EmptyRequiredField(field.to_string()));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Reject the first field that is not on the allow-list.
pub fn validate_allowed_fields(record: &LeadRecord) -> Result<(), ValidationError> {
    match record.keys().find(|key| !is_allowed_field(key)) {
        Some(key) => Err(ValidationError::UnknownField(key.clone())),
        None => Ok(()),
    }
}

/// Drop `MailingCountry` when it names the United States.
///
/// Any other value is kept exactly as supplied.
pub fn normalize_country(record: &mut LeadRecord) {
    let is_us = record
        .get(MAILING_COUNTRY)
        .is_some_and(|country| is_us_country_alias(country));

    if is_us {
        tracing::debug!("Omitting US MailingCountry from lead");
        record.remove(MAILING_COUNTRY);
    }
}

/// Strip hyphens, parentheses, plus signs and periods from a phone number.
///
/// Digits, spaces and any other characters are kept in their original order,
/// e.g. `"+1 (555) 555.5555"` becomes `"1 555 5555555"`.
pub fn strip_phone_delimiters(raw: &str) -> String {
    PHONE_DELIMITERS.replace_all(raw, "").into_owned()
}

/// Rewrite `Preferred_Phone__c` in place, if present.
pub fn normalize_phone(record: &mut LeadRecord) {
    if let Some(phone) = record.get_mut(PREFERRED_PHONE) {
        let stripped = strip_phone_delimiters(phone);
        if stripped != *phone {
            tracing::debug!("Normalized phone {} -> {}", phone, stripped);
            *phone = stripped;
        }
    }
}

/// Validate a record and return the normalized copy that would be submitted.
pub fn prepare_lead(record: &LeadRecord) -> Result<LeadRecord, ValidationError> {
    validate_required_fields(record)?;
    validate_allowed_fields(record)?;

    let mut normalized = record.clone();
    normalize_country(&mut normalized);
    normalize_phone(&mut normalized);
    Ok(normalized)
}
