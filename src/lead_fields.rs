//! Fixed field configuration for alumni-referral leads.
//!
//! These tables decide what a record may contain and how it is rewritten
//! before it reaches Salesforce. They never change at runtime.

/// Salesforce object type every lead is created as.
pub const CONTACT_OBJECT_TYPE: &str = "Contact";

pub const LAST_NAME: &str = "LastName";
pub const MAILING_COUNTRY: &str = "MailingCountry";
pub const PREFERRED_PHONE: &str = "Preferred_Phone__c";

/// Only these field names are accepted in a record.
pub const ALLOWED_FIELDS: [&str; 17] = [
    "LeadSource",
    "Alumni_Email__c",
    "Alumni_First_Name__c",
    "Alumni_Last_Name__c",
    "FirstName",
    LAST_NAME,
    "MailingStreet",
    "MailingCity",
    "MailingState",
    "MailingPostalCode",
    MAILING_COUNTRY,
    PREFERRED_PHONE,
    "Email",
    "TargetX_SRMb__Gender__c",
    "Adjectives__c",
    "Alumni_Timestamp__c",
    "Alumni_IP__c",
];

/// Every record must carry a non-blank value for these fields.
pub const REQUIRED_FIELDS: [&str; 1] = [LAST_NAME];

/// Country values meaning "United States". A matching `MailingCountry` is
/// omitted from the submission rather than sent.
pub const US_COUNTRY_ALIASES: [&str; 6] = [
    "United States of America",
    "The United States of America",
    "USA",
    "US",
    "United States",
    "America",
];

/// Runs of phone punctuation removed from `Preferred_Phone__c`.
pub const PHONE_DELIMITER_PATTERN: &str = r"[-()+.]+";

// Debug mode response
pub const DEBUG_SENTINEL_ID: &str = "xxxDEBUGMODExxx";
pub const DEBUG_MESSAGE: &str = "In Debug Mode, no Record Pushed to Salesforce";
pub const DEBUG_STATUS_CODE: u32 = 50000;

pub fn is_allowed_field(name: &str) -> bool {
    ALLOWED_FIELDS.contains(&name)
}

/// Case- and whitespace-insensitive match against [`US_COUNTRY_ALIASES`].
pub fn is_us_country_alias(value: &str) -> bool {
    let needle = value.trim().to_lowercase();
    US_COUNTRY_ALIASES
        .iter()
        .any(|alias| alias.to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allow_list_has_no_duplicates() {
        let unique: HashSet<_> = ALLOWED_FIELDS.iter().collect();
        assert_eq!(unique.len(), ALLOWED_FIELDS.len());
    }

    #[test]
    fn test_required_fields_are_allowed() {
        for field in REQUIRED_FIELDS {
            assert!(is_allowed_field(field), "{} must be allow-listed", field);
        }
    }

    #[test]
    fn test_us_alias_matching() {
        assert!(is_us_country_alias("us "));
        assert!(is_us_country_alias("  the united states of AMERICA"));
        assert!(!is_us_country_alias("Canada"));
        assert!(!is_us_country_alias("U.S."));
        assert!(!is_us_country_alias(""));
    }
}
