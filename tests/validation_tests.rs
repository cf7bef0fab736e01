/// Unit tests for lead validation and normalization
/// Covers required fields, the allow-list, country and phone rewriting
use sf_lead_submitter::lead_fields::{ALLOWED_FIELDS, US_COUNTRY_ALIASES};
use sf_lead_submitter::validation::{prepare_lead, strip_phone_delimiters};
use sf_lead_submitter::{LeadRecord, ValidationError};

fn record(pairs: &[(&str, &str)]) -> LeadRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The sample referral used when the integration was first set up.
fn sample_referral() -> LeadRecord {
    record(&[
        ("Alumni_Email__c", "jharwell@example.edu"),
        ("Alumni_Last_Name__c", "Harwell"),
        ("Alumni_First_Name__c", "Jeff"),
        ("FirstName", "Jane"),
        ("LastName", "DoeTestThree"),
        ("MailingStreet", "555 Test Lane"),
        ("MailingCity", "Pasadena"),
        ("MailingState", "CA"),
        ("MailingPostalCode", "91182"),
        ("MailingCountry", "US"),
        ("Preferred_Phone__c", "555-555-5555"),
        ("Email", "janedoetestthree@example.org"),
        ("TargetX_SRMb__Gender__c", "Female"),
        ("Adjectives__c", "Tall, Loves Coffee"),
        ("Alumni_Timestamp__c", "2014060132149"),
        ("Alumni_IP__c", "127.0.0.1"),
    ])
}

#[cfg(test)]
mod required_field_tests {
    use super::*;

    #[test]
    fn test_missing_last_name() {
        let mut lead = sample_referral();
        lead.remove("LastName");
        assert_eq!(
            prepare_lead(&lead).unwrap_err(),
            ValidationError::MissingRequiredField("LastName".to_string())
        );
    }

    #[test]
    fn test_empty_and_whitespace_last_name() {
        for blank in ["", " ", "\t\n", "   "] {
            let err = prepare_lead(&record(&[("LastName", blank)])).unwrap_err();
            assert_eq!(
                err,
                ValidationError::EmptyRequiredField("LastName".to_string()),
                "blank value {:?} should be rejected",
                blank
            );
        }
    }

    #[test]
    fn test_alumni_last_name_does_not_satisfy_requirement() {
        let err = prepare_lead(&record(&[("Alumni_Last_Name__c", "Harwell")])).unwrap_err();
        assert_eq!(err.field(), "LastName");
    }

    #[test]
    fn test_missing_field_reported_before_invalid_field() {
        let err = prepare_lead(&record(&[("AccountId", "001xx")])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField("LastName".to_string())
        );
    }
}

#[cfg(test)]
mod allow_list_tests {
    use super::*;

    #[test]
    fn test_full_sample_referral_is_valid() {
        assert!(prepare_lead(&sample_referral()).is_ok());
    }

    #[test]
    fn test_every_allowed_field_accepted() {
        let mut lead: LeadRecord = ALLOWED_FIELDS
            .iter()
            .map(|f| (f.to_string(), "value".to_string()))
            .collect();
        lead.insert("LastName".to_string(), "Doe".to_string());
        assert_eq!(prepare_lead(&lead).unwrap().len(), ALLOWED_FIELDS.len());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut lead = sample_referral();
        lead.insert("AccountId".to_string(), "001xx000003DGb2AAG".to_string());
        assert_eq!(
            prepare_lead(&lead).unwrap_err(),
            ValidationError::UnknownField("AccountId".to_string())
        );
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        let err = prepare_lead(&record(&[("LastName", "Doe"), ("email", "a@b.co")])).unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("email".to_string()));
    }
}

#[cfg(test)]
mod country_tests {
    use super::*;

    #[test]
    fn test_us_aliases_are_omitted() {
        for alias in US_COUNTRY_ALIASES {
            for variant in [
                alias.to_string(),
                alias.to_lowercase(),
                alias.to_uppercase(),
                format!("  {} ", alias),
            ] {
                let prepared =
                    prepare_lead(&record(&[("LastName", "Doe"), ("MailingCountry", variant.as_str())]))
                        .unwrap();
                assert!(
                    !prepared.contains_key("MailingCountry"),
                    "{:?} should be omitted",
                    variant
                );
            }
        }
    }

    #[test]
    fn test_us_with_trailing_space() {
        let prepared =
            prepare_lead(&record(&[("LastName", "Doe"), ("MailingCountry", "us ")])).unwrap();
        assert!(!prepared.contains_key("MailingCountry"));
    }

    #[test]
    fn test_other_countries_pass_through() {
        for country in ["Canada", "South Korea", "U.S.", "United Kingdom", " Mexico "] {
            let prepared =
                prepare_lead(&record(&[("LastName", "Doe"), ("MailingCountry", country)]))
                    .unwrap();
            assert_eq!(prepared["MailingCountry"], country);
        }
    }
}

#[cfg(test)]
mod phone_tests {
    use super::*;

    #[test]
    fn test_us_formats() {
        assert_eq!(strip_phone_delimiters("555-555-5555"), "5555555555");
        assert_eq!(strip_phone_delimiters("(555)555-5555"), "5555555555");
        assert_eq!(strip_phone_delimiters("555.555.5555"), "5555555555");
        assert_eq!(strip_phone_delimiters("+1 (555) 555.5555"), "1 555 5555555");
    }

    #[test]
    fn test_other_characters_preserved() {
        assert_eq!(strip_phone_delimiters("555 555 5555 x12"), "555 555 5555 x12");
        assert_eq!(strip_phone_delimiters("+44 20 7946 0958"), "44 20 7946 0958");
        assert_eq!(strip_phone_delimiters(""), "");
    }

    #[test]
    fn test_phone_rewritten_in_prepared_record() {
        let prepared = prepare_lead(&sample_referral()).unwrap();
        assert_eq!(prepared["Preferred_Phone__c"], "5555555555");
        assert!(!prepared.contains_key("MailingCountry"));
        assert_eq!(prepared.len(), sample_referral().len() - 1);
    }
}
