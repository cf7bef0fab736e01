//! Minimal SOAP 1.1 helpers for the Salesforce Partner API.
//!
//! Only the handful of elements the client reads are extracted; responses are
//! never fully parsed.

use crate::errors::LeadError;
use crate::models::{SObject, SaveError, SaveResult, StatusCode};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const PARTNER_NS: &str = "urn:partner.soap.sforce.com";
pub const SOBJECT_NS: &str = "urn:sobject.partner.soap.sforce.com";
const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

static FIELD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("field name pattern is a valid regex")
});

static SOAP_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:[\w-]+:)?address\s+location\s*=\s*"([^"]+)""#)
        .expect("soap address pattern is a valid regex")
});

/// Escape text for use inside an XML element.
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode XML character data: predefined and numeric entities, plus CDATA
/// sections, which are copied through untouched.
///
/// Unknown or malformed references are kept as written.
pub fn unescape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(['&', '<']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(cdata) = rest.strip_prefix("<![CDATA[") {
            match cdata.find("]]>") {
                Some(end) => {
                    out.push_str(&cdata[..end]);
                    rest = &cdata[end + 3..];
                }
                None => {
                    out.push_str(cdata);
                    rest = "";
                }
            }
            continue;
        }

        if rest.starts_with('&') {
            if let Some(end) = rest.find(';') {
                if let Some(ch) = decode_entity(&rest[1..end]) {
                    out.push(ch);
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }

        // Lone '<' or an unrecognised reference
        out.push_str(&rest[..1]);
        rest = &rest[1..];
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

fn envelope(header: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soapenv:Envelope xmlns:soapenv="{}" xmlns:urn="{}" xmlns:urn1="{}"><soapenv:Header>{}</soapenv:Header><soapenv:Body>{}</soapenv:Body></soapenv:Envelope>"#,
        ENVELOPE_NS, PARTNER_NS, SOBJECT_NS, header, body
    )
}

/// Build the `login` request.
pub fn login_envelope(username: &str, password: &str) -> String {
    let body = format!(
        "<urn:login><urn:username>{}</urn:username><urn:password>{}</urn:password></urn:login>",
        escape_xml(username),
        escape_xml(password)
    );
    envelope("", &body)
}

/// Build the `create` request for the given objects.
pub fn create_envelope(session_id: &str, objects: &[SObject]) -> Result<String, LeadError> {
    let header = format!(
        "<urn:SessionHeader><urn:sessionId>{}</urn:sessionId></urn:SessionHeader>",
        escape_xml(session_id)
    );

    let mut body = String::from("<urn:create>");
    for object in objects {
        body.push_str("<urn:sObjects>");
        body.push_str(&format!(
            "<urn1:type>{}</urn1:type>",
            escape_xml(&object.object_type)
        ));
        for (name, value) in &object.fields {
            if !FIELD_NAME.is_match(name) {
                return Err(LeadError::Transport(format!(
                    "'{}' cannot be sent as a SOAP field name",
                    name
                )));
            }
            body.push_str(&format!("<{0}>{1}</{0}>", name, escape_xml(value)));
        }
        body.push_str("</urn:sObjects>");
    }
    body.push_str("</urn:create>");

    Ok(envelope(&header, &body))
}

/// Elements read from Partner API responses.
const RESPONSE_ELEMENTS: [&str; 12] = [
    "Fault",
    "faultcode",
    "faultstring",
    "sessionId",
    "serverUrl",
    "result",
    "success",
    "id",
    "errors",
    "message",
    "statusCode",
    "fields",
];

static ELEMENT_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    RESPONSE_ELEMENTS
        .iter()
        .filter_map(|name| compile_element_pattern(name).map(|re| (*name, re)))
        .collect()
});

fn compile_element_pattern(name: &str) -> Option<Regex> {
    let name = regex::escape(name);
    Regex::new(&format!(
        r"(?s)<(?:[\w-]+:)?{0}(?:\s[^>]*[^/>])?>(.*?)</(?:[\w-]+:)?{0}>",
        name
    ))
    .ok()
}

fn element_pattern(name: &str) -> Option<Regex> {
    match ELEMENT_PATTERNS.get(name) {
        Some(pattern) => Some(pattern.clone()),
        None => compile_element_pattern(name),
    }
}

/// Inner text of the first element with the given local name, decoded but
/// otherwise verbatim.
pub fn extract_tag(xml: &str, name: &str) -> Option<String> {
    let pattern = element_pattern(name)?;
    pattern
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape_xml(m.as_str()))
}

/// Like [`extract_tag`], with surrounding whitespace removed.
pub fn extract_trimmed(xml: &str, name: &str) -> Option<String> {
    extract_tag(xml, name).map(|value| value.trim().to_string())
}

/// Raw inner XML of every element with the given local name.
pub fn extract_blocks(xml: &str, name: &str) -> Vec<String> {
    match element_pattern(name) {
        Some(pattern) => pattern
            .captures_iter(xml)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect(),
        None => Vec::new(),
    }
}

/// The `faultstring` of a SOAP fault, if the document is one.
pub fn fault_message(xml: &str) -> Option<String> {
    let fault = extract_blocks(xml, "Fault").into_iter().next()?;
    let code = extract_trimmed(&fault, "faultcode");
    let message = extract_tag(&fault, "faultstring").unwrap_or_else(|| "SOAP fault".to_string());
    Some(match code {
        Some(code) => format!("{}: {}", code, message),
        None => message,
    })
}

/// Login endpoint declared by a Partner WSDL.
pub fn wsdl_location(wsdl: &str) -> Option<String> {
    SOAP_ADDRESS
        .captures(wsdl)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape_xml(m.as_str()))
}

/// Parse the `<result>` entries of a `createResponse`.
pub fn parse_save_results(xml: &str) -> Result<Vec<SaveResult>, LeadError> {
    extract_blocks(xml, "result")
        .iter()
        .map(|block| parse_save_result(block))
        .collect()
}

fn parse_save_result(block: &str) -> Result<SaveResult, LeadError> {
    let success = match extract_trimmed(block, "success").as_deref() {
        Some("true") => true,
        Some("false") => false,
        other => {
            return Err(LeadError::Transport(format!(
                "Unexpected success value in create response: {:?}",
                other
            )));
        }
    };

    let id = extract_trimmed(block, "id").filter(|id| !id.is_empty());

    let errors = extract_blocks(block, "errors")
        .iter()
        .map(|err| SaveError {
            message: extract_tag(err, "message").unwrap_or_default(),
            status_code: extract_trimmed(err, "statusCode")
                .map(|code| StatusCode::parse(&code))
                .unwrap_or_else(|| StatusCode::Named("UNKNOWN_EXCEPTION".to_string())),
            fields: extract_blocks(err, "fields")
                .into_iter()
                .map(|f| unescape_xml(&f).trim().to_string())
                .collect(),
        })
        .collect();

    Ok(SaveResult {
        id,
        success,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadRecord;

    #[test]
    fn test_escape_roundtrip_special_chars() {
        let raw = r#"Tall & "Loves" <Coffee>"#;
        let escaped = escape_xml(raw);
        assert_eq!(
            escaped,
            "Tall &amp; &quot;Loves&quot; &lt;Coffee&gt;"
        );
        assert_eq!(unescape_xml(&escaped), raw);
    }

    #[test]
    fn test_create_envelope_contains_type_and_fields() {
        let mut fields = LeadRecord::new();
        fields.insert("LastName".to_string(), "O'Brien".to_string());
        let xml = create_envelope("SESSION", &[SObject::new("Contact", fields)]).unwrap();

        assert!(xml.contains("<urn:sessionId>SESSION</urn:sessionId>"));
        assert!(xml.contains("<urn1:type>Contact</urn1:type>"));
        assert!(xml.contains("<LastName>O&apos;Brien</LastName>"));
    }

    #[test]
    fn test_create_envelope_rejects_bad_element_name() {
        let mut fields = LeadRecord::new();
        fields.insert("Last Name".to_string(), "Doe".to_string());
        let result = create_envelope("SESSION", &[SObject::new("Contact", fields)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_tag_ignores_prefix() {
        let xml = "<sf:loginResponse><sf:result><sf:sessionId>abc&amp;d</sf:sessionId></sf:result></sf:loginResponse>";
        assert_eq!(extract_tag(xml, "sessionId").as_deref(), Some("abc&d"));
        assert_eq!(extract_tag(xml, "serverUrl"), None);
    }

    #[test]
    fn test_parse_failed_save_result() {
        let xml = r#"<createResponse><result><errors><fields>LastName</fields><message>Required fields are missing: [LastName]</message><statusCode>REQUIRED_FIELD_MISSING</statusCode></errors><id xsi:nil="true"/><success>false</success></result></createResponse>"#;
        let results = parse_save_results(xml).unwrap();

        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert_eq!(results[0].id, None);
        let err = results[0].first_error().unwrap();
        assert_eq!(err.message, "Required fields are missing: [LastName]");
        assert_eq!(
            err.status_code,
            StatusCode::Named("REQUIRED_FIELD_MISSING".to_string())
        );
        assert_eq!(err.fields, vec!["LastName".to_string()]);
    }

    #[test]
    fn test_fault_message() {
        let xml = r#"<soapenv:Envelope><soapenv:Body><soapenv:Fault><faultcode>sf:INVALID_LOGIN</faultcode><faultstring>INVALID_LOGIN: Invalid username, password, security token; or user locked out.</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#;
        assert_eq!(
            fault_message(xml).as_deref(),
            Some("sf:INVALID_LOGIN: INVALID_LOGIN: Invalid username, password, security token; or user locked out.")
        );
        assert_eq!(fault_message("<ok/>"), None);
    }

    #[test]
    fn test_unescape_numeric_references() {
        assert_eq!(
            unescape_xml("Can&#39;t save: line1&#xD;&#xA;line2"),
            "Can't save: line1\r\nline2"
        );
        assert_eq!(unescape_xml("caf&#233; &#X41;"), "café A");
    }

    #[test]
    fn test_unescape_cdata_and_malformed() {
        assert_eq!(unescape_xml("<![CDATA[a < b &amp; c]]>!"), "a < b &amp; c!");
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
        assert_eq!(unescape_xml("AT&T &bogus; &#xZZ;"), "AT&T &bogus; &#xZZ;");
        assert_eq!(unescape_xml("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn test_error_message_decoded_verbatim() {
        let xml = "<createResponse><result><errors><message> Can&#39;t save: line1&#xD;&#xA;line2 </message><statusCode> FIELD_CUSTOM_VALIDATION_EXCEPTION </statusCode></errors><success> false </success></result></createResponse>";
        let results = parse_save_results(xml).unwrap();
        let err = results[0].first_error().unwrap();
        assert_eq!(err.message, " Can't save: line1\r\nline2 ");
        assert_eq!(
            err.status_code,
            StatusCode::Named("FIELD_CUSTOM_VALIDATION_EXCEPTION".to_string())
        );
        assert!(!results[0].success);
    }

    #[test]
    fn test_error_message_from_cdata() {
        let xml = "<createResponse><result><errors><message><![CDATA[a < b]]></message><statusCode>INVALID_FIELD</statusCode></errors><success>false</success></result></createResponse>";
        let results = parse_save_results(xml).unwrap();
        assert_eq!(results[0].first_error().unwrap().message, "a < b");
    }

    #[test]
    fn test_cached_and_uncached_patterns_agree() {
        let xml = "<a:result><a:userName>jdoe</a:userName></a:result>";
        assert!(ELEMENT_PATTERNS.contains_key("result"));
        assert_eq!(extract_blocks(xml, "result").len(), 1);
        assert_eq!(extract_tag(xml, "userName").as_deref(), Some("jdoe"));
    }

    #[test]
    fn test_wsdl_location() {
        let wsdl = r#"<service name="SforceService"><port binding="tns:SoapBinding" name="Soap"><soap:address location="https://login.salesforce.com/services/Soap/u/59.0"/></port></service>"#;
        assert_eq!(
            wsdl_location(wsdl).as_deref(),
            Some("https://login.salesforce.com/services/Soap/u/59.0")
        );
    }
}
