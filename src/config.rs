use crate::crm_client::{ConnectionDescriptor, Credentials};
use std::path::PathBuf;

/// Default file the driver appends created record IDs to.
pub const DEFAULT_CREATED_IDS_FILE: &str = "created_ids.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub connection: ConnectionDescriptor,
    pub debug_mode: bool,
    pub created_ids_file: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let username = required_var("SALESFORCE_USERNAME")?;
        let password = required_var("SALESFORCE_PASSWORD")?;
        // Empty when the org trusts the caller's IP range
        let security_token = std::env::var("SALESFORCE_SECURITY_TOKEN").map_err(|_| {
            anyhow::anyhow!("SALESFORCE_SECURITY_TOKEN environment variable required")
        })?;

        let connection = match std::env::var("SALESFORCE_CONNECTION")
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            Some(raw) => ConnectionDescriptor::parse(&raw)
                .map_err(|e| anyhow::anyhow!("SALESFORCE_CONNECTION is invalid: {}", e))?,
            None => ConnectionDescriptor::default(),
        };

        let debug_mode = match std::env::var("SALESFORCE_DEBUG_MODE") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                anyhow::anyhow!("SALESFORCE_DEBUG_MODE must be true/false, yes/no, on/off or 1/0")
            })?,
            Err(_) => false,
        };

        let created_ids_file = std::env::var("CREATED_IDS_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CREATED_IDS_FILE.to_string())
            .into();

        let config = Self {
            credentials: Credentials::new(username, password, security_token),
            connection,
            debug_mode,
            created_ids_file,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Salesforce user: {}", config.credentials.username);
        tracing::debug!("Salesforce connection: {:?}", config.connection);
        tracing::debug!("Debug mode: {}", config.debug_mode);
        tracing::debug!("Created IDs file: {}", config.created_ids_file.display());

        Ok(config)
    }
}

fn required_var(name: &str) -> anyhow::Result<String> {
    std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))
        .and_then(|value| {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
            Ok(value)
        })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
