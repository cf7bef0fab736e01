//! Sample driver: submit one lead read from a JSON file.
//!
//! Usage: `sf-lead-submitter <record.json>`
//!
//! The record is a flat JSON object of Salesforce field names to string
//! values. The Salesforce response is printed, and the ID of a created record
//! is appended to `CREATED_IDS_FILE` so test data can be cleaned up later.

use anyhow::Context;
use sf_lead_submitter::config::Config;
use sf_lead_submitter::created_ids::append_created_id;
use sf_lead_submitter::{LeadRecord, LeadSubmitter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sf_lead_submitter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let record_path = std::env::args()
        .nth(1)
        .context("usage: sf-lead-submitter <record.json>")?;

    let config = Config::from_env()?;

    let raw = tokio::fs::read_to_string(&record_path)
        .await
        .with_context(|| format!("Cannot read record file {}", record_path))?;
    let record: LeadRecord = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON object of string fields", record_path))?;

    let submitter = LeadSubmitter::from_config(&config).await?;
    let response = submitter.submit_lead(&record).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    match response.first() {
        Some(result) if result.success => {
            if let Some(id) = result.id.as_deref() {
                println!("Id is {}", id);
                append_created_id(&config.created_ids_file, id)
                    .await
                    .with_context(|| {
                        format!("Cannot open {}", config.created_ids_file.display())
                    })?;
            }
        }
        Some(result) => {
            if let Some(err) = result.first_error() {
                tracing::warn!(
                    "Lead not created: Status - {}, Message - {}",
                    err.status_code,
                    err.message
                );
            }
        }
        None => tracing::warn!("Salesforce returned no results"),
    }

    Ok(())
}
