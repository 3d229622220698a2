use anyhow::{Context, Result};
use bindays_model::{CollectionSchedule, RawAddress};
use reqwest::header::ACCEPT;
use std::time::Duration;

use crate::schedule;
use crate::types::{AddressesResponse, ApiErrorBody, CollectionsResponse};

/// Proxy in front of the Cornwall Council collections service.
pub const DEFAULT_API_BASE: &str = "https://closed-titanium-baboon.glitch.me/api";

/// The upstream council site is slow; the proxy itself allows 15 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the two council lookups: addresses by postcode and
/// collection dates by address.
///
/// Failures are returned to the caller as-is; retrying is the user's call.
#[derive(Debug, Clone)]
pub struct CouncilClient {
    http: reqwest::Client,
    base_url: String,
}

impl CouncilClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bindays/", env!("CARGO_PKG_VERSION"), " (bin collection reminders)"))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch candidate addresses for a postcode.
    ///
    /// The returned text does not reliably contain the postcode; callers
    /// bind each result to the postcode they searched for.
    pub async fn lookup_addresses(&self, postcode: &str) -> Result<Vec<RawAddress>> {
        let postcode = postcode.trim();
        anyhow::ensure!(!postcode.is_empty(), "Postcode cannot be empty");

        let url = format!("{}/addresses", self.base_url);
        tracing::info!(url = %url, postcode = %postcode, "Fetching addresses");

        let body = self
            .get_text(&url, &[("postcode", postcode)])
            .await
            .context("Failed to fetch addresses")?;
        let addresses = parse_addresses(&body)?;

        tracing::info!(postcode = %postcode, count = addresses.len(), "Received addresses");
        Ok(addresses)
    }

    /// Fetch the next collection date for each waste stream at one address.
    pub async fn lookup_schedule(&self, uprn: &str, postcode: &str) -> Result<CollectionSchedule> {
        let (uprn, postcode) = (uprn.trim(), postcode.trim());
        anyhow::ensure!(
            !uprn.is_empty() && !postcode.is_empty(),
            "UPRN and postcode are required"
        );

        let url = format!("{}/collections", self.base_url);
        tracing::info!(url = %url, uprn = %uprn, postcode = %postcode, "Fetching collection dates");

        let body = self
            .get_text(&url, &[("uprn", uprn), ("postcode", postcode)])
            .await
            .context("Failed to fetch collection data")?;
        let response: CollectionsResponse =
            serde_json::from_str(&body).context("Malformed collection data response")?;

        let schedule = schedule::map_schedule(&response);
        tracing::debug!(?schedule, "Parsed collection dates");
        Ok(schedule)
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response body")?;

        if !status.is_success() {
            anyhow::bail!("HTTP {status} for {url}: {}", api_error_detail(&body));
        }
        Ok(body)
    }
}

/// Parse an address lookup body into raw addresses.
///
/// Records without a UPRN cannot be selected later, so they are dropped.
pub fn parse_addresses(body: &str) -> Result<Vec<RawAddress>> {
    let response: AddressesResponse =
        serde_json::from_str(body).context("Malformed address lookup response")?;
    let records = response
        .addresses
        .context("API response did not contain an addresses array")?;

    let mut addresses = Vec::with_capacity(records.len());
    for record in records {
        if record.uprn.trim().is_empty() {
            tracing::warn!(address = %record.address, "Skipping address without UPRN");
            continue;
        }
        addresses.push(RawAddress {
            text: record.address,
            uprn: record.uprn.trim().to_string(),
        });
    }
    Ok(addresses)
}

/// Best-effort description of an error response body.
pub fn api_error_detail(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { error: Some(message) }) if !message.trim().is_empty() => message,
        _ => "Unknown error".to_string(),
    }
}
