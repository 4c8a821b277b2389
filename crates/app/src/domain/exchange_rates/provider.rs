//! Upstream rate provider.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::errors::RateProviderError;

/// The National Bank of Ukraine exchange directory.
pub const NBU_EXCHANGE_URL: &str =
    "https://bank.gov.ua/NBUStatService/v1/statdirectory/exchange";

/// One entry of the provider's response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderRate {
    /// Currency code as sent by the provider, not normalised.
    #[serde(default)]
    pub cc: Option<String>,

    /// UAH per one unit; some entries arrive without a rate.
    #[serde(default)]
    pub rate: Option<f64>,
}

#[automock]
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch the provider's current rate list.
    async fn fetch_rates(&self) -> Result<Vec<ProviderRate>, RateProviderError>;
}

/// JSON client for the NBU exchange directory.
#[derive(Debug, Clone)]
pub struct NbuRateProvider {
    http: Client,
    url: String,
}

impl NbuRateProvider {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RateProviderError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RateProvider for NbuRateProvider {
    #[tracing::instrument(
        name = "exchange_rates.provider.fetch_rates",
        skip(self),
        fields(url = %self.url),
        err
    )]
    async fn fetch_rates(&self) -> Result<Vec<ProviderRate>, RateProviderError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("json", "")])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(RateProviderError::UnexpectedStatus(status));
        }

        let body: Vec<Value> = response.json().await?;

        Ok(parse_entries(body))
    }
}

/// Decode each entry on its own; entries of the wrong shape are skipped.
pub(crate) fn parse_entries(body: Vec<Value>) -> Vec<ProviderRate> {
    let received = body.len();

    let entries: Vec<ProviderRate> = body
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if entries.len() < received {
        debug!(received, skipped = received - entries.len(), "skipped malformed rate entries");
    }

    entries
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn provider_entries_tolerate_missing_and_extra_fields() -> TestResult {
        let body = r#"[
            {"r030": 840, "txt": "Долар США", "rate": 41.2, "cc": "USD"},
            {"r030": 978, "cc": "eur", "rate": 47.9},
            {"cc": "XAU"}
        ]"#;

        let entries: Vec<ProviderRate> = serde_json::from_str(body)?;

        assert_eq!(entries.len(), 3);
        assert_eq!(entries.first().map(|e| e.rate), Some(Some(41.2)));
        assert_eq!(entries.get(1).and_then(|e| e.cc.as_deref()), Some("eur"));
        assert_eq!(entries.get(2).map(|e| e.rate), Some(None));

        Ok(())
    }

    #[test]
    fn malformed_entries_do_not_discard_valid_ones() -> TestResult {
        let body: Vec<Value> = serde_json::from_str(
            r#"[
                {"cc": "USD", "rate": 41.0},
                {"cc": "EUR", "rate": 45.0},
                {"r030": 1, "rate": 2.0},
                {"cc": null, "rate": 3.0},
                {"cc": 978, "rate": 4.0},
                {"cc": "GBP", "rate": "n/a"}
            ]"#,
        )?;

        let entries = parse_entries(body);

        let codes: Vec<_> = entries.iter().map(|e| e.cc.as_deref()).collect();

        assert_eq!(codes, vec![Some("USD"), Some("EUR"), None, None]);
        assert_eq!(entries.first().and_then(|e| e.rate), Some(41.0));
        assert_eq!(entries.get(1).and_then(|e| e.rate), Some(45.0));

        Ok(())
    }
}
