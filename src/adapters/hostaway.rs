use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::parse_timestamp;
use crate::config::HostawayConfig;
use crate::domain::model::{NewReview, ProviderName, Review, ReviewCategoryScore, ReviewKind};
use crate::domain::ports::ReviewSource;
use crate::utils::error::{GatewayError, Result};

const PROVIDER: ProviderName = ProviderName::Hostaway;

#[derive(Debug, Deserialize)]
struct HostawayPayload {
    result: Vec<HostawayReview>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostawayReview {
    id: RawId,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    public_review: Option<String>,
    #[serde(default)]
    review_category: Option<Vec<HostawayCategory>>,
    #[serde(default)]
    submitted_at: Option<String>,
    #[serde(default)]
    guest_name: Option<String>,
    #[serde(default)]
    listing_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostawayCategory {
    category: String,
    rating: f64,
}

impl From<HostawayReview> for Review {
    fn from(raw: HostawayReview) -> Self {
        let kind = match raw.kind.as_deref() {
            Some("host-to-guest") => ReviewKind::HostToGuest,
            _ => ReviewKind::GuestToHost,
        };

        let category_scores = raw
            .review_category
            .unwrap_or_default()
            .into_iter()
            .map(|c| ReviewCategoryScore::new(c.category, c.rating))
            .collect();

        NewReview {
            id: raw.id.into_string(),
            kind,
            status: raw.status.unwrap_or_default(),
            raw_rating: raw.rating,
            text: raw.public_review.unwrap_or_default(),
            category_scores,
            submitted_at: raw
                .submitted_at
                .as_deref()
                .map(parse_timestamp)
                .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
            guest_name: raw.guest_name.unwrap_or_default(),
            listing_name: raw.listing_name.unwrap_or_default(),
            provider_name: PROVIDER,
        }
        .into()
    }
}

/// Hostaway 評論列表。一次帶驗證標頭的 GET；任何非成功回應或格式錯誤都是 ProviderUnavailable。
pub struct HostawayAdapter {
    config: HostawayConfig,
    client: Client,
}

impl HostawayAdapter {
    pub fn new(config: HostawayConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: HostawayConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn unavailable(reason: impl Into<String>) -> GatewayError {
        GatewayError::provider_unavailable(PROVIDER.as_str(), reason)
    }

    fn normalize(body: &str) -> Result<Vec<Review>> {
        let payload: HostawayPayload = serde_json::from_str(body)
            .map_err(|e| Self::unavailable(format!("unexpected payload: {}", e)))?;

        Ok(payload.result.into_iter().map(Review::from).collect())
    }
}

#[async_trait]
impl ReviewSource for HostawayAdapter {
    fn name(&self) -> ProviderName {
        PROVIDER
    }

    async fn fetch(&self) -> Result<Vec<Review>> {
        tracing::debug!("Making Hostaway request to: {}", self.config.endpoint);

        let mut request = self
            .client
            .get(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .header("X-Account-ID", &self.config.account_id)
            .header("X-API-Key", &self.config.api_key);

        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!("Hostaway response status: {}", status);
        if !status.is_success() {
            return Err(Self::unavailable(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::unavailable(format!("failed to read body: {}", e)))?;

        Self::normalize(&body)
    }
}
