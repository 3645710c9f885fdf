use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::{GoogleConfig, DEFAULT_PROVIDER_TIMEOUT_SECONDS};
use crate::domain::model::{NewReview, ProviderName, Review, ReviewKind};
use crate::domain::ports::ReviewSource;
use crate::utils::error::{GatewayError, Result};

const PROVIDER: ProviderName = ProviderName::Google;
const FIELDS: &str = "name,reviews";

#[derive(Debug, Deserialize)]
struct PlaceDetailsPayload {
    result: PlaceDetails,
}

#[derive(Debug, Deserialize)]
struct PlaceDetails {
    name: String,
    #[serde(default)]
    reviews: Vec<PlaceReview>,
}

#[derive(Debug, Deserialize)]
struct PlaceReview {
    #[serde(default)]
    author_name: String,
    rating: f64,
    #[serde(default)]
    text: String,
    time: i64,
}

/// Google 地點評論。每個 place id 獨立抓取，單一 id 失敗只會跳過該 id。
pub struct GoogleAdapter {
    config: GoogleConfig,
    client: Client,
    place_timeout: Duration,
}

impl GoogleAdapter {
    pub fn new(config: GoogleConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: GoogleConfig, client: Client) -> Self {
        let place_timeout =
            config.place_timeout(Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECONDS));
        Self {
            config,
            client,
            place_timeout,
        }
    }

    /// 依整個供應商的期限重新計算單一 place 的期限
    pub fn with_provider_timeout(mut self, provider_timeout: Duration) -> Self {
        self.place_timeout = self.config.place_timeout(provider_timeout);
        self
    }

    async fn fetch_place_with_deadline(&self, place_id: &str) -> Result<Vec<Review>> {
        match tokio::time::timeout(self.place_timeout, self.fetch_place(place_id)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::provider_unavailable(
                PROVIDER.as_str(),
                format!(
                    "place {} timed out after {}s",
                    place_id,
                    self.place_timeout.as_secs_f64()
                ),
            )),
        }
    }

    async fn fetch_place(&self, place_id: &str) -> Result<Vec<Review>> {
        let unavailable =
            |reason: String| GatewayError::provider_unavailable(PROVIDER.as_str(), reason);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("place_id", place_id),
                ("fields", FIELDS),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(format!("failed to read body: {}", e)))?;

        let payload: PlaceDetailsPayload = serde_json::from_str(&body)
            .map_err(|e| unavailable(format!("unexpected payload: {}", e)))?;

        Ok(normalize_place(place_id, payload.result))
    }
}

fn normalize_place(place_id: &str, place: PlaceDetails) -> Vec<Review> {
    let listing_name = place.name;

    place
        .reviews
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            NewReview {
                // 相同資料重抓時 id 保持穩定
                id: format!("google-{}-{}-{}", place_id, index, raw.time),
                kind: ReviewKind::GuestToHost,
                status: "published".to_string(),
                raw_rating: Some(raw.rating),
                text: raw.text,
                category_scores: Vec::new(),
                submitted_at: DateTime::<Utc>::from_timestamp(raw.time, 0)
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                guest_name: raw.author_name,
                listing_name: listing_name.clone(),
                provider_name: PROVIDER,
            }
            .into()
        })
        .collect()
}

#[async_trait]
impl ReviewSource for GoogleAdapter {
    fn name(&self) -> ProviderName {
        PROVIDER
    }

    async fn fetch(&self) -> Result<Vec<Review>> {
        // 未設定 Google 整合是合法狀態，不算失敗
        if self.config.api_key.trim().is_empty() || self.config.place_ids.is_empty() {
            tracing::debug!("Google integration not configured, skipping");
            return Ok(Vec::new());
        }

        let fetches = self
            .config
            .place_ids
            .iter()
            .map(|place_id| async move {
                (place_id, self.fetch_place_with_deadline(place_id).await)
            });

        let mut reviews = Vec::new();
        for (place_id, result) in join_all(fetches).await {
            match result {
                Ok(mut batch) => {
                    tracing::debug!(place_id = %place_id, count = batch.len(), "Google place fetched");
                    reviews.append(&mut batch);
                }
                Err(e) => {
                    tracing::warn!(place_id = %place_id, error = %e, "⚠️ Skipping Google place");
                }
            }
        }

        Ok(reviews)
    }
}
