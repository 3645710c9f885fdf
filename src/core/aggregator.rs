use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::core::fallback::FallbackSynthesizer;
use crate::domain::model::{ProviderName, Review};
use crate::domain::ports::ReviewSource;
use crate::utils::error::GatewayError;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderOutcome {
    Succeeded { count: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderReport {
    pub provider: ProviderName,
    pub outcome: ProviderOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregationReport {
    pub reviews: Vec<Review>,
    pub providers: Vec<ProviderReport>,
    pub used_fallback: bool,
}

/// 併發呼叫所有來源，吸收個別失敗，必要時改用替代資料
pub struct Aggregator {
    sources: Vec<Arc<dyn ReviewSource>>,
    fallback: Option<FallbackSynthesizer>,
    provider_timeout: Duration,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn ReviewSource>>, fallback: FallbackSynthesizer) -> Self {
        Self {
            sources,
            fallback: Some(fallback),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// 停用替代資料，空結果會原樣回傳（僅供診斷）
    pub fn without_fallback(mut self) -> Self {
        self.fallback = None;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub async fn aggregate(&self) -> Vec<Review> {
        self.aggregate_with_report().await.reviews
    }

    pub async fn aggregate_with_report(&self) -> AggregationReport {
        tracing::debug!("📡 Fetching reviews from {} provider(s)", self.sources.len());

        let fetches = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let timeout = self.provider_timeout;
            async move {
                let provider = source.name();
                let result = match tokio::time::timeout(timeout, source.fetch()).await {
                    Ok(result) => result,
                    Err(_) => Err(GatewayError::provider_unavailable(
                        provider.as_str(),
                        format!("timed out after {}s", timeout.as_secs_f64()),
                    )),
                };
                (provider, result)
            }
        });

        // join_all 保持宣告順序，不因單一失敗而中止
        let outcomes = join_all(fetches).await;

        let mut reviews = Vec::new();
        let mut providers = Vec::with_capacity(outcomes.len());
        for (provider, result) in outcomes {
            match result {
                Ok(mut batch) => {
                    tracing::info!(provider = %provider, count = batch.len(), "✅ Provider fetch succeeded");
                    providers.push(ProviderReport {
                        provider,
                        outcome: ProviderOutcome::Succeeded { count: batch.len() },
                    });
                    reviews.append(&mut batch);
                }
                Err(e) => {
                    let reason = match e {
                        GatewayError::ProviderUnavailable { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    tracing::warn!(provider = %provider, reason = %reason, "⚠️ Provider unavailable");
                    providers.push(ProviderReport {
                        provider,
                        outcome: ProviderOutcome::Failed { reason },
                    });
                }
            }
        }

        let mut used_fallback = false;
        if reviews.is_empty() {
            if let Some(fallback) = &self.fallback {
                tracing::warn!(
                    "No reviews from any provider, serving {} synthesized reviews",
                    fallback.target_count()
                );
                reviews = fallback.synthesize();
                used_fallback = true;
            }
        }

        sort_by_submitted_desc(&mut reviews);

        AggregationReport {
            reviews,
            providers,
            used_fallback,
        }
    }
}

/// 依 `submitted_at` 由新到舊排序；穩定排序，同時間保持輸入順序
pub fn sort_by_submitted_desc(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}
