use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::adapters::google::GoogleAdapter;
use crate::adapters::hostaway::HostawayAdapter;
use crate::adapters::publication::{FilePublicationStore, InMemoryPublicationStore};
use crate::adapters::storage::LocalStorage;
use crate::config::GatewayConfig;
use crate::core::aggregator::{AggregationReport, Aggregator};
use crate::core::fallback::FallbackSynthesizer;
use crate::core::merge::merge_publication;
use crate::core::{PublicationSnapshot, PublicationStateStore, Review, ReviewSource};
use crate::utils::error::{GatewayError, Result};

/// 依設定建立評論來源，缺少憑證的供應商不參與
pub fn build_sources(config: &GatewayConfig, client: &Client) -> Vec<Arc<dyn ReviewSource>> {
    let mut sources: Vec<Arc<dyn ReviewSource>> = Vec::new();

    if let Some(hostaway) = &config.hostaway {
        sources.push(Arc::new(HostawayAdapter::with_client(
            hostaway.clone(),
            client.clone(),
        )));
    } else {
        tracing::info!("Hostaway credentials absent, provider disabled");
    }

    if let Some(google) = &config.google {
        sources.push(Arc::new(
            GoogleAdapter::with_client(google.clone(), client.clone())
                .with_provider_timeout(config.provider_timeout()),
        ));
    } else {
        tracing::info!("Google credentials absent, provider disabled");
    }

    sources
}

pub fn build_aggregator(config: &GatewayConfig, client: &Client) -> Aggregator {
    let fallback = FallbackSynthesizer::new(
        config.fallback.target_count,
        config.fallback.window_days,
        config.fallback.seed,
    );

    let aggregator = Aggregator::new(build_sources(config, client), fallback)
        .with_provider_timeout(config.provider_timeout());

    if config.fallback.enabled {
        aggregator
    } else {
        aggregator.without_fallback()
    }
}

pub async fn build_store(config: &GatewayConfig) -> Result<Arc<dyn PublicationStateStore>> {
    match &config.store.path {
        Some(path) => {
            let store =
                FilePublicationStore::open(LocalStorage::new(path), &config.store.collection)
                    .await?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryPublicationStore::new())),
    }
}

/// 對外介面：取得合併審核旗標後的評論列表、切換公開狀態
pub struct ReviewGateway {
    aggregator: Aggregator,
    store: Arc<dyn PublicationStateStore>,
    last_seen: RwLock<Vec<Review>>,
    last_snapshot: RwLock<PublicationSnapshot>,
    merged_tx: watch::Sender<Vec<Review>>,
    // refresh 與快照監聽共用：更新 last_seen、合併、送出必須是一個整體
    publish_lock: Mutex<()>,
}

impl ReviewGateway {
    pub fn new(aggregator: Aggregator, store: Arc<dyn PublicationStateStore>) -> Self {
        let (merged_tx, _rx) = watch::channel(Vec::new());
        Self {
            aggregator,
            store,
            last_seen: RwLock::new(Vec::new()),
            last_snapshot: RwLock::new(PublicationSnapshot::new()),
            merged_tx,
            publish_lock: Mutex::new(()),
        }
    }

    pub async fn from_config(config: &GatewayConfig) -> Result<Self> {
        let client = Client::new();
        let store = build_store(config).await?;
        Ok(Self::new(build_aggregator(config, &client), store))
    }

    /// 重新聚合（每次呼叫都重新抓取），並以最新快照合併
    pub async fn refresh(&self) -> AggregationReport {
        let mut report = self.aggregator.aggregate_with_report().await;

        let _guard = self.publish_lock.lock().await;
        *self.last_seen.write().await = report.reviews.clone();
        let snapshot = self.current_snapshot().await;

        report.reviews = merge_publication(&report.reviews, &snapshot);
        self.merged_tx.send_replace(report.reviews.clone());
        report
    }

    /// 目前的聚合評論列表；永不失敗
    pub async fn reviews(&self) -> Vec<Review> {
        self.refresh().await.reviews
    }

    pub async fn set_published(&self, id: &str, value: bool) -> Result<()> {
        self.store.set_published(id, value).await
    }

    /// 切換公開狀態，只接受最近一次聚合結果中的 id。回傳新的狀態。
    pub async fn toggle_published(&self, id: &str) -> Result<bool> {
        let known = self.last_seen.read().await.iter().any(|r| r.id == id);
        if !known {
            return Err(GatewayError::StoreError {
                message: format!("review {} is not in the current review set", id),
            });
        }

        let current = self
            .current_snapshot()
            .await
            .get(id)
            .copied()
            .unwrap_or(false);
        self.store.set_published(id, !current).await?;
        tracing::info!(id = %id, published = !current, "Publication flag toggled");
        Ok(!current)
    }

    /// 合併後的即時檢視，每次快照變動或重新聚合時更新
    pub fn watch_reviews(&self) -> watch::Receiver<Vec<Review>> {
        self.merged_tx.subscribe()
    }

    /// 背景監聽快照：每個新快照只重新合併，不重新抓取供應商。
    /// 訂閱失敗時保留上一次的快照與檢視。
    pub fn spawn_snapshot_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let gateway = Arc::clone(self);
        let mut stream = gateway.store.subscribe();

        tokio::spawn(async move {
            loop {
                match stream.changed().await {
                    Ok(snapshot) => {
                        let _guard = gateway.publish_lock.lock().await;
                        let reviews = gateway.last_seen.read().await.clone();
                        let merged = merge_publication(&reviews, &snapshot);
                        *gateway.last_snapshot.write().await = snapshot;
                        gateway.merged_tx.send_replace(merged);
                        tracing::debug!("Moderation snapshot applied");
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Publication store subscription ended, keeping last snapshot"
                        );
                        break;
                    }
                }
            }
        })
    }

    async fn current_snapshot(&self) -> PublicationSnapshot {
        match self.store.snapshot().await {
            Ok(snapshot) => {
                *self.last_snapshot.write().await = snapshot.clone();
                snapshot
            }
            Err(e) => {
                tracing::error!(error = %e, "Publication store read failed, using last snapshot");
                self.last_snapshot.read().await.clone()
            }
        }
    }
}
