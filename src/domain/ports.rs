use crate::domain::model::{ProviderName, PublicationSnapshot, Review};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use tokio::sync::watch;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// 外部評論來源。任何問題都以 `GatewayError::ProviderUnavailable` 回報。
#[async_trait]
pub trait ReviewSource: Send + Sync {
    fn name(&self) -> ProviderName;
    async fn fetch(&self) -> Result<Vec<Review>>;
}

/// 審核旗標的持久化儲存，含即時訂閱
#[async_trait]
pub trait PublicationStateStore: Send + Sync {
    /// 冪等 upsert
    async fn set_published(&self, id: &str, value: bool) -> Result<()>;

    async fn snapshot(&self) -> Result<PublicationSnapshot>;

    fn subscribe(&self) -> SnapshotStream;
}

/// 每次任何項目變動時送出完整快照
pub struct SnapshotStream {
    rx: watch::Receiver<PublicationSnapshot>,
}

impl SnapshotStream {
    pub fn new(rx: watch::Receiver<PublicationSnapshot>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> PublicationSnapshot {
        self.rx.borrow().clone()
    }

    /// 等待下一個快照。儲存端關閉時回傳錯誤。
    pub async fn changed(&mut self) -> Result<PublicationSnapshot> {
        self.rx
            .changed()
            .await
            .map_err(|_| GatewayError::StoreError {
                message: "publication store closed".to_string(),
            })?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
