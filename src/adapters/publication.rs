use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use crate::core::{PublicationSnapshot, PublicationStateStore, SnapshotStream, Storage};
use crate::utils::error::{GatewayError, Result};

/// 記憶體內的審核旗標儲存（測試與單機執行用）
pub struct InMemoryPublicationStore {
    tx: watch::Sender<PublicationSnapshot>,
}

impl InMemoryPublicationStore {
    pub fn new() -> Self {
        Self::with_snapshot(PublicationSnapshot::new())
    }

    pub fn with_snapshot(initial: PublicationSnapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }
}

impl Default for InMemoryPublicationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PublicationStateStore for InMemoryPublicationStore {
    async fn set_published(&self, id: &str, value: bool) -> Result<()> {
        // 值沒變就不通知訂閱者
        self.tx
            .send_if_modified(|map| map.insert(id.to_string(), value) != Some(value));
        Ok(())
    }

    async fn snapshot(&self) -> Result<PublicationSnapshot> {
        Ok(self.tx.borrow().clone())
    }

    fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.tx.subscribe())
    }
}

/// 以 JSON 檔持久化的審核旗標儲存：`<collection>.json`
pub struct FilePublicationStore<S: Storage> {
    storage: S,
    file_name: String,
    tx: watch::Sender<PublicationSnapshot>,
    // 序列化寫入，確保檔案與快照的歷史一致
    write_lock: Mutex<()>,
}

impl<S: Storage> FilePublicationStore<S> {
    pub async fn open(storage: S, collection: &str) -> Result<Self> {
        let file_name = format!("{}.json", collection);

        let initial = if storage.exists(&file_name).await {
            let data = storage.read_file(&file_name).await?;
            serde_json::from_slice::<PublicationSnapshot>(&data).map_err(|e| {
                GatewayError::StoreError {
                    message: format!("corrupt publication state in {}: {}", file_name, e),
                }
            })?
        } else {
            PublicationSnapshot::new()
        };

        tracing::info!(
            "📂 Publication store opened: {} ({} entries)",
            file_name,
            initial.len()
        );

        let (tx, _rx) = watch::channel(initial);
        Ok(Self {
            storage,
            file_name,
            tx,
            write_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl<S: Storage> PublicationStateStore for FilePublicationStore<S> {
    async fn set_published(&self, id: &str, value: bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut next = self.tx.borrow().clone();
        if next.insert(id.to_string(), value) == Some(value) {
            return Ok(());
        }

        let data = serde_json::to_vec_pretty(&next)?;
        self.storage.write_file(&self.file_name, &data).await?;

        tracing::debug!(id = %id, value, "Publication flag persisted");
        self.tx.send_replace(next);
        Ok(())
    }

    async fn snapshot(&self) -> Result<PublicationSnapshot> {
        Ok(self.tx.borrow().clone())
    }

    fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.tx.subscribe())
    }
}
