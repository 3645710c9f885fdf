#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::fallback::{DEFAULT_TARGET_COUNT, DEFAULT_WINDOW_DAYS};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_collection_name, validate_credential, validate_endpoint, validate_fallback_size,
    validate_place_ids, validate_store_dir, validate_timeout, Validate,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

pub const DEFAULT_HOSTAWAY_ENDPOINT: &str = "https://api.hostaway.com/v1/reviews";
pub const DEFAULT_GOOGLE_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/details/json";
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_STORE_COLLECTION: &str = "flex_reviews";
const PLACE_TIMEOUT_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub hostaway: Option<HostawayConfig>,
    pub google: Option<GoogleConfig>,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostawayConfig {
    pub account_id: String,
    pub api_key: String,
    #[serde(default = "default_hostaway_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    #[serde(default, deserialize_with = "deserialize_place_ids")]
    pub place_ids: Vec<String>,
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// 狀態檔所在目錄；未設定時使用記憶體儲存
    pub path: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_count: DEFAULT_TARGET_COUNT,
            window_days: DEFAULT_WINDOW_DAYS,
            seed: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            collection: default_collection(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            hostaway: None,
            google: None,
            fallback: FallbackConfig::default(),
            store: StoreConfig::default(),
            provider_timeout_seconds: DEFAULT_PROVIDER_TIMEOUT_SECONDS,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_target_count() -> usize {
    DEFAULT_TARGET_COUNT
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_collection() -> String {
    DEFAULT_STORE_COLLECTION.to_string()
}

fn default_provider_timeout() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECONDS
}

fn default_hostaway_endpoint() -> String {
    DEFAULT_HOSTAWAY_ENDPOINT.to_string()
}

fn default_google_endpoint() -> String {
    DEFAULT_GOOGLE_ENDPOINT.to_string()
}

/// place_ids 可寫成 "A,B" 或 ["A", "B"]
fn deserialize_place_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PlaceIds {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match PlaceIds::deserialize(deserializer)? {
        PlaceIds::Joined(s) => split_place_ids(&s),
        PlaceIds::List(list) => clean_list(list),
    })
}

pub fn split_place_ids(raw: &str) -> Vec<String> {
    clean_list(raw.split(',').map(str::to_string).collect())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 空白或未替換的 `${VAR}` 視為未設定
fn is_absent(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || (v.starts_with("${") && v.ends_with('}'))
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 從任意 key/value 來源讀取設定（方便測試）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !is_absent(v));
        let get_u64 = |key: &str| get(key).and_then(|v| v.trim().parse::<u64>().ok());

        let hostaway = match (get("HOSTAWAY_ACCOUNT_ID"), get("HOSTAWAY_API_KEY")) {
            (Some(account_id), Some(api_key)) => Some(HostawayConfig {
                account_id,
                api_key,
                endpoint: get("HOSTAWAY_ENDPOINT").unwrap_or_else(default_hostaway_endpoint),
                timeout_seconds: None,
            }),
            _ => None,
        };

        let google = get("GOOGLE_API_KEY").map(|api_key| GoogleConfig {
            api_key,
            place_ids: get("GOOGLE_PLACE_IDS")
                .map(|raw| split_place_ids(&raw))
                .unwrap_or_default(),
            endpoint: get("GOOGLE_ENDPOINT").unwrap_or_else(default_google_endpoint),
            timeout_seconds: None,
        });

        let mut fallback = FallbackConfig {
            seed: get_u64("FALLBACK_SEED"),
            ..FallbackConfig::default()
        };
        if let Some(count) = get_u64("FALLBACK_TARGET_COUNT") {
            fallback.target_count = count as usize;
        }

        Self {
            hostaway,
            google,
            fallback,
            store: StoreConfig {
                path: get("PUBLICATION_STORE_PATH"),
                collection: get("PUBLICATION_STORE_COLLECTION").unwrap_or_else(default_collection),
            },
            provider_timeout_seconds: get_u64("PROVIDER_TIMEOUT_SECONDS")
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        }
    }

    /// 去除缺少憑證的供應商設定，整理 place id
    pub fn normalized(mut self) -> Self {
        self.hostaway = self
            .hostaway
            .filter(|h| !is_absent(&h.account_id) && !is_absent(&h.api_key));
        self.google = self.google.filter(|g| !is_absent(&g.api_key)).map(|mut g| {
            g.place_ids = clean_list(g.place_ids).into_iter().filter(|p| !is_absent(p)).collect();
            g
        });
        self.store.path = self.store.path.filter(|p| !is_absent(p));
        self
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }
}

impl GoogleConfig {
    /// 單一 place 的期限，一定短於整個供應商的期限，
    /// 否則一個卡住的 place 會連同其他 place 的結果一起被取消
    pub fn place_timeout(&self, provider_timeout: Duration) -> Duration {
        let ceiling = provider_timeout.mul_f64(PLACE_TIMEOUT_RATIO);
        match self.timeout_seconds {
            Some(seconds) => Duration::from_secs(seconds).min(ceiling),
            None => ceiling,
        }
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        validate_timeout("provider_timeout_seconds", self.provider_timeout_seconds)?;

        if let Some(hostaway) = &self.hostaway {
            validate_endpoint("hostaway.endpoint", &hostaway.endpoint)?;
            validate_credential("hostaway.account_id", &hostaway.account_id)?;
            validate_credential("hostaway.api_key", &hostaway.api_key)?;
            if let Some(timeout) = hostaway.timeout_seconds {
                validate_timeout("hostaway.timeout_seconds", timeout)?;
            }
        }

        if let Some(google) = &self.google {
            validate_endpoint("google.endpoint", &google.endpoint)?;
            validate_credential("google.api_key", &google.api_key)?;
            validate_place_ids("google.place_ids", &google.place_ids)?;
            if let Some(timeout) = google.timeout_seconds {
                validate_timeout("google.timeout_seconds", timeout)?;
            }
        }

        validate_fallback_size(self.fallback.target_count, self.fallback.window_days)?;

        if let Some(path) = &self.store.path {
            validate_store_dir("store.path", path)?;
        }
        validate_collection_name("store.collection", &self.store.collection)?;

        tracing::debug!("✅ Gateway configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_disables_all_providers() {
        let config = GatewayConfig::from_lookup(lookup(&[]));
        assert!(config.hostaway.is_none());
        assert!(config.google.is_none());
        assert_eq!(config.fallback.target_count, 45);
        assert_eq!(config.provider_timeout_seconds, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_environment() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("HOSTAWAY_ACCOUNT_ID", "61148"),
            ("HOSTAWAY_API_KEY", "secret"),
            ("GOOGLE_API_KEY", "gkey"),
            ("GOOGLE_PLACE_IDS", " A, ,B ,"),
            ("PROVIDER_TIMEOUT_SECONDS", "5"),
            ("FALLBACK_SEED", "42"),
        ]));

        let hostaway = config.hostaway.as_ref().unwrap();
        assert_eq!(hostaway.account_id, "61148");
        assert_eq!(hostaway.endpoint, DEFAULT_HOSTAWAY_ENDPOINT);

        let google = config.google.as_ref().unwrap();
        assert_eq!(google.place_ids, vec!["A".to_string(), "B".to_string()]);

        assert_eq!(config.provider_timeout(), Duration::from_secs(5));
        assert_eq!(config.fallback.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_half_configured_hostaway_is_absent() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("HOSTAWAY_ACCOUNT_ID", "61148"),
            ("HOSTAWAY_API_KEY", "   "),
        ]));
        assert!(config.hostaway.is_none());
    }

    #[test]
    fn test_unsafe_collection_fails_validation() {
        let mut config = GatewayConfig::default();
        config.store.collection = "../flex".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_place_timeout_stays_below_provider_timeout() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "gkey"),
            ("GOOGLE_PLACE_IDS", "A,B"),
            ("PROVIDER_TIMEOUT_SECONDS", "2"),
        ]));
        let google = config.google.as_ref().unwrap();
        assert_eq!(google.timeout_seconds, None);

        let provider = config.provider_timeout();
        assert_eq!(google.place_timeout(provider), Duration::from_millis(1600));

        let configured = GoogleConfig {
            timeout_seconds: Some(1),
            ..google.clone()
        };
        assert_eq!(configured.place_timeout(provider), Duration::from_secs(1));

        let too_long = GoogleConfig {
            timeout_seconds: Some(30),
            ..google.clone()
        };
        assert!(too_long.place_timeout(provider) < provider);
    }

    #[test]
    fn test_invalid_timeout_fails_validation() {
        let config = GatewayConfig {
            provider_timeout_seconds: 0,
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
