use crate::utils::error::{GatewayError, Result};
use regex::Regex;
use std::path::Path;
use url::Url;

pub const MAX_TIMEOUT_SECONDS: u64 = 300;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> GatewayError {
    GatewayError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 供應商端點必須是 http(s) 絕對網址
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| invalid(field, endpoint, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field,
            endpoint,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_credential(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        // 不回顯憑證內容
        return Err(invalid(field, "", "Credential cannot be empty"));
    }
    Ok(())
}

pub fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
        return Err(invalid(
            field,
            seconds,
            format!("Timeout must be between 1 and {} seconds", MAX_TIMEOUT_SECONDS),
        ));
    }
    Ok(())
}

/// place id 會放進查詢字串與評論 id，不允許空白或逗號
pub fn validate_place_ids(field: &str, place_ids: &[String]) -> Result<()> {
    for id in place_ids {
        if id.is_empty() || id.contains(|c: char| c.is_whitespace() || c == ',') {
            return Err(invalid(field, id, "Place id cannot contain whitespace or commas"));
        }
    }
    Ok(())
}

pub fn validate_fallback_size(target_count: usize, window_days: u32) -> Result<()> {
    if target_count == 0 {
        return Err(invalid(
            "fallback.target_count",
            target_count,
            "Fallback must produce at least one review",
        ));
    }
    if window_days == 0 {
        return Err(invalid(
            "fallback.window_days",
            window_days,
            "Fallback window must span at least one day",
        ));
    }
    Ok(())
}

/// 集合名稱即狀態檔檔名（`<collection>.json`）
pub fn validate_collection_name(field: &str, collection: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z0-9_-]+$").map_err(|e| GatewayError::ConfigError {
        message: format!("Invalid collection pattern: {}", e),
    })?;

    if !re.is_match(collection) {
        return Err(invalid(
            field,
            collection,
            "Collection name may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

/// 狀態目錄可以尚未存在，但不能是既有的檔案
pub fn validate_store_dir(field: &str, dir: &str) -> Result<()> {
    if dir.contains('\0') {
        return Err(invalid(field, dir, "Path contains null bytes"));
    }
    let path = Path::new(dir);
    if path.exists() && !path.is_dir() {
        return Err(invalid(field, dir, "Path exists but is not a directory"));
    }
    Ok(())
}
