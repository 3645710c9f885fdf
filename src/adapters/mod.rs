// Adapters layer: concrete implementations for external systems (review providers, storage, moderation store).

pub mod google;
pub mod hostaway;
pub mod publication;
pub mod storage;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// 解析供應商時間：RFC 3339 或 "YYYY-MM-DD HH:MM:SS"（UTC）。
/// 無法解析時回傳 Unix epoch，該筆資料仍保留並排在最後。
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_utc_datetime(&naive);
    }
    tracing::debug!("Unparseable provider timestamp: {:?}", raw);
    DateTime::<Utc>::UNIX_EPOCH
}
