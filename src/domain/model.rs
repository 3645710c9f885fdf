use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::rating::calculate_rating;

/// 單一分項評分（0–10）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCategoryScore {
    pub category: String,
    pub score: f64,
}

impl ReviewCategoryScore {
    pub fn new(category: impl Into<String>, score: f64) -> Self {
        Self {
            category: category.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewKind {
    #[serde(rename = "guest-to-host")]
    GuestToHost,
    #[serde(rename = "host-to-guest")]
    HostToGuest,
}

/// 評論來源的標準標籤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderName {
    Hostaway,
    Google,
    Direct,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Hostaway => "Hostaway",
            ProviderName::Google => "Google",
            ProviderName::Direct => "Direct",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 標準化評論。`calculated_rating` 於正規化時計算一次，
/// `is_published` 只由合併階段覆寫。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ReviewKind,
    pub status: String,
    pub raw_rating: Option<f64>,
    pub text: String,
    pub category_scores: Vec<ReviewCategoryScore>,
    pub submitted_at: DateTime<Utc>,
    pub guest_name: String,
    pub listing_name: String,
    pub provider_name: ProviderName,
    pub calculated_rating: f64,
    pub is_published: bool,
}

/// 轉接器產出的草稿，尚未帶衍生欄位
#[derive(Debug, Clone)]
pub struct NewReview {
    pub id: String,
    pub kind: ReviewKind,
    pub status: String,
    pub raw_rating: Option<f64>,
    pub text: String,
    pub category_scores: Vec<ReviewCategoryScore>,
    pub submitted_at: DateTime<Utc>,
    pub guest_name: String,
    pub listing_name: String,
    pub provider_name: ProviderName,
}

impl From<NewReview> for Review {
    fn from(draft: NewReview) -> Self {
        let calculated_rating = draft
            .raw_rating
            .unwrap_or_else(|| calculate_rating(&draft.category_scores));

        Review {
            id: draft.id,
            kind: draft.kind,
            status: draft.status,
            raw_rating: draft.raw_rating,
            text: draft.text,
            category_scores: draft.category_scores,
            submitted_at: draft.submitted_at,
            guest_name: draft.guest_name,
            listing_name: draft.listing_name,
            provider_name: draft.provider_name,
            calculated_rating,
            is_published: false,
        }
    }
}

/// 審核旗標快照：review id -> 是否公開
pub type PublicationSnapshot = BTreeMap<String, bool>;
