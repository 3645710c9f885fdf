use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::rating::round_one_decimal;
use crate::domain::model::{ProviderName, Review};

/// 管理介面摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total: usize,
    pub average_rating: f64,
    pub published_count: usize,
    pub per_provider: BTreeMap<ProviderName, usize>,
}

impl ReviewStats {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut per_provider = BTreeMap::new();
        for review in reviews {
            *per_provider.entry(review.provider_name).or_insert(0) += 1;
        }

        Self {
            total: reviews.len(),
            average_rating: average_rating(reviews).unwrap_or(0.0),
            published_count: reviews.iter().filter(|r| r.is_published).count(),
            per_provider,
        }
    }
}

/// 公開房源頁：只含已公開、屬於該房源的評論
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub listing_name: String,
    pub average_rating: Option<f64>,
    pub reviews: Vec<Review>,
}

pub fn published_for_listing(reviews: &[Review], listing_name: &str) -> ListingView {
    let reviews: Vec<Review> = reviews
        .iter()
        .filter(|r| r.is_published && r.listing_name == listing_name)
        .cloned()
        .collect();

    ListingView {
        listing_name: listing_name.to_string(),
        average_rating: average_rating(&reviews),
        reviews,
    }
}

fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: f64 = reviews.iter().map(|r| r.calculated_rating).sum();
    Some(round_one_decimal(sum / reviews.len() as f64))
}
