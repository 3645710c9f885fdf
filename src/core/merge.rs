use crate::domain::model::{PublicationSnapshot, Review};

/// 依快照覆寫 `is_published`。快照中沒有的 id 一律為 false。
pub fn merge_publication(reviews: &[Review], snapshot: &PublicationSnapshot) -> Vec<Review> {
    reviews
        .iter()
        .map(|review| Review {
            is_published: snapshot.get(&review.id).copied().unwrap_or(false),
            ..review.clone()
        })
        .collect()
}
