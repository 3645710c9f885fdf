use crate::domain::model::ReviewCategoryScore;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// 分項平均，四捨五入到小數一位（遠離零）。空序列回傳 0。
pub fn calculate_rating(category_scores: &[ReviewCategoryScore]) -> f64 {
    if category_scores.is_empty() {
        return 0.0;
    }

    let sum: f64 = category_scores.iter().map(|c| c.score).sum();
    let mean = sum / category_scores.len() as f64;
    if !mean.is_finite() {
        return 0.0;
    }

    round_one_decimal(mean).clamp(MIN_RATING, MAX_RATING)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
