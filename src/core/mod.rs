pub mod aggregator;
pub mod fallback;
pub mod merge;
pub mod rating;
pub mod stats;

pub use crate::domain::model::{NewReview, PublicationSnapshot, Review, ReviewCategoryScore};
pub use crate::domain::ports::{PublicationStateStore, ReviewSource, SnapshotStream, Storage};
pub use crate::utils::error::Result;
