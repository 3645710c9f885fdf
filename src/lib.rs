pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::publication::{FilePublicationStore, InMemoryPublicationStore};
pub use crate::adapters::storage::LocalStorage;
pub use crate::app::gateway::ReviewGateway;
pub use crate::config::GatewayConfig;
pub use crate::core::aggregator::Aggregator;
pub use crate::domain::model::{ProviderName, Review, ReviewCategoryScore, ReviewKind};
pub use crate::utils::error::{GatewayError, Result};
