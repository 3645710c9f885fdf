use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Publication store error: {message}")]
    StoreError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Provider,
    Configuration,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GatewayError {
    pub fn provider_unavailable(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        GatewayError::ProviderUnavailable {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::ApiError(_) => ErrorCategory::Network,
            GatewayError::ProviderUnavailable { .. } => ErrorCategory::Provider,
            GatewayError::ConfigError { .. }
            | GatewayError::MissingConfigError { .. }
            | GatewayError::InvalidConfigValueError { .. }
            | GatewayError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            GatewayError::IoError(_) | GatewayError::StoreError { .. } => ErrorCategory::Storage,
            GatewayError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 供應商失敗屬於預期情況，會由聚合器吸收
            ErrorCategory::Provider => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Provider
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GatewayError::ApiError(_) => {
                "Check network connectivity and the provider endpoint".to_string()
            }
            GatewayError::ProviderUnavailable { provider, .. } => format!(
                "Verify the {} credentials; fallback data is served meanwhile",
                provider
            ),
            GatewayError::MissingConfigError { field } => {
                format!("Set `{}` in the environment or the TOML config", field)
            }
            GatewayError::InvalidConfigValueError { field, .. }
            | GatewayError::ConfigValidationError { field, .. } => {
                format!("Fix the value of `{}`", field)
            }
            GatewayError::ConfigError { .. } => "Review the gateway configuration".to_string(),
            GatewayError::IoError(_) | GatewayError::StoreError { .. } => {
                "Check that the publication store path is writable".to_string()
            }
            GatewayError::SerializationError(_) => {
                "The stored data is corrupt; remove or repair the file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Provider => format!("A review provider is unavailable: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
            ErrorCategory::Data => format!("Data problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
