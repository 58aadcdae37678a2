use crate::errors::NetsweepError;

/// Error reported by a provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Resource '{id}' not found")]
    NotFound { id: String },

    #[error("Dependency violation on '{id}': {message}")]
    DependencyViolation { id: String, message: String },

    #[error("Provider API error ({code}): {message}")]
    Api { code: String, message: String },
}

impl ProviderError {
    pub fn api(code: &str, message: impl Into<String>) -> Self {
        ProviderError::Api {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl NetsweepError for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            ProviderError::NotFound { .. } => "PROVIDER_NOT_FOUND",
            ProviderError::DependencyViolation { .. } => "PROVIDER_DEPENDENCY_VIOLATION",
            ProviderError::Api { .. } => "PROVIDER_API_ERROR",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Failed to read inventory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl NetsweepError for InventoryError {
    fn error_code(&self) -> &'static str {
        match self {
            InventoryError::Io { .. } => "INVENTORY_IO_ERROR",
            InventoryError::Parse { .. } => "INVENTORY_PARSE_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let error = ProviderError::DependencyViolation {
            id: "rtb-1".to_string(),
            message: "route table has dependencies".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Dependency violation on 'rtb-1': route table has dependencies"
        );
        assert_eq!(error.error_code(), "PROVIDER_DEPENDENCY_VIOLATION");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_api_error_helper() {
        let error = ProviderError::api("Throttling", "rate exceeded");
        assert_eq!(error.to_string(), "Provider API error (Throttling): rate exceeded");
    }
}
