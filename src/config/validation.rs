use std::net::SocketAddr;

use crate::config::models::EngineConfig;

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone)]
pub enum ValidationError {
    #[error("Invalid listen address '{address}': {reason}")]
    InvalidListenAddress { address: String, reason: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

/// Engine configuration validator
pub struct EngineConfigValidator;

impl EngineConfigValidator {
    /// Validate the entire configuration
    pub fn validate(config: &EngineConfig) -> ValidationResult<()> {
        Self::validate_listen_address(&config.listen_addr)?;
        Self::validate_base_url(config.base_url.as_deref())?;
        Ok(())
    }

    fn validate_listen_address(address: &str) -> ValidationResult<()> {
        address
            .parse::<SocketAddr>()
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidListenAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    fn validate_base_url(base_url: Option<&str>) -> ValidationResult<()> {
        match base_url {
            None => Ok(()),
            Some(url) if url.starts_with('/') || url.contains("://") => Ok(()),
            Some(url) => Err(ValidationError::InvalidField {
                field: "base_url".to_string(),
                message: format!("'{url}' must be an absolute path or a full URL"),
            }),
        }
    }
}
