use thiserror::Error;

/// Startup and infrastructure errors shared across services.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_internal() {
        let err = AppError::from(std::io::Error::other("address in use"));
        assert!(matches!(err, AppError::InternalError(_)));
        assert_eq!(err.to_string(), "Internal server error: address in use");
    }

    #[test]
    fn config_errors_keep_their_message() {
        let err = AppError::from(config::ConfigError::Message("bad port".to_string()));
        assert_eq!(err.to_string(), "Configuration error: bad port");
    }
}
