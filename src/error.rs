use crate::config::ConfigError;
use crate::report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Output error: {0}")]
    Output(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::Output(err.to_string())
    }
}

impl AppError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Output(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: AppError = ConfigError::MissingEnv("RPC_URL".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: RPC_URL"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_report_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = ReportError::from(io).into();
        assert!(matches!(err, AppError::Output(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
