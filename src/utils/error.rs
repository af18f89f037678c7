use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing credential: environment variable {var} is not set")]
    MissingCredentialError { var: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid input at line {line}: {message}")]
    InputError { line: usize, message: String },

    #[error("Places service error: {message}")]
    PlacesError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EnrichError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EnrichError::MissingCredentialError { .. }
            | EnrichError::InvalidConfigValueError { .. }
            | EnrichError::ConfigError { .. }
            | EnrichError::TomlError(_) => ErrorCategory::Configuration,
            EnrichError::ApiError(_) | EnrichError::PlacesError { .. } => ErrorCategory::Network,
            EnrichError::SerializationError(_) | EnrichError::InputError { .. } => {
                ErrorCategory::Data
            }
            EnrichError::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單次請求失敗在管線內會被吸收，走到這裡代表可重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於單次請求層級、可在管線內恢復的錯誤
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Network
            || matches!(self, EnrichError::SerializationError(_))
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EnrichError::MissingCredentialError { .. } => {
                "Export GOOGLE_API_KEY with a valid Places API key before running"
            }
            EnrichError::InvalidConfigValueError { .. } | EnrichError::ConfigError { .. } => {
                "Check the command line arguments or the TOML configuration file"
            }
            EnrichError::TomlError(_) => "Fix the syntax of the TOML configuration file",
            EnrichError::ApiError(_) | EnrichError::PlacesError { .. } => {
                "Check network connectivity and the Places API quota, then rerun to resume"
            }
            EnrichError::InputError { .. } | EnrichError::SerializationError(_) => {
                "Make sure the input file contains one JSON object per line"
            }
            EnrichError::IoError(_) => {
                "Check that the input exists and the output directories are writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EnrichError::MissingCredentialError { var } => {
                format!("ERROR: set {} env var", var)
            }
            EnrichError::InputError { line, message } => {
                format!("Input file is malformed at line {}: {}", line, message)
            }
            EnrichError::IoError(e) => format!("File operation failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;
