use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZoneError {
    #[error("Missing required columns for '{focus}': {}", missing.join(", "))]
    MissingColumns { focus: String, missing: Vec<String> },

    #[error("Data source error: {message}")]
    DataSource { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown grade level '{level}' (available: {})", available.join(", "))]
    UnknownLevel { level: String, available: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    DataSource,
    Input,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ZoneError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ZoneError::ConfigError { .. }
            | ZoneError::ConfigValidationError { .. }
            | ZoneError::InvalidConfigValueError { .. }
            | ZoneError::MissingConfigError { .. }
            | ZoneError::UnknownLevel { .. } => ErrorCategory::Configuration,
            ZoneError::DataSource { .. } | ZoneError::Http(_) => ErrorCategory::DataSource,
            ZoneError::MissingColumns { .. } | ZoneError::Csv(_) => ErrorCategory::Input,
            ZoneError::Serialization(_) | ZoneError::Zip(_) => ErrorCategory::Output,
            ZoneError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // A network hiccup is worth retrying
            ZoneError::Http(_) | ZoneError::DataSource { .. } => ErrorSeverity::Medium,
            ZoneError::MissingColumns { .. } | ZoneError::Csv(_) => ErrorSeverity::High,
            ZoneError::ConfigError { .. }
            | ZoneError::ConfigValidationError { .. }
            | ZoneError::InvalidConfigValueError { .. }
            | ZoneError::MissingConfigError { .. }
            | ZoneError::UnknownLevel { .. } => ErrorSeverity::High,
            ZoneError::Serialization(_) | ZoneError::Zip(_) => ErrorSeverity::High,
            ZoneError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ZoneError::MissingColumns { focus, missing } => format!(
                "Required columns ({}) not found in the data for {}",
                missing.join(", "),
                focus
            ),
            ZoneError::DataSource { message } => {
                format!("Could not load student data: {}", message)
            }
            ZoneError::Http(e) => format!("Could not reach the spreadsheet service: {}", e),
            ZoneError::Csv(e) => format!("The student table could not be read: {}", e),
            ZoneError::UnknownLevel { level, .. } => {
                format!("Grade level '{}' is not configured", level)
            }
            ZoneError::Io(e) => format!("File system error: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => match self {
                ZoneError::UnknownLevel { available, .. } => {
                    format!("Choose one of: {}", available.join(", "))
                }
                _ => "Check the TOML configuration file and command line arguments".to_string(),
            },
            ErrorCategory::DataSource => {
                "Check the network connection, the spreadsheet id and that the worksheet is shared"
                    .to_string()
            }
            ErrorCategory::Input => {
                "Make sure the worksheet has PERSON_ID, STEM_AVG and LANGUAGE_AVG header cells"
                    .to_string()
            }
            ErrorCategory::Output => "Check the output settings and try again".to_string(),
            ErrorCategory::System => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;
