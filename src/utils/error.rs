use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Malformed input: {message}")]
    MalformedInputError { message: String },

    #[error("No item at index {index} (list has {len} items)")]
    ItemIndexError { index: usize, len: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Usage,
}

impl ListError {
    pub fn malformed(message: impl Into<String>) -> Self {
        ListError::MalformedInputError {
            message: message.into(),
        }
    }

    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            ListError::MalformedInputError { .. } | ListError::SerializationError(_)
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ListError::CsvError(_)
            | ListError::SerializationError(_)
            | ListError::MalformedInputError { .. } => ErrorCategory::Input,
            ListError::TomlError(_)
            | ListError::ConfigError { .. }
            | ListError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ListError::IoError(_) => ErrorCategory::Io,
            ListError::ItemIndexError { .. } | ListError::ValidationError { .. } => {
                ErrorCategory::Usage
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Usage => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ListError::CsvError(_) => "Check that the file is a comma separated export with the list name in the first column",
            ListError::SerializationError(_) | ListError::MalformedInputError { .. } => {
                "Check that the file is a checklist JSON document with 'name' and 'items' fields"
            }
            ListError::TomlError(_) => "Check the settings file for TOML syntax errors",
            ListError::ItemIndexError { .. } => "Use the 'show' command to list valid item positions",
            ListError::IoError(_) => "Check that the path exists and is readable/writable",
            ListError::ConfigError { .. }
            | ListError::InvalidConfigValueError { .. }
            | ListError::ValidationError { .. } => "Review the settings file and command line arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the list: {}", self),
            ErrorCategory::Configuration => format!("Bad configuration: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Usage => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
