use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to access '{path}': {source}")]
    FileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Too many combinations ({count}), limit is {limit}")]
    TooManyCombinations { count: u128, limit: u128 },

    #[error("Invalid hashcat rule '{rule}': {reason}")]
    RuleParseError { rule: String, reason: String },

    #[error("Failed to launch '{program}': {source}")]
    ToolLaunchError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("External tool error: {message}")]
    ToolError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    FileSystem,
    ExternalTool,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WordlistError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn file(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::FileError {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::FileError { .. } => ErrorCategory::FileSystem,
            Self::HttpError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. }
            | Self::TooManyCombinations { .. }
            | Self::RuleParseError { .. } => ErrorCategory::Input,
            Self::ToolLaunchError { .. } | Self::ToolError { .. } => ErrorCategory::ExternalTool,
            Self::SerializationError(_) | Self::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => ErrorSeverity::Medium,
            Self::ValidationError { .. }
            | Self::TooManyCombinations { .. }
            | Self::RuleParseError { .. }
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ToolError { .. }
            | Self::ProcessingError { .. }
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_) | Self::FileError { .. } | Self::ToolLaunchError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::FileError { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => format!("Check that '{}' exists", path),
                std::io::ErrorKind::PermissionDenied => {
                    format!("Check the permissions of '{}'", path)
                }
                _ => format!("Verify that '{}' is a readable text file", path),
            },
            Self::IoError(_) => "Check file paths and disk space".to_string(),
            Self::HttpError(_) | Self::HttpStatusError { .. } => {
                "Check the URL and your network connection, then try again".to_string()
            }
            Self::TooManyCombinations { .. } => {
                "Reduce the length range or character sets, or pass --force to stream anyway"
                    .to_string()
            }
            Self::RuleParseError { .. } => {
                "See the hashcat rule syntax; supported commands are : l u c C t r d f { } [ ] $ ^ s @ T D"
                    .to_string()
            }
            Self::ToolLaunchError { program, .. } => format!(
                "Make sure '{}' is installed and on your PATH, or set the binary path explicitly",
                program
            ),
            Self::ToolError { .. } => "Inspect the tool output above for details".to_string(),
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            Self::ValidationError { .. } => "Check the command arguments".to_string(),
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose to see more details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::FileSystem => format!("File problem: {}", self),
            ErrorCategory::ExternalTool => format!("External tool problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, WordlistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_suggestion_names_path() {
        let err = WordlistError::file(
            "words.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.category(), ErrorCategory::FileSystem);
        assert!(err.recovery_suggestion().contains("words.txt"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_validation_error_is_input_category() {
        let err = WordlistError::validation("Length must be between 1 and 10");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Invalid input"));
    }
}
