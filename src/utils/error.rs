use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Invalid board structure: {message}")]
    InvalidBoardStructure { message: String },

    #[error("Unparseable date '{value}'")]
    UnparseableDate { value: String },

    #[error("Card '{card}' has no handled tag combination")]
    UnhandledTagCombination { card: String },

    #[error("Unknown tag: {name}")]
    UnknownTag { name: String },

    #[error("Board request failed with status {status}: {context}")]
    UpstreamFailure { status: u16, context: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Board,
    Card,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BoardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoardError::InvalidBoardStructure { .. } => ErrorCategory::Board,
            BoardError::UnparseableDate { .. }
            | BoardError::UnhandledTagCombination { .. }
            | BoardError::UnknownTag { .. } => ErrorCategory::Card,
            BoardError::UpstreamFailure { .. } | BoardError::HttpError(_) => {
                ErrorCategory::Network
            }
            BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BoardError::IoError(_) | BoardError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BoardError::UnparseableDate { .. } | BoardError::UnknownTag { .. } => {
                ErrorSeverity::Low
            }
            BoardError::UpstreamFailure { .. } | BoardError::HttpError(_) => ErrorSeverity::Medium,
            BoardError::UnhandledTagCombination { .. }
            | BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::MissingConfigError { .. }
            | BoardError::SerializationError(_) => ErrorSeverity::High,
            BoardError::InvalidBoardStructure { .. } | BoardError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BoardError::InvalidBoardStructure { .. } => {
                "Check the board lists: Tonight and Wind Down must sit between Today and Done"
            }
            BoardError::UnparseableDate { .. } => "Fix the card's start or due date on the board",
            BoardError::UnhandledTagCombination { .. } => {
                "Add a recurrence label (Daily, Weekly, Biweekly, Monthly) or Task/Reverse/Static"
            }
            BoardError::UnknownTag { .. } => "Rename or remove the label",
            BoardError::UpstreamFailure { .. } | BoardError::HttpError(_) => {
                "Check the board API credentials and network connectivity, then retry"
            }
            BoardError::IoError(_) => "Check file paths and permissions",
            BoardError::SerializationError(_) => "Check the payload is valid JSON",
            BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::MissingConfigError { .. } => {
                "Review the configuration file and referenced environment variables"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Board => format!("The board layout is not usable: {}", self),
            ErrorCategory::Card => format!("The card could not be resolved: {}", self),
            ErrorCategory::Network => format!("Talking to the board failed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn invalid_structure(message: impl Into<String>) -> Self {
        BoardError::InvalidBoardStructure {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
