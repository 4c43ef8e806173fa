use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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

    #[error("No university targets configured")]
    MissingTargets,

    #[error("Extraction error for {url}: {message}")]
    ExtractionError { url: String, message: String },

    #[error("No {table} data was collected")]
    EmptyResult { table: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Extraction,
    Output,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::HttpError(_) => ErrorCategory::Network,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingTargets => ErrorCategory::Configuration,
            EtlError::ExtractionError { .. } => ErrorCategory::Extraction,
            EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::EmptyResult { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 沒有資料可輸出：回報後結束，不算失敗
            EtlError::EmptyResult { .. } => ErrorSeverity::Low,
            EtlError::HttpError(_) | EtlError::ExtractionError { .. } => ErrorSeverity::Medium,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingTargets => ErrorSeverity::High,
            EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::EmptyResult { table } => {
                format!("No {} data was collected. Output file was not created.", table)
            }
            EtlError::HttpError(_) => "Could not reach one of the source sites.".to_string(),
            EtlError::ExtractionError { url, .. } => format!("Could not parse page {}", url),
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingTargets => format!("Invalid configuration: {}", self),
            _ => format!("Failed to write output: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and retry later",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Extraction => "The page layout may have changed; inspect the page HTML",
            ErrorCategory::Output => "Check that the output path is writable",
            ErrorCategory::Data => {
                "Verify the target list and target country, or raise the retry count"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
