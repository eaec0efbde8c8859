use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Fetch failed for {url}: {reason}")]
    FetchError { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("No result region located in the page")]
    NoRegionFound,

    #[error("Located region yielded no usable rows ({skipped} rows skipped)")]
    ExtractionError { skipped: usize },

    #[error("Result row failed validation: {message}")]
    NormalizationError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ExtractError {
    /// Pipeline stage the error belongs to, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FetchError { .. } | Self::HttpError(_) => "fetch",
            Self::NoRegionFound => "locate",
            Self::ExtractionError { .. } => "extract",
            Self::NormalizationError { .. } => "normalize",
            Self::InvalidConfigValueError { .. } => "config",
            Self::IoError(_) | Self::SerializationError(_) => "output",
        }
    }

    /// Process exit code for the CLI boundary. Each failure kind maps to a
    /// distinct non-zero code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfigValueError { .. } => 1,
            Self::FetchError { .. } | Self::HttpError(_) => 2,
            Self::NoRegionFound => 3,
            Self::ExtractionError { .. } => 4,
            Self::NormalizationError { .. } => 5,
            Self::IoError(_) | Self::SerializationError(_) => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
