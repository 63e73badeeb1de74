use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to decode image '{name}': {reason}")]
    DecodeError { name: String, reason: String },

    #[error("Failed to resize image '{name}' to {width}x{height}: {reason}")]
    ResizeError {
        name: String,
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("Archive assembly failed: {reason}")]
    ArchiveError { reason: String },

    #[error("{stage} failed for image '{image}' at preset {preset}: {source}")]
    OrchestratorError {
        stage: String,
        image: String,
        preset: String,
        #[source]
        source: Box<PackError>,
    },

    #[error("Job was cancelled")]
    Cancelled,

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PackError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PackError::DecodeError { .. } | PackError::ResizeError { .. } => ErrorSeverity::High,
            PackError::OrchestratorError { source, .. } => source.severity(),
            PackError::Cancelled => ErrorSeverity::Medium,
            PackError::InvalidConfigValueError { .. } | PackError::MissingConfigError { .. } => {
                ErrorSeverity::High
            }
            PackError::ZipError(_)
            | PackError::IoError(_)
            | PackError::SerializationError(_)
            | PackError::ArchiveError { .. }
            | PackError::ProcessingError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PackError::DecodeError { name, .. } => {
                format!("'{}' is not a readable image file", name)
            }
            PackError::ResizeError {
                name,
                width,
                height,
                ..
            } => {
                format!("Could not resize '{}' to {}x{}", name, width, height)
            }
            PackError::OrchestratorError {
                image,
                preset,
                source,
                ..
            } => {
                format!(
                    "Processing '{}' ({}) failed: {}",
                    image,
                    preset,
                    source.user_friendly_message()
                )
            }
            PackError::Cancelled => "The job was cancelled before it finished".to_string(),
            PackError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            PackError::MissingConfigError { field } => {
                format!("Missing required configuration: {}", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PackError::DecodeError { .. } => {
                "Check that the file exists and is a supported image format (png, jpg, gif, webp, bmp, tiff)".to_string()
            }
            PackError::ResizeError { .. } => {
                "Try re-exporting the source image; its pixel data may not match its container".to_string()
            }
            PackError::OrchestratorError { source, .. } => source.recovery_suggestion(),
            PackError::Cancelled => "Run the job again without cancelling it".to_string(),
            PackError::IoError(_) | PackError::ZipError(_) => {
                "Check disk space and write permissions for the output directory".to_string()
            }
            PackError::InvalidConfigValueError { .. } | PackError::MissingConfigError { .. } => {
                "Run with --help to see the expected arguments".to_string()
            }
            _ => "Re-run with --verbose for more detail".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
