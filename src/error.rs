use thiserror::Error;

/// Why an incoming file was rejected before decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidFileReason {
    /// MIME type is not on the allow-list
    UnsupportedType,
    /// File exceeds the maximum accepted size
    TooLarge,
}

impl std::fmt::Display for InvalidFileReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType => write!(f, "unsupported file type"),
            Self::TooLarge => write!(f, "file is too large (max 10MB)"),
        }
    }
}

/// Errors surfaced by the editing engine and its collaborators
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Invalid file: {reason} (type: {mime:?}, size: {size} bytes)")]
    InvalidFile {
        reason: InvalidFileReason,
        mime: String,
        size: u64,
    },

    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("No pixel data loaded")]
    NoPixelData,

    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to export image: {0}")]
    ExportFailure(String),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
