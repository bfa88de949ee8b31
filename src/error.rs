/// Error types for comment extraction.
use thiserror::Error;

/// Result type for comment extraction.
pub type Result<T> = std::result::Result<T, CommentsError>;

/// Error types for comment extraction.
///
/// Only conditions that make a document untrustworthy are errors. A missing
/// comments part, a comment without an anchor or a dangling reply reference
/// all have defined fallbacks and never surface here.
#[derive(Error, Debug)]
pub enum CommentsError {
    /// The input path does not exist
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// The container could not be opened or a member could not be read
    #[error("Container error: {0}")]
    Container(String),

    /// A part required for extraction is missing
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Malformed XML in one of the parts
    #[error("XML error in {part}: {message}")]
    Xml { part: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommentsError {
    /// Create an XML error for the given part.
    pub fn xml(part: impl Into<String>, message: impl ToString) -> Self {
        CommentsError::Xml {
            part: part.into(),
            message: message.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for CommentsError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => CommentsError::Io(e),
            other => CommentsError::Container(other.to_string()),
        }
    }
}
