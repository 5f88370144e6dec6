//! Custom error types and result handling for novelepub operations.
//!
//! All fallible operations return a [`Result<T>`], a type alias for
//! `std::result::Result<T, Error>`.
//!
use std::path::PathBuf;

/// Type alias for Results with novelepub errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all novelepub operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O errors: unreadable input, invalid UTF-8 text, unwritable output
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Header pattern compilation errors
    #[error(transparent)]
    Regex(#[from] regex::Error),
    /// Cover rendering or encoding errors
    #[error(transparent)]
    Image(#[from] image::ImageError),
    /// EPUB packaging errors
    #[error(transparent)]
    Epub(#[from] epub_builder::Error),
    #[error(transparent)]
    ConfigBuilder(#[from] crate::converter::NovelConfigBuilderError),
    /// Error for invalid file or directory paths
    #[error("The given path '{0:?}' is invalid: {1}")]
    InvalidPath(PathBuf, String),
    /// Error for unsupported inputs (e.g., a cover that is not a known image format)
    #[error("Unsupported: {0}")]
    Unsupported(String),
    /// Error for resources that couldn't be found (e.g., the source text file)
    #[error("Not found: {0}")]
    NotFound(String),
    /// Other errors that don't fit into specific categories
    #[error("Other error: {0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Other(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::Other(error.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
