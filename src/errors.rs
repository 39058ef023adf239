use thiserror::Error;

use crate::converters::iwb::ConversionError;

/// Represents errors that can occur while converting a UBZ package into an
/// IWB package, including the packaging steps around the conversion itself.
#[derive(Error, Debug)]
pub enum AdaptorError {
    /// The document content could not be converted.
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Error while reading or writing a zip archive.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error while reading the JSON configuration.
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An I/O error occurred, e.g. while creating temporary directories or
    /// writing the output package.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// An error indicating invalid input was provided to the adaptor.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A type alias for `Result<T, AdaptorError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, AdaptorError>;
