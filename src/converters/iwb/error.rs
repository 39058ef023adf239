use thiserror::Error;

/// Errors that can occur during the UBZ to IWB conversion process.
///
/// The first error raised while converting a document aborts the whole
/// document; no partial output is written.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Document metadata could not be read from {path}: {source}")]
    MetadataUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Document metadata is malformed: {0}")]
    MetadataMalformed(String),
    #[error("No content pages found in {0}")]
    NoContentPages(String),
    #[error("Page {page} could not be read: {source}")]
    PageUnreadable {
        page: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Page {page} is malformed: {message}")]
    PageMalformed { page: String, message: String },
    #[error("Unsupported content format for reference '{0}'")]
    UnsupportedContentFormat(String),
    #[error("Group section has no child elements")]
    EmptyGroupSection,
    #[error("Asset transfer to {destination} failed: {source}")]
    AssetTransfer {
        destination: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Background raster could not be painted: {0}")]
    Canvas(String),
    #[error("Formatting error during document generation: {0}")]
    Format(#[from] std::fmt::Error),
}

/// A specialized Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;
