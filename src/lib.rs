pub mod adaptor;
pub mod archive;
pub mod assets;
pub mod canvas;
pub mod config;
pub mod converters;
pub mod errors;
pub mod models;

pub use adaptor::IwbAdaptor;
pub use config::{ConverterOptions, GridMode};
pub use converters::iwb::{convert_document, ConversionError};
pub use errors::{AdaptorError, Result};
pub use models::document::ConversionReport;
