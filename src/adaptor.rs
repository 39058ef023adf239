//! The public façade: converts a UBZ package (directory or archive) into an
//! IWB package (directory or archive).

use std::{fs, path::Path};

use log::{error, info};

use crate::{
    archive::{extract, make_unique_temp_dir, pack},
    assets::copy_dir_all,
    config::ConverterOptions,
    converters::iwb::convert_document,
    errors::{AdaptorError, Result},
    models::document::ConversionReport,
};

/// Converts UBZ documents to IWB, remembering the error of the last
/// conversion.
///
/// One adaptor converts one document at a time; use separate adaptors to
/// convert documents in parallel.
#[derive(Debug, Default)]
pub struct IwbAdaptor {
    options: ConverterOptions,
    last_error: Option<String>,
}

impl IwbAdaptor {
    pub fn new(options: ConverterOptions) -> Self {
        IwbAdaptor {
            options,
            last_error: None,
        }
    }

    /// Converts `from` into `to`, returning whether it succeeded.
    ///
    /// On failure the reason is available from [`IwbAdaptor::last_error`]
    /// until the next conversion starts.
    pub fn convert(&mut self, from: &Path, to: &Path) -> bool {
        self.last_error = None;
        match self.try_convert(from, to) {
            Ok(_) => true,
            Err(e) => {
                error!("Conversion of {} failed: {}", from.display(), e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// The error of the last failed conversion, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Converts `from` into `to`.
    ///
    /// `from` is used in place when it is a directory and extracted as a zip
    /// archive otherwise. The package is assembled in a scratch directory
    /// and only then written to `to`: as a zip archive when `to` has a file
    /// extension, as a directory tree otherwise. Nothing is written to `to`
    /// when the conversion fails.
    ///
    /// # Returns
    /// The conversion counters on success.
    pub fn try_convert(&self, from: &Path, to: &Path) -> Result<ConversionReport> {
        if !from.exists() {
            return Err(AdaptorError::InvalidInput(format!(
                "source package {} does not exist",
                from.display()
            )));
        }

        let extracted = if from.is_dir() {
            None
        } else {
            let dir = make_unique_temp_dir()?;
            extract(from, dir.path())?;
            Some(dir)
        };
        let source_dir = extracted.as_ref().map_or(from, |dir| dir.path());

        let output = make_unique_temp_dir()?;
        let report = convert_document(source_dir, output.path(), &self.options)?;

        if to.extension().is_some() {
            if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            pack(output.path(), to)?;
        } else {
            copy_dir_all(output.path(), to)?;
        }
        info!("Wrote {}", to.display());
        Ok(report)
    }
}
