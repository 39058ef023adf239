//! Converts UBZ whiteboard documents into the IWB (Common File Format)
//! interchange dialect.
//!
//! The entry point is [`convert_document`], which works on an extracted UBZ
//! package and fills a destination directory with `content.xml` and the
//! relocated media.
//!
//! # Current Features & Limitations:
//! *   Converts every `page???.svg` of the package, in file-name order.
//! *   Handles images, video, audio, widgets, rich text, lines, polygons, polylines and groups.
//! *   Resolves `matrix(..)` transforms into position, size and rotation.
//! *   Orders elements into the IWB z-layers.
//! *   Builds dark and crossed page backgrounds.
//! *   Vector images and widgets are replaced by a PNG preview (or a placeholder).

pub mod attributes;
pub mod background;
pub mod constants;
pub mod content;
pub mod context;
pub mod elements;
mod error;
pub mod geometry;
pub mod ids;
pub mod layers;
pub mod structure;
pub mod text;
pub mod utils;
pub mod writer;

use std::{fs, path::Path};

use log::info;

pub use error::{ConversionError, Result};
pub use structure::{read_description, DocumentAssembler};
pub use writer::write_document;

use crate::{
    assets::FsAssetStore, canvas::SkiaCanvas, config::ConverterOptions,
    models::document::ConversionReport,
};
use constants::CONTENT_FILE;

/// Converts the extracted UBZ package at `source_dir` into an IWB package
/// tree under `destination_dir`.
///
/// # Arguments
/// * `source_dir` - Directory holding `metadata.rdf` and the page files.
/// * `destination_dir` - Directory receiving `content.xml` and the media folders.
/// * `options` - Conversion options.
///
/// # Returns
/// The conversion counters, or the first error. On error the destination
/// may hold some relocated media but never a `content.xml`.
pub fn convert_document(
    source_dir: &Path,
    destination_dir: &Path,
    options: &ConverterOptions,
) -> Result<ConversionReport> {
    let mut store = FsAssetStore::new(source_dir, destination_dir);
    let canvas = SkiaCanvas;

    let (document, report) =
        DocumentAssembler::new(options, &mut store, &canvas).assemble(source_dir)?;
    let xml = write_document(&document, options.indent)?;

    fs::write(destination_dir.join(CONTENT_FILE), xml).map_err(|source| {
        ConversionError::AssetTransfer {
            destination: CONTENT_FILE.to_string(),
            source,
        }
    })?;

    info!(
        "Converted {} page(s): {} element(s), {} metadata element(s), {} asset(s)",
        report.pages, report.elements, report.extended_elements, report.relocated_assets
    );
    Ok(report)
}
