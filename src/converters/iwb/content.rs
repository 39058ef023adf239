//! Relocation of media referenced by UBZ elements into the IWB package.
//!
//! The relocator only decides where an asset goes and under which name; the
//! bytes are moved by an [`AssetStore`] collaborator.

use log::debug;

use super::{
    constants::RASTER_EXTENSION,
    error::{ConversionError, Result},
    ids::IdGenerator,
    utils::reference_extension,
};
use crate::{assets::AssetStore, models::elements::ElementType};

pub const IMAGE_FORMATS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff"];
pub const VIDEO_FORMATS: &[&str] = &["mp4", "mov", "avi", "mpg", "mpeg", "wmv", "flv", "swf"];
pub const AUDIO_FORMATS: &[&str] = &["mp3", "wav", "ogg", "wma", "m4a"];
/// Containers the IWB format cannot embed; they are re-rasterized to PNG.
pub const RASTERIZED_FORMATS: &[&str] = &["svg", "wgt"];

/// How the asset reaches its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationAction {
    /// Byte-for-byte copy.
    Copy,
    /// Conversion to a PNG raster by the asset store.
    Rasterize,
}

/// A planned move of one referenced asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Reference as written in the source package.
    pub source: String,
    /// Reference to write into the IWB document (relative to its root).
    pub destination: String,
    pub action: RelocationAction,
}

/// Whether `extension` (lower case) is one of the supported media formats.
pub fn is_supported_format(extension: &str) -> bool {
    IMAGE_FORMATS
        .iter()
        .chain(VIDEO_FORMATS)
        .chain(AUDIO_FORMATS)
        .chain(RASTERIZED_FORMATS)
        .any(|format| *format == extension)
}

/// Element type implied by a reference's extension, if any.
pub fn element_type_for_extension(extension: &str) -> Option<ElementType> {
    use crate::models::elements::ForeignObjectKind;

    if IMAGE_FORMATS.contains(&extension) || extension == "svg" {
        Some(ElementType::Image)
    } else if VIDEO_FORMATS.contains(&extension) {
        Some(ElementType::Video)
    } else if AUDIO_FORMATS.contains(&extension) {
        Some(ElementType::Audio)
    } else if extension == "wgt" {
        Some(ElementType::ForeignObject(ForeignObjectKind::Other))
    } else {
        None
    }
}

/// Strips decorations UBZ writers put in front of package-relative paths.
fn normalize_reference(reference: &str) -> &str {
    let reference = reference.trim();
    let reference = reference.strip_prefix("file://").unwrap_or(reference);
    reference.strip_prefix("./").unwrap_or(reference)
}

/// Plans the relocation of `reference` held by an element of `element_type`,
/// naming the destination file `new_name` plus the proper extension.
///
/// # Returns
/// The planned [`Relocation`], or `UnsupportedContentFormat` when the
/// extension is not in the allowlist or the element type carries no media.
pub fn plan_relocation(
    reference: &str,
    element_type: ElementType,
    new_name: &str,
) -> Result<Relocation> {
    let source = normalize_reference(reference);
    let unsupported = || ConversionError::UnsupportedContentFormat(reference.to_string());

    let folder = element_type.content_folder().ok_or_else(unsupported)?;
    let extension = reference_extension(source).ok_or_else(unsupported)?;
    if !is_supported_format(&extension) {
        return Err(unsupported());
    }

    let (extension, action) = if RASTERIZED_FORMATS.contains(&extension.as_str()) {
        (RASTER_EXTENSION.to_string(), RelocationAction::Rasterize)
    } else {
        (extension, RelocationAction::Copy)
    };

    Ok(Relocation {
        source: source.to_string(),
        destination: format!("{}/{}.{}", folder, new_name, extension),
        action,
    })
}

/// Relocates referenced media, one fresh file name per reference.
pub struct ContentRelocator<'a> {
    store: &'a mut dyn AssetStore,
    relocated: usize,
}

impl<'a> ContentRelocator<'a> {
    pub fn new(store: &'a mut dyn AssetStore) -> Self {
        ContentRelocator {
            store,
            relocated: 0,
        }
    }

    /// Plans the relocation and asks the store to carry it out.
    ///
    /// # Returns
    /// The destination reference to write into the IWB document.
    pub fn relocate(
        &mut self,
        reference: &str,
        element_type: ElementType,
        ids: &mut IdGenerator,
    ) -> Result<String> {
        let relocation = plan_relocation(reference, element_type, &ids.next_id())?;
        debug!(
            "Relocating '{}' to '{}' ({:?})",
            relocation.source, relocation.destination, relocation.action
        );

        let outcome = match relocation.action {
            RelocationAction::Copy => self
                .store
                .copy_asset(&relocation.source, &relocation.destination),
            RelocationAction::Rasterize => self
                .store
                .rasterize_asset(&relocation.source, &relocation.destination),
        };
        outcome.map_err(|source| ConversionError::AssetTransfer {
            destination: relocation.destination.clone(),
            source,
        })?;

        self.relocated += 1;
        Ok(relocation.destination)
    }

    /// Writes generated bytes (e.g. a painted background) into the package.
    pub fn store_generated(&mut self, destination: &str, bytes: &[u8]) -> Result<()> {
        self.store
            .write_asset(destination, bytes)
            .map_err(|source| ConversionError::AssetTransfer {
                destination: destination.to_string(),
                source,
            })
    }

    /// Number of assets relocated so far.
    pub fn relocated(&self) -> usize {
        self.relocated
    }
}
