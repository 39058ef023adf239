//! Filesystem collaborator used by the converter to place assets into the
//! destination package.
//!
//! All paths handed to an [`AssetStore`] are package-relative
//! (`images/photo.png`); the store resolves them against its roots.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::canvas::{BackgroundCanvas, BackgroundRequest, SkiaCanvas};

/// Side length of the placeholder painted when no preview is available.
const PLACEHOLDER_SIZE: u32 = 64;
const PLACEHOLDER_FILL: &str = "lightgray";

/// Moves bytes into the destination package on behalf of the converter.
pub trait AssetStore {
    /// Copies `source` (relative to the source package) to `destination`.
    fn copy_asset(&mut self, source: &str, destination: &str) -> io::Result<()>;

    /// Produces a PNG raster of `source` at `destination`.
    fn rasterize_asset(&mut self, source: &str, destination: &str) -> io::Result<()>;

    /// Writes generated bytes to `destination`.
    fn write_asset(&mut self, destination: &str, bytes: &[u8]) -> io::Result<()>;
}

/// [`AssetStore`] working on two directories on disk.
#[derive(Debug)]
pub struct FsAssetStore {
    source_root: PathBuf,
    destination_root: PathBuf,
}

impl FsAssetStore {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        FsAssetStore {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
        }
    }

    fn destination_path(&self, destination: &str) -> io::Result<PathBuf> {
        let path = self.destination_root.join(destination);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

impl AssetStore for FsAssetStore {
    fn copy_asset(&mut self, source: &str, destination: &str) -> io::Result<()> {
        let from = self.source_root.join(source);
        let to = self.destination_path(destination)?;
        debug!("Copying {} to {}", from.display(), to.display());
        fs::copy(&from, &to).map(|_| ())
    }

    /// Uses a `<stem>.png` preview stored next to the source when there is
    /// one, otherwise paints a neutral placeholder.
    fn rasterize_asset(&mut self, source: &str, destination: &str) -> io::Result<()> {
        let preview = self.source_root.join(source).with_extension("png");
        let to = self.destination_path(destination)?;
        if preview.is_file() {
            debug!("Using preview {} for {}", preview.display(), source);
            return fs::copy(&preview, &to).map(|_| ());
        }

        warn!("No preview available for {}, writing a placeholder raster.", source);
        let request = BackgroundRequest {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            fill: PLACEHOLDER_FILL.to_string(),
            grid: None,
        };
        let bytes = SkiaCanvas
            .paint_background(&request)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        fs::write(to, bytes)
    }

    fn write_asset(&mut self, destination: &str, bytes: &[u8]) -> io::Result<()> {
        let to = self.destination_path(destination)?;
        fs::write(to, bytes)
    }
}

/// Recursively copies the contents of `from` into `to`.
pub fn copy_dir_all(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}
