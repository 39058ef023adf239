//! Zip packaging helpers for UBZ and IWB packages.

use std::{
    fs::{self, File},
    io,
    path::Path,
};

use log::debug;
use tempfile::TempDir;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::Result;

/// Prefix of the scratch directories created during a conversion.
pub const TEMP_DIR_PREFIX: &str = "CFF_adaptor_filedata_store";

/// Creates a fresh, uniquely named scratch directory. It is removed when the
/// returned handle is dropped.
pub fn make_unique_temp_dir() -> Result<TempDir> {
    Ok(tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir()?)
}

/// Extracts the zip archive at `archive` into `destination`.
pub fn extract(archive: &Path, destination: &Path) -> Result<()> {
    debug!(
        "Extracting {} into {}",
        archive.display(),
        destination.display()
    );
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    zip.extract(destination)?;
    Ok(())
}

/// Packs the contents of `source_dir` into a new zip archive at `archive`.
///
/// Entries are stored relative to `source_dir`, deflated, in file name
/// order so the archive layout is reproducible.
pub fn pack(source_dir: &Path, archive: &Path) -> Result<()> {
    debug!("Packing {} into {}", source_dir.display(), archive.display());
    let mut writer = ZipWriter::new(File::create(archive)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    add_directory(&mut writer, source_dir, "", options)?;
    writer.finish()?;
    Ok(())
}

fn add_directory(
    writer: &mut ZipWriter<File>,
    dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let name = if prefix.is_empty() {
            file_name
        } else {
            format!("{}/{}", prefix, file_name)
        };

        if entry.file_type()?.is_dir() {
            writer.add_directory(format!("{}/", name), options)?;
            add_directory(writer, &entry.path(), &name, options)?;
        } else {
            writer.start_file(name, options)?;
            io::copy(&mut File::open(entry.path())?, writer)?;
        }
    }
    Ok(())
}
