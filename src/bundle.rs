use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::caption::RenderedImage;

pub const ARCHIVE_MIME: &str = "application/zip";
pub const ARCHIVE_FILE_NAME: &str = "captions.zip";

/// Writes every image as `NN.png` under `dir` and returns the paths in index order.
pub fn write_to_dir(images: &[RenderedImage], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir: {}", dir.display()))?;
    let mut written = Vec::with_capacity(images.len());
    for image in images {
        let path = dir.join(image.file_name());
        std::fs::write(&path, &image.png)
            .with_context(|| format!("failed to write caption: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Packs the images into one ZIP so they can be downloaded at once.
pub fn zip_archive(images: &[RenderedImage]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    // PNG data is already deflated.
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    for image in images {
        writer
            .start_file(image.file_name(), options)
            .with_context(|| "failed to write zip entry")?;
        writer
            .write_all(&image.png)
            .with_context(|| "failed to write zip entry content")?;
    }
    let cursor = writer.finish().with_context(|| "failed to finish zip archive")?;
    Ok(cursor.into_inner())
}
