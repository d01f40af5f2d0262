use crate::types::{ConvertError, ConvertResult};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build an uncompressed zip from `src_dir`, base directory included.
///
/// Entry names start with the directory's own name and use forward slashes,
/// so extracting the archive recreates `src_dir` as a single top level entry.
/// Files are added in sorted order with a fixed modification timestamp, so
/// the same tree always produces the same archive bytes. Returns the entry
/// count.
pub fn pack_directory(src_dir: &Path, archive_path: &Path) -> ConvertResult<usize> {
    let base = src_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ConvertError::Archive(format!(
                "cannot archive {}: no base directory name",
                src_dir.display()
            ))
        })?;

    let file = fs::File::create(archive_path).map_err(|e| {
        ConvertError::Archive(format!(
            "failed to create archive {}: {e}",
            archive_path.display()
        ))
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default());

    let mut count: usize = 0;
    let walker = WalkDir::new(src_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(src_dir).map_err(|_| {
            ConvertError::Archive(format!(
                "file escaped the staging tree: {}",
                entry.path().display()
            ))
        })?;
        let mut name = base.clone();
        for component in rel.components() {
            name.push('/');
            name.push_str(&component.as_os_str().to_string_lossy());
        }

        writer
            .start_file(name, options)
            .map_err(|e| ConvertError::Archive(format!("failed to add entry: {e}")))?;
        let mut source = fs::File::open(entry.path())
            .map_err(|e| ConvertError::Archive(format!("failed to open staged file: {e}")))?;
        io::copy(&mut source, &mut writer)
            .map_err(|e| ConvertError::Archive(format!("failed to write entry: {e}")))?;
        count += 1;
    }

    writer
        .finish()
        .map_err(|e| ConvertError::Archive(format!("failed to finalize archive: {e}")))?;

    log::info!(
        "packed {} entries into {}",
        count,
        archive_path.display()
    );
    Ok(count)
}
