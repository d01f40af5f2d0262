use super::types::ArchiveFormat;
use crate::types::{ConvertError, ConvertResult};
use std::fs;
use std::io;
use std::path::Path;

/// Extract a mod archive into `dest`, returning the number of files written.
///
/// Format dispatch tries the extension first and falls back to magic-byte
/// sniffing, so a renamed archive still opens. Entries that would escape
/// `dest` are skipped.
pub fn extract_archive(
    archive_path: &Path,
    dest: &Path,
    password: Option<&str>,
) -> ConvertResult<usize> {
    let format = ArchiveFormat::detect(archive_path).ok_or_else(|| {
        ConvertError::Archive(format!(
            "unsupported archive format: {}",
            archive_path.display()
        ))
    })?;

    fs::create_dir_all(dest)?;

    let count = match format {
        ArchiveFormat::Zip => extract_zip(archive_path, dest, password)?,
        ArchiveFormat::SevenZ => extract_7z(archive_path, dest, password)?,
        ArchiveFormat::Rar => extract_rar(archive_path, dest, password)?,
    };

    log::info!(
        "extracted {} files from {}",
        count,
        archive_path.display()
    );
    Ok(count)
}

fn extract_zip(archive_path: &Path, dest: &Path, password: Option<&str>) -> ConvertResult<usize> {
    let file = fs::File::open(archive_path)
        .map_err(|e| ConvertError::Archive(format!("failed to open archive: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ConvertError::Archive(format!("invalid or corrupt ZIP: {e}")))?;

    let mut count: usize = 0;
    for i in 0..archive.len() {
        // Use the password-aware read when a password was provided.
        let mut entry = match password {
            Some(pw) => archive.by_index_decrypt(i, pw.as_bytes()),
            None => archive.by_index(i),
        }
        .map_err(|e| {
            let msg = e.to_string();
            if msg.to_lowercase().contains("password") {
                ConvertError::Archive("password required to extract this archive".to_string())
            } else {
                ConvertError::Archive(format!("failed to read entry {i}: {e}"))
            }
        })?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                log::warn!("skipping archive entry with unsafe path: {}", entry.name());
                continue;
            }
        };

        let output_path = dest.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)
                .map_err(|e| ConvertError::Archive(format!("failed to create dir: {e}")))?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConvertError::Archive(format!("failed to create parent: {e}")))?;
            }
            let mut outfile = fs::File::create(&output_path)
                .map_err(|e| ConvertError::Archive(format!("failed to create file: {e}")))?;
            io::copy(&mut entry, &mut outfile)
                .map_err(|e| ConvertError::Archive(format!("failed to write file: {e}")))?;
            count += 1;
        }
    }
    Ok(count)
}

fn extract_7z(archive_path: &Path, dest: &Path, password: Option<&str>) -> ConvertResult<usize> {
    let extract_result = match password {
        Some(pw) => sevenz_rust::decompress_file_with_password(archive_path, dest, pw.into()),
        None => sevenz_rust::decompress_file(archive_path, dest),
    };

    extract_result.map_err(|e| {
        let msg = e.to_string().to_lowercase();
        if msg.contains("password") || msg.contains("decrypt") {
            ConvertError::Archive("password required to extract this archive".to_string())
        } else {
            ConvertError::Archive(format!("failed to extract 7z: {e}"))
        }
    })?;

    Ok(count_files(dest))
}

fn extract_rar(archive_path: &Path, dest: &Path, password: Option<&str>) -> ConvertResult<usize> {
    let path_str = archive_path
        .to_str()
        .ok_or_else(|| ConvertError::Archive("RAR path contains invalid UTF-8".to_string()))?;
    let dest_str = dest
        .to_str()
        .ok_or_else(|| ConvertError::Archive("dest path contains invalid UTF-8".to_string()))?;

    let pw = password.unwrap_or("");
    rar::Archive::extract_all(path_str, dest_str, pw)
        .map_err(|e| ConvertError::Archive(format!("failed to extract RAR: {e:?}")))?;

    Ok(count_files(dest))
}

/// The 7z and RAR backends extract wholesale, so the file count comes from
/// walking the destination afterwards.
fn count_files(dest: &Path) -> usize {
    walkdir::WalkDir::new(dest)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .count()
}
