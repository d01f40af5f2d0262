use std::fs;
use std::path::Path;

/// Move `from` to `to`, replacing any existing file at the destination.
///
/// `fs::rename` is tried first. When it fails (typically a cross-device
/// link error, since the scratch workspace can live on a different mount
/// than the output directory) the move falls back to `fs_extra`
/// copy-and-delete.
pub fn move_file_replacing(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    if to.exists() {
        fs::remove_file(to)?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::warn!(
                "fs::rename failed (cross-device?): {}. Attempting fallback move...",
                e
            );

            if !from.exists() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Source path does not exist",
                ));
            }

            let mut options = fs_extra::file::CopyOptions::new();
            options.overwrite = true;

            fs_extra::file::move_file(from, to, &options)
                .map(|_| ())
                .map_err(|err| std::io::Error::other(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_file_replacing_basic() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("built.zip");
        let dst = dir.path().join("out").join("final.zip");
        fs::write(&src, b"archive bytes").unwrap();

        move_file_replacing(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"archive bytes");
    }

    #[test]
    fn test_move_file_replacing_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("new.zip");
        let dst = dir.path().join("old.zip");
        fs::write(&src, b"new contents").unwrap();
        fs::write(&dst, b"stale contents").unwrap();

        move_file_replacing(&src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"new contents");
    }

    #[test]
    fn test_move_file_replacing_missing_source() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("does_not_exist.zip");
        let dst = dir.path().join("dest.zip");

        assert!(move_file_replacing(&src, &dst).is_err());
    }
}
