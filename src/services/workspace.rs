use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};

/// Exclusive temporary directory tree for one conversion run.
///
/// Layout:
/// - `extract/` holds the unpacked mod archive
/// - `Data/` is the staging tree that gets packed into the output archive
///
/// Keeping the two areas apart means a mod that ships its own top-level
/// `Data` folder can never leak extra files into the staged output. The
/// whole tree is removed when the workspace is dropped, so a failure at any
/// pipeline stage cannot leave extractions behind in the temp dir.
pub struct ScratchWorkspace {
    dir: TempDir,
    extract_dir: PathBuf,
    staging_dir: PathBuf,
}

impl ScratchWorkspace {
    /// Create a fresh workspace under `root` (system temp dir when `None`).
    pub fn create(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("mainmenu-convert-");

        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        let extract_dir = dir.path().join("extract");
        let staging_dir = dir.path().join("Data");
        fs::create_dir(&extract_dir)?;
        fs::create_dir(&staging_dir)?;

        log::debug!("scratch workspace at {}", dir.path().display());

        Ok(Self {
            dir,
            extract_dir,
            staging_dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the mod archive gets unpacked.
    pub fn extract_dir(&self) -> &Path {
        &self.extract_dir
    }

    /// Staging tree root, archived with its directory name included.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Remove the workspace now instead of at drop, surfacing any error.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}
