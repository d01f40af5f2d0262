//! Request, configuration and report types for the conversion pipeline.

use std::path::PathBuf;

use serde::Serialize;

use crate::types::{ConvertError, ConvertResult};

/// One mod archive to convert plus the addon identifier to publish it under.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub archive: PathBuf,
    pub identifier: String,
}

impl ConvertRequest {
    pub fn new(archive: impl Into<PathBuf>, identifier: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            identifier: identifier.into(),
        }
    }

    /// Checks the request before any filesystem work happens.
    ///
    /// Rules:
    /// - the archive path must be an existing file
    /// - the identifier must be non-empty and usable as a file name
    pub fn validate(&self) -> ConvertResult<()> {
        if !self.archive.exists() {
            return Err(ConvertError::InvalidInput(format!(
                "could not find the mod archive: {}",
                self.archive.display()
            )));
        }
        if !self.archive.is_file() {
            return Err(ConvertError::InvalidInput(format!(
                "the mod archive is not a file: {}",
                self.archive.display()
            )));
        }
        if self.identifier.is_empty() {
            return Err(ConvertError::InvalidInput(
                "addon name must not be empty".into(),
            ));
        }
        if sanitize_filename::sanitize(&self.identifier) != self.identifier {
            return Err(ConvertError::InvalidInput(format!(
                "addon name {:?} is not usable as a file name",
                self.identifier
            )));
        }
        Ok(())
    }
}

/// Knobs controlling where the pipeline reads and writes.
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    /// Where the finished addon archive lands. Defaults to the directory
    /// containing the input archive.
    pub output_dir: Option<PathBuf>,
    /// Parent for the scratch workspace. Defaults to the system temp dir.
    pub scratch_root: Option<PathBuf>,
    /// Password for encrypted mod archives.
    pub password: Option<String>,
}

/// What a successful conversion produced, for display or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub identifier: String,
    /// Files unpacked from the mod archive.
    pub files_extracted: usize,
    /// The mesh that was patched, relative to the archive root.
    pub mesh_entry: String,
    /// Shape names found in the mesh.
    pub shapes: Vec<String>,
    /// Texture sets whose diffuse slot was rewritten.
    pub texture_sets: usize,
    /// Diffuse texture path the mesh referenced before the rewrite.
    pub original_texture: String,
    /// File the texture was copied from, relative to the archive root.
    pub texture_source: String,
    pub output_archive: PathBuf,
}
