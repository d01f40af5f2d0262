use std::io;
use thiserror::Error;

/// Failure taxonomy for the conversion pipeline.
///
/// Every variant is terminal for the run; nothing is retried. The CLI maps
/// any of these to a prefixed message on stderr and exit status 1.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Bad arguments before any work happened (missing archive path,
    /// nonexistent file, unusable identifier).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The mod archive could not be recognized, opened, extracted, or the
    /// output archive could not be built.
    #[error("archive error: {0}")]
    Archive(String),

    /// Neither known main-menu mesh filename matched anything in the mod.
    #[error("unable to find a main menu mesh (logo.nif or logo01ae.nif) in the mod")]
    MeshNotFound,

    /// The mesh file exists but the codec rejected it.
    #[error("unable to load mesh {path}: {reason}")]
    MeshLoad { path: String, reason: String },

    /// The rewritten mesh could not be written out.
    #[error("unable to save mesh to {path}: {reason}")]
    MeshSave { path: String, reason: String },

    /// The texture referenced by the mesh is missing from the mod.
    #[error("texture not found: {0}")]
    TextureNotFound(String),

    /// Scratch, copy, or move failures outside the archive/mesh domains.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;
