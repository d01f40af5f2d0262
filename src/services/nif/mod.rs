//! Minimal NIF (Gamebryo) mesh codec for main menu logo files.
//!
//! Supports the 20.2.0.7 little-endian layout used by Skyrim. Only the
//! pieces the converter rewrites are decoded (`BSShaderTextureSet` blocks);
//! every other block and the footer are carried as opaque bytes and written
//! back verbatim, so an untouched document round-trips byte for byte.

mod document;
mod header;
mod strings;

pub use document::{Block, NifDocument, TextureSet};
pub use header::{BsStreamInfo, NifHeader, SUPPORTED_VERSION};

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NifError {
    #[error("not a NIF file")]
    NotNif,
    #[error("unsupported NIF version 0x{0:08X}")]
    UnsupportedVersion(u32),
    #[error("corrupt NIF data: {0}")]
    Corrupt(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type NifResult<T> = Result<T, NifError>;

#[cfg(test)]
#[path = "tests/nif_tests.rs"]
mod tests;
