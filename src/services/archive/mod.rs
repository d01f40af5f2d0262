//! Archive extraction and creation for mod archives.
//!
//! Extraction covers the formats mod sites actually serve (zip, 7z, rar),
//! with optional passwords for encrypted downloads. Creation is always an
//! uncompressed zip, the layout the menu replacer mod reads its addons
//! from.

mod extract;
mod pack;
mod types;

pub use extract::extract_archive;
pub use pack::pack_directory;
pub use types::ArchiveFormat;

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
