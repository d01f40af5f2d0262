use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Supported archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveFormat {
    Zip,
    SevenZ,
    Rar,
}

impl ArchiveFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "zip" => Some(Self::Zip),
            "7z" => Some(Self::SevenZ),
            "rar" => Some(Self::Rar),
            _ => None,
        }
    }

    /// Detect format from the file's leading magic bytes.
    ///
    /// Mods downloaded through browsers sometimes arrive with a stripped or
    /// bogus extension; the signature still identifies them.
    pub fn sniff(path: &Path) -> Option<Self> {
        let mut file = File::open(path).ok()?;
        let mut magic = [0u8; 8];
        let n = file.read(&mut magic).ok()?;
        let magic = &magic[..n];

        if magic.starts_with(b"PK\x03\x04") {
            Some(Self::Zip)
        } else if magic.starts_with(b"7z\xBC\xAF\x27\x1C") {
            Some(Self::SevenZ)
        } else if magic.starts_with(b"Rar!\x1A\x07") {
            Some(Self::Rar)
        } else {
            None
        }
    }

    /// Extension first, magic bytes as fallback.
    pub fn detect(path: &Path) -> Option<Self> {
        Self::from_path(path).or_else(|| Self::sniff(path))
    }
}
