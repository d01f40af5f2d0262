//! Recursive file search over the extracted mod tree.
//!
//! Mod archives bury meshes and textures at arbitrary depths and mix path
//! casing freely, so matching is a case-insensitive substring test against
//! the path rather than an exact filename comparison.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find a file under `root` whose path contains `fragment`, case-insensitive.
///
/// The fragment is matched against the path relative to `root`, so the name
/// of the scratch directory itself can never produce a hit. When several
/// files match, the shallowest one wins, ties broken by path order, making
/// repeated runs over the same tree pick the same file.
pub fn find_file(root: &Path, fragment: &str) -> Option<PathBuf> {
    let needle = fragment.to_lowercase();

    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let rel = e.path().strip_prefix(root).unwrap_or_else(|_| e.path());
            rel.to_string_lossy().to_lowercase().contains(&needle)
        })
        .min_by_key(|e| (e.depth(), e.path().to_path_buf()))
        .map(|e| e.into_path())
}

/// Try several fragments strictly in order; a later candidate is only
/// considered once an earlier one matched nothing anywhere in the tree.
pub fn find_first_of(root: &Path, fragments: &[&str]) -> Option<PathBuf> {
    fragments.iter().find_map(|f| find_file(root, f))
}
