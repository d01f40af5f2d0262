//! The conversion pipeline.
//!
//! Turns a main menu replacer mod archive into a Main Menu Design Replacer
//! addon archive. The run is strictly linear:
//!
//! 1. unpack the mod into a scratch workspace
//! 2. find the logo mesh (`logo.nif`, falling back to `logo01ae.nif`)
//! 3. rewrite every texture set's diffuse slot to the addon path
//! 4. stage the patched mesh and the original texture under the addon layout
//! 5. pack the staged tree as an uncompressed zip next to the input
//!
//! The scratch workspace is removed when the run ends, whether it succeeded
//! or not.

mod types;

pub use types::{ConversionReport, ConvertConfig, ConvertRequest};

use std::fs;
use std::path::{Path, PathBuf};

use crate::services::archive::{extract_archive, pack_directory};
use crate::services::fs_utils::move_file_replacing;
use crate::services::nif::NifDocument;
use crate::services::search::{find_file, find_first_of};
use crate::services::workspace::ScratchWorkspace;
use crate::types::{ConvertError, ConvertResult};

/// Mesh filenames recognized as the main menu logo, in priority order.
const MESH_CANDIDATES: [&str; 2] = ["logo.nif", "logo01ae.nif"];

/// Runs one conversion and reports what it did.
pub fn run(request: &ConvertRequest, config: &ConvertConfig) -> ConvertResult<ConversionReport> {
    request.validate()?;
    log::info!(
        "converting {} as addon '{}'",
        request.archive.display(),
        request.identifier
    );

    let scratch = ScratchWorkspace::create(config.scratch_root.as_deref())?;
    let outcome = convert_in(&scratch, request, config);
    if let Err(err) = scratch.close() {
        log::warn!("could not remove scratch workspace: {err}");
    }
    outcome
}

fn convert_in(
    scratch: &ScratchWorkspace,
    request: &ConvertRequest,
    config: &ConvertConfig,
) -> ConvertResult<ConversionReport> {
    let files_extracted =
        extract_archive(&request.archive, scratch.extract_dir(), config.password.as_deref())?;

    let mesh_path = find_first_of(scratch.extract_dir(), &MESH_CANDIDATES)
        .ok_or(ConvertError::MeshNotFound)?;
    let mesh_entry = display_relative(&mesh_path, scratch.extract_dir());
    log::info!("found main menu mesh at {mesh_entry}");

    let mut mesh = NifDocument::load(&mesh_path).map_err(|err| ConvertError::MeshLoad {
        path: mesh_entry.clone(),
        reason: err.to_string(),
    })?;

    let replacement = format!("Interface/MainMenu/{}.dds", request.identifier);
    let original_texture = retarget_diffuse_slots(&mut mesh, &replacement)?;
    let shapes = mesh.shape_names();
    let texture_sets = mesh.texture_sets().count();
    log::info!(
        "rewrote {texture_sets} texture set(s) across {} shape(s)",
        shapes.len()
    );

    let mesh_dir = addon_dir(scratch.staging_dir(), "Meshes");
    fs::create_dir_all(&mesh_dir)?;
    let staged_mesh = mesh_dir.join(format!("{}.nif", request.identifier));
    mesh.save(&staged_mesh).map_err(|err| ConvertError::MeshSave {
        path: staged_mesh.display().to_string(),
        reason: err.to_string(),
    })?;

    let texture_name = base_name(&original_texture);
    let texture_source = find_file(scratch.extract_dir(), &texture_name).ok_or_else(|| {
        ConvertError::TextureNotFound(format!("no file matching {texture_name:?} in the mod"))
    })?;
    let texture_dir = addon_dir(scratch.staging_dir(), "Textures");
    fs::create_dir_all(&texture_dir)?;
    fs::copy(
        &texture_source,
        texture_dir.join(format!("{}.dds", request.identifier)),
    )?;

    let packed = scratch.path().join(format!("{}.zip", request.identifier));
    let entries = pack_directory(scratch.staging_dir(), &packed)?;
    log::info!("staged {entries} files into the addon archive");

    let output_dir = match &config.output_dir {
        Some(dir) => dir.clone(),
        None => request
            .archive
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    fs::create_dir_all(&output_dir)?;
    let output_archive = output_dir.join(format!("{}.zip", request.identifier));
    move_file_replacing(&packed, &output_archive)?;
    log::info!("wrote addon archive {}", output_archive.display());

    Ok(ConversionReport {
        identifier: request.identifier.clone(),
        files_extracted,
        mesh_entry,
        shapes,
        texture_sets,
        original_texture,
        texture_source: display_relative(&texture_source, scratch.extract_dir()),
        output_archive,
    })
}

/// Rewrites the diffuse slot of every texture set and returns the path the
/// mesh referenced before the rewrite.
///
/// Only slot paths that name a file are recorded; empty and separator-only
/// paths are skipped, so the returned path always has a searchable base
/// name. When sets disagree on the diffuse texture, the first recorded path
/// wins and the others are logged.
fn retarget_diffuse_slots(mesh: &mut NifDocument, replacement: &str) -> ConvertResult<String> {
    let mut original: Option<String> = None;
    for set in mesh.texture_sets_mut() {
        let previous = set
            .slot(0)
            .map(|raw| String::from_utf8_lossy(raw).into_owned())
            .filter(|path| !base_name(path).is_empty());
        if let Some(previous) = previous {
            match &original {
                None => original = Some(previous),
                Some(first) if *first != previous => {
                    log::warn!(
                        "texture sets disagree on the diffuse texture: keeping {first:?}, ignoring {previous:?}"
                    );
                }
                Some(_) => {}
            }
        }
        set.set_slot(0, replacement.as_bytes());
    }
    original.ok_or_else(|| ConvertError::TextureNotFound("mesh references no base texture".into()))
}

/// Addon layout under the staging tree: `Data/<kind>/Interface/MainMenu`.
fn addon_dir(staging: &Path, kind: &str) -> PathBuf {
    staging
        .join("Data")
        .join(kind)
        .join("Interface")
        .join("MainMenu")
}

/// Final path segment of a mesh-referenced texture path, which may use
/// either separator style.
fn base_name(game_path: &str) -> String {
    game_path
        .replace('\\', "/")
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
