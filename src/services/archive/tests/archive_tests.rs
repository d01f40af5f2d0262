use super::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper: create a minimal valid ZIP.
fn create_test_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let zip_path = dir.join(name);
    let file = fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (entry_name, content) in files {
        writer.start_file(entry_name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
    zip_path
}

#[test]
fn test_format_detection_by_extension() {
    assert_eq!(
        ArchiveFormat::from_path(Path::new("mod.zip")),
        Some(ArchiveFormat::Zip)
    );
    assert_eq!(
        ArchiveFormat::from_path(Path::new("mod.7z")),
        Some(ArchiveFormat::SevenZ)
    );
    assert_eq!(
        ArchiveFormat::from_path(Path::new("mod.rar")),
        Some(ArchiveFormat::Rar)
    );
    assert_eq!(ArchiveFormat::from_path(Path::new("mod.txt")), None);
}

#[test]
fn test_format_sniff_magic_bytes() {
    let dir = TempDir::new().unwrap();

    let zip_like = dir.path().join("mystery_zip.bin");
    fs::write(&zip_like, b"PK\x03\x04rest of file").unwrap();
    assert_eq!(ArchiveFormat::sniff(&zip_like), Some(ArchiveFormat::Zip));

    let sevenz_like = dir.path().join("mystery_7z.bin");
    fs::write(&sevenz_like, b"7z\xBC\xAF\x27\x1Cpayload").unwrap();
    assert_eq!(
        ArchiveFormat::sniff(&sevenz_like),
        Some(ArchiveFormat::SevenZ)
    );

    let rar_like = dir.path().join("mystery_rar.bin");
    fs::write(&rar_like, b"Rar!\x1A\x07\x00data").unwrap();
    assert_eq!(ArchiveFormat::sniff(&rar_like), Some(ArchiveFormat::Rar));

    let garbage = dir.path().join("garbage.bin");
    fs::write(&garbage, b"not an archive at all").unwrap();
    assert_eq!(ArchiveFormat::sniff(&garbage), None);
    assert_eq!(ArchiveFormat::detect(&garbage), None);
}

#[test]
fn test_detect_prefers_extension_then_magic() {
    let dir = TempDir::new().unwrap();

    // No useful extension, but a real zip signature.
    let renamed = create_test_zip(dir.path(), "download", &[("a.txt", b"data")]);
    assert_eq!(ArchiveFormat::detect(&renamed), Some(ArchiveFormat::Zip));
}

#[test]
fn test_extract_zip_basic() {
    let dir = TempDir::new().unwrap();
    let zip_path = create_test_zip(
        dir.path(),
        "mod_pack.zip",
        &[
            ("readme.txt", b"hello".as_slice()),
            ("meshes/interface/logo.nif", b"mesh bytes".as_slice()),
        ],
    );

    let dest = dir.path().join("out");
    let count = extract_archive(&zip_path, &dest, None).unwrap();

    assert_eq!(count, 2);
    assert!(dest.join("readme.txt").exists());
    assert_eq!(
        fs::read(dest.join("meshes").join("interface").join("logo.nif")).unwrap(),
        b"mesh bytes"
    );
}

#[test]
fn test_extract_corrupt_zip() {
    let dir = TempDir::new().unwrap();
    let zip_path = dir.path().join("corrupt.zip");
    fs::write(&zip_path, b"not a real zip file").unwrap();

    let result = extract_archive(&zip_path, &dir.path().join("out"), None);
    assert!(result.is_err());
}

#[test]
fn test_extract_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mod.tar.gz");
    fs::write(&path, b"\x1f\x8b pretend gzip").unwrap();

    let err = extract_archive(&path, &dir.path().join("out"), None).unwrap_err();
    assert!(err.to_string().contains("unsupported archive format"));
}

#[test]
fn test_extract_skips_unsafe_entries() {
    let dir = TempDir::new().unwrap();
    let zip_path = create_test_zip(
        dir.path(),
        "sneaky.zip",
        &[
            ("../escape.txt", b"outside".as_slice()),
            ("inside.txt", b"inside".as_slice()),
        ],
    );

    let dest = dir.path().join("out");
    let count = extract_archive(&zip_path, &dest, None).unwrap();

    assert_eq!(count, 1);
    assert!(dest.join("inside.txt").exists());
    assert!(!dir.path().join("escape.txt").exists());
}

/// Helper: create a password-protected ZIP.
fn create_encrypted_zip(
    dir: &Path,
    name: &str,
    password: &str,
    files: &[(&str, &[u8])],
) -> PathBuf {
    use zip::unstable::write::FileOptionsExt;
    let zip_path = dir.join(name);
    let file = fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .with_deprecated_encryption(password.as_bytes());

    for (entry_name, content) in files {
        writer.start_file(entry_name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
    zip_path
}

#[test]
fn test_extract_zip_with_password() {
    let dir = TempDir::new().unwrap();
    let zip_path = create_encrypted_zip(
        dir.path(),
        "secret.zip",
        "mypassword",
        &[("data.txt", b"secret content")],
    );

    let dest = dir.path().join("out");
    let count = extract_archive(&zip_path, &dest, Some("mypassword")).unwrap();

    assert_eq!(count, 1);
    assert_eq!(
        fs::read_to_string(dest.join("data.txt")).unwrap(),
        "secret content"
    );
}

#[test]
fn test_pack_directory_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("Data");
    fs::create_dir_all(tree.join("Data").join("Meshes")).unwrap();
    fs::create_dir_all(tree.join("Data").join("Textures")).unwrap();
    fs::write(tree.join("Data").join("Meshes").join("menu.nif"), b"mesh").unwrap();
    fs::write(tree.join("Data").join("Textures").join("menu.dds"), b"tex").unwrap();

    let first = dir.path().join("first.zip");
    let second = dir.path().join("second.zip");
    assert_eq!(pack_directory(&tree, &first).unwrap(), 2);
    assert_eq!(pack_directory(&tree, &second).unwrap(), 2);

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_pack_directory_entries_include_base_dir() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("Data");
    fs::create_dir_all(tree.join("Meshes")).unwrap();
    fs::write(tree.join("Meshes").join("menu.nif"), b"mesh").unwrap();

    let archive_path = dir.path().join("out.zip");
    pack_directory(&tree, &archive_path).unwrap();

    let file = fs::File::open(&archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 1);

    let entry = archive.by_index(0).unwrap();
    assert_eq!(entry.name(), "Data/Meshes/menu.nif");
    assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
}

#[test]
fn test_pack_then_extract_round_trips() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("Data");
    fs::create_dir_all(&tree).unwrap();
    fs::write(tree.join("payload.bin"), b"\x00\x01\x02menu").unwrap();

    let archive_path = dir.path().join("round.zip");
    pack_directory(&tree, &archive_path).unwrap();

    let dest = dir.path().join("unpacked");
    let count = extract_archive(&archive_path, &dest, None).unwrap();

    assert_eq!(count, 1);
    assert_eq!(
        fs::read(dest.join("Data").join("payload.bin")).unwrap(),
        b"\x00\x01\x02menu"
    );
}
