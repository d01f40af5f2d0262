use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

use byteorder::{LittleEndian, WriteBytesExt};

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn write_sized(out: &mut Vec<u8>, value: &[u8]) {
    out.write_u32::<LittleEndian>(value.len() as u32).unwrap();
    out.extend_from_slice(value);
}

fn write_export(out: &mut Vec<u8>, value: &[u8]) {
    out.write_u8(value.len() as u8 + 1).unwrap();
    out.extend_from_slice(value);
    out.write_u8(0).unwrap();
}

/// Builds a minimal Skyrim logo mesh: a root node, one tri shape named
/// `SkyrimLogo` and one texture set whose diffuse slot is `diffuse`.
pub fn build_logo_nif(diffuse: &[u8]) -> Vec<u8> {
    let mut root = Vec::new();
    root.write_u32::<LittleEndian>(1).unwrap(); // name: MainMenuRoot
    root.extend_from_slice(&[0u8; 16]);

    let mut shape = Vec::new();
    shape.write_u32::<LittleEndian>(0).unwrap(); // name: SkyrimLogo
    shape.extend_from_slice(&[0xAA; 20]);

    let mut set = Vec::new();
    set.write_u32::<LittleEndian>(2).unwrap();
    write_sized(&mut set, diffuse);
    write_sized(&mut set, b"textures\\logo\\skyrim_logo_n.dds");

    let mut out = Vec::new();
    out.extend_from_slice(b"Gamebryo File Format, Version 20.2.0.7\n");
    out.write_u32::<LittleEndian>(0x1402_0007).unwrap();
    out.write_u8(1).unwrap();
    out.write_u32::<LittleEndian>(12).unwrap(); // user version
    out.write_u32::<LittleEndian>(3).unwrap(); // blocks

    out.write_u32::<LittleEndian>(83).unwrap(); // stream version
    write_export(&mut out, b"converter tests");
    write_export(&mut out, b"");
    write_export(&mut out, b"");

    out.write_u16::<LittleEndian>(3).unwrap();
    for name in [
        b"BSFadeNode".as_slice(),
        b"BSTriShape",
        b"BSShaderTextureSet",
    ] {
        write_sized(&mut out, name);
    }
    for type_index in [0u16, 1, 2] {
        out.write_u16::<LittleEndian>(type_index).unwrap();
    }
    for block in [&root, &shape, &set] {
        out.write_u32::<LittleEndian>(block.len() as u32).unwrap();
    }

    out.write_u32::<LittleEndian>(2).unwrap();
    out.write_u32::<LittleEndian>(12).unwrap();
    write_sized(&mut out, b"SkyrimLogo");
    write_sized(&mut out, b"MainMenuRoot");

    out.write_u32::<LittleEndian>(0).unwrap(); // groups

    out.extend_from_slice(&root);
    out.extend_from_slice(&shape);
    out.extend_from_slice(&set);

    out.write_u32::<LittleEndian>(1).unwrap(); // footer: one root
    out.write_u32::<LittleEndian>(0).unwrap();
    out
}

/// Zips the given (name, content) entries into `dir/name`.
pub fn create_mod_zip(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let zip_path = dir.join(name);
    let file = fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (entry_name, content) in entries {
        writer.start_file(entry_name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
    zip_path
}
