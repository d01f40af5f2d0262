//! Length-prefixed string primitives shared by the header and block codecs.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{NifError, NifResult};

/// Longest length prefix accepted for any string in an untrusted file.
const MAX_STRING_LEN: u32 = 0x1000;

/// Reads a `u32` length-prefixed string with no terminator.
pub(super) fn read_sized_string<R: Read>(reader: &mut R) -> NifResult<Vec<u8>> {
    let len = reader.read_u32::<LittleEndian>()?;
    if len > MAX_STRING_LEN {
        return Err(NifError::Corrupt(format!(
            "string length {len} out of range"
        )));
    }
    let mut value = vec![0u8; len as usize];
    reader.read_exact(&mut value)?;
    Ok(value)
}

pub(super) fn write_sized_string<W: Write>(writer: &mut W, value: &[u8]) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(value.len() as u32)?;
    writer.write_all(value)
}

/// Reads a `u8` length-prefixed export string. The length counts the
/// mandatory null terminator, which is stripped from the returned value.
pub(super) fn read_export_string<R: Read>(reader: &mut R) -> NifResult<Vec<u8>> {
    let len = reader.read_u8()?;
    if len == 0 {
        return Err(NifError::Corrupt("export string with zero length".into()));
    }
    let mut value = vec![0u8; len as usize];
    reader.read_exact(&mut value)?;
    match value.pop() {
        Some(0) => Ok(value),
        _ => Err(NifError::Corrupt("export string missing terminator".into())),
    }
}

pub(super) fn write_export_string<W: Write>(writer: &mut W, value: &[u8]) -> io::Result<()> {
    writer.write_u8(value.len() as u8 + 1)?;
    writer.write_all(value)?;
    writer.write_u8(0)
}
