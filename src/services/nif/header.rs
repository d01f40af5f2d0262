//! NIF header parsing and serialization.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::strings::{
    read_export_string, read_sized_string, write_export_string, write_sized_string,
};
use super::{NifError, NifResult};

/// The only stream version this codec understands (20.2.0.7).
pub const SUPPORTED_VERSION: u32 = 0x1402_0007;

const HEADER_LINE_MAX: usize = 128;
const MAX_TABLE_ENTRIES: u32 = 0x0010_0000;
const MAX_BLOCK_SIZE: u32 = 0x1000_0000;

const MAGIC_GAMEBRYO: &[u8] = b"Gamebryo File Format";
const MAGIC_NETIMMERSE: &[u8] = b"NetImmerse File Format";

/// Bethesda stream metadata, present when `user_version >= 12`.
#[derive(Debug, Clone)]
pub struct BsStreamInfo {
    pub stream_version: u32,
    pub author: Vec<u8>,
    /// Extra field written by streams newer than 130.
    pub unknown: Option<u32>,
    pub process_script: Vec<u8>,
    pub export_script: Vec<u8>,
    /// Only stream version 130 carries this.
    pub max_filepath: Option<Vec<u8>>,
}

/// Parsed NIF header. String-valued fields keep their raw bytes so that
/// writing an unmodified header reproduces the input exactly.
#[derive(Debug, Clone)]
pub struct NifHeader {
    /// Version line including the trailing newline.
    pub header_line: Vec<u8>,
    pub version: u32,
    pub user_version: u32,
    pub bs_info: Option<BsStreamInfo>,
    pub block_types: Vec<Vec<u8>>,
    /// Per-block index into `block_types`, high bit preserved as read.
    pub block_type_index: Vec<u16>,
    /// Block sizes as read; superseded on write by recomputed sizes.
    pub block_sizes: Vec<u32>,
    pub strings: Vec<Vec<u8>>,
    pub max_string_length: u32,
    pub groups: Vec<u32>,
}

impl NifHeader {
    pub fn read<R: Read>(reader: &mut R) -> NifResult<Self> {
        let header_line = read_header_line(reader)?;
        if !(header_line.starts_with(MAGIC_GAMEBRYO) || header_line.starts_with(MAGIC_NETIMMERSE))
        {
            return Err(NifError::NotNif);
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != SUPPORTED_VERSION {
            return Err(NifError::UnsupportedVersion(version));
        }
        let endian = reader.read_u8()?;
        if endian != 1 {
            return Err(NifError::Corrupt(format!(
                "unsupported endianness marker {endian}"
            )));
        }
        let user_version = reader.read_u32::<LittleEndian>()?;

        let num_blocks = reader.read_u32::<LittleEndian>()?;
        if num_blocks > MAX_TABLE_ENTRIES {
            return Err(NifError::Corrupt(format!(
                "block count {num_blocks} out of range"
            )));
        }

        let bs_info = if user_version >= 12 {
            Some(read_bs_info(reader)?)
        } else {
            None
        };

        let num_block_types = reader.read_u16::<LittleEndian>()?;
        let mut block_types = Vec::with_capacity(num_block_types as usize);
        for _ in 0..num_block_types {
            block_types.push(read_sized_string(reader)?);
        }

        let mut block_type_index = Vec::with_capacity(num_blocks as usize);
        for _ in 0..num_blocks {
            let index = reader.read_u16::<LittleEndian>()?;
            if ((index & 0x7fff) as usize) >= block_types.len() {
                return Err(NifError::Corrupt(format!(
                    "block type index {index} out of range"
                )));
            }
            block_type_index.push(index);
        }

        let mut block_sizes = Vec::with_capacity(num_blocks as usize);
        for _ in 0..num_blocks {
            let size = reader.read_u32::<LittleEndian>()?;
            if size > MAX_BLOCK_SIZE {
                return Err(NifError::Corrupt(format!(
                    "block size {size} out of range"
                )));
            }
            block_sizes.push(size);
        }

        let num_strings = reader.read_u32::<LittleEndian>()?;
        if num_strings > MAX_TABLE_ENTRIES {
            return Err(NifError::Corrupt(format!(
                "string count {num_strings} out of range"
            )));
        }
        let max_string_length = reader.read_u32::<LittleEndian>()?;
        let mut strings = Vec::with_capacity(num_strings as usize);
        for _ in 0..num_strings {
            strings.push(read_sized_string(reader)?);
        }

        let num_groups = reader.read_u32::<LittleEndian>()?;
        if num_groups > MAX_TABLE_ENTRIES {
            return Err(NifError::Corrupt(format!(
                "group count {num_groups} out of range"
            )));
        }
        let mut groups = Vec::with_capacity(num_groups as usize);
        for _ in 0..num_groups {
            groups.push(reader.read_u32::<LittleEndian>()?);
        }

        Ok(Self {
            header_line,
            version,
            user_version,
            bs_info,
            block_types,
            block_type_index,
            block_sizes,
            strings,
            max_string_length,
            groups,
        })
    }

    /// Writes the header with the given block size table, which must have
    /// one entry per block.
    pub fn write<W: Write>(&self, writer: &mut W, block_sizes: &[u32]) -> io::Result<()> {
        writer.write_all(&self.header_line)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u8(1)?;
        writer.write_u32::<LittleEndian>(self.user_version)?;
        writer.write_u32::<LittleEndian>(self.block_type_index.len() as u32)?;

        if let Some(info) = &self.bs_info {
            writer.write_u32::<LittleEndian>(info.stream_version)?;
            write_export_string(writer, &info.author)?;
            if let Some(unknown) = info.unknown {
                writer.write_u32::<LittleEndian>(unknown)?;
            }
            write_export_string(writer, &info.process_script)?;
            write_export_string(writer, &info.export_script)?;
            if let Some(path) = &info.max_filepath {
                write_export_string(writer, path)?;
            }
        }

        writer.write_u16::<LittleEndian>(self.block_types.len() as u16)?;
        for name in &self.block_types {
            write_sized_string(writer, name)?;
        }
        for index in &self.block_type_index {
            writer.write_u16::<LittleEndian>(*index)?;
        }
        for size in block_sizes {
            writer.write_u32::<LittleEndian>(*size)?;
        }

        writer.write_u32::<LittleEndian>(self.strings.len() as u32)?;
        writer.write_u32::<LittleEndian>(self.max_string_length)?;
        for value in &self.strings {
            write_sized_string(writer, value)?;
        }

        writer.write_u32::<LittleEndian>(self.groups.len() as u32)?;
        for group in &self.groups {
            writer.write_u32::<LittleEndian>(*group)?;
        }
        Ok(())
    }

    pub fn num_blocks(&self) -> usize {
        self.block_type_index.len()
    }

    /// Type name of a block, with the phantom high bit masked off.
    pub fn block_type_name(&self, block: usize) -> Option<&[u8]> {
        let index = *self.block_type_index.get(block)? & 0x7fff;
        self.block_types.get(index as usize).map(Vec::as_slice)
    }

    /// Looks up an entry in the header string table.
    pub fn string(&self, index: u32) -> Option<&[u8]> {
        self.strings.get(index as usize).map(Vec::as_slice)
    }
}

fn read_header_line<R: Read>(reader: &mut R) -> NifResult<Vec<u8>> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read_exact(&mut byte).is_err() {
            return Err(NifError::NotNif);
        }
        line.push(byte[0]);
        if byte[0] == b'\n' {
            return Ok(line);
        }
        if line.len() >= HEADER_LINE_MAX {
            return Err(NifError::NotNif);
        }
    }
}

fn read_bs_info<R: Read>(reader: &mut R) -> NifResult<BsStreamInfo> {
    let stream_version = reader.read_u32::<LittleEndian>()?;
    let author = read_export_string(reader)?;
    let unknown = if stream_version > 130 {
        Some(reader.read_u32::<LittleEndian>()?)
    } else {
        None
    };
    let process_script = read_export_string(reader)?;
    let export_script = read_export_string(reader)?;
    let max_filepath = if stream_version == 130 {
        Some(read_export_string(reader)?)
    } else {
        None
    };
    Ok(BsStreamInfo {
        stream_version,
        author,
        unknown,
        process_script,
        export_script,
        max_filepath,
    })
}
