//! In-memory NIF document with byte-preserving block storage.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::header::NifHeader;
use super::strings::{read_sized_string, write_sized_string};
use super::{NifError, NifResult};

/// Block types whose payload starts with a name index into the header
/// string table. These are the renderable sub-meshes of the scene graph.
const SHAPE_TYPES: [&[u8]; 6] = [
    b"NiTriShape",
    b"NiTriStrips",
    b"BSTriShape",
    b"BSDynamicTriShape",
    b"BSSubIndexTriShape",
    b"BSMeshLODTriShape",
];

const TEXTURE_SET_TYPE: &[u8] = b"BSShaderTextureSet";

/// Decoded texture path list from a `BSShaderTextureSet` block.
///
/// Slot 0 holds the diffuse map; the remaining slots carry normal, glow and
/// other maps that the converter leaves alone.
#[derive(Debug, Clone)]
pub struct TextureSet {
    textures: Vec<Vec<u8>>,
}

impl TextureSet {
    fn from_bytes(bytes: &[u8]) -> NifResult<Self> {
        let mut cursor = io::Cursor::new(bytes);
        let count = cursor.read_u32::<LittleEndian>()?;
        if count > 64 {
            return Err(NifError::Corrupt(format!(
                "texture set with {count} slots"
            )));
        }
        let mut textures = Vec::with_capacity(count as usize);
        for _ in 0..count {
            textures.push(read_sized_string(&mut cursor)?);
        }
        if cursor.position() != bytes.len() as u64 {
            return Err(NifError::Corrupt(
                "trailing bytes in texture set block".into(),
            ));
        }
        Ok(Self { textures })
    }

    fn write_into<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.textures.len() as u32)?;
        for texture in &self.textures {
            write_sized_string(writer, texture)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        4 + self.textures.iter().map(|t| 4 + t.len()).sum::<usize>()
    }

    pub fn slots(&self) -> usize {
        self.textures.len()
    }

    /// Texture path stored in a slot, if the slot exists.
    pub fn slot(&self, index: usize) -> Option<&[u8]> {
        self.textures.get(index).map(Vec::as_slice)
    }

    /// Replaces a slot, growing the list with empty paths as needed.
    pub fn set_slot(&mut self, index: usize, value: &[u8]) {
        if self.textures.len() <= index {
            self.textures.resize(index + 1, Vec::new());
        }
        self.textures[index] = value.to_vec();
    }
}

#[derive(Debug, Clone)]
pub enum Block {
    TextureSet(TextureSet),
    Raw(Vec<u8>),
}

impl Block {
    fn encoded_len(&self) -> usize {
        match self {
            Block::TextureSet(set) => set.encoded_len(),
            Block::Raw(bytes) => bytes.len(),
        }
    }
}

/// A loaded NIF file: parsed header, block list and verbatim footer.
#[derive(Debug, Clone)]
pub struct NifDocument {
    header: NifHeader,
    blocks: Vec<Block>,
    footer: Vec<u8>,
}

impl NifDocument {
    /// Parses a document from a reader positioned at the version line.
    pub fn read<R: Read>(reader: &mut R) -> NifResult<Self> {
        let header = NifHeader::read(reader)?;
        let mut blocks = Vec::with_capacity(header.num_blocks());
        for index in 0..header.num_blocks() {
            let mut bytes = vec![0u8; header.block_sizes[index] as usize];
            reader.read_exact(&mut bytes)?;
            let block = if header.block_type_name(index) == Some(TEXTURE_SET_TYPE) {
                Block::TextureSet(TextureSet::from_bytes(&bytes)?)
            } else {
                Block::Raw(bytes)
            };
            blocks.push(block);
        }
        let mut footer = Vec::new();
        reader.read_to_end(&mut footer)?;
        Ok(Self {
            header,
            blocks,
            footer,
        })
    }

    pub fn load(path: &Path) -> NifResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read(&mut reader)
    }

    /// Serializes the document, recomputing the block size table so that
    /// re-encoded texture sets stay consistent with their new payloads.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let sizes: Vec<u32> = self
            .blocks
            .iter()
            .map(|block| block.encoded_len() as u32)
            .collect();
        self.header.write(writer, &sizes)?;
        for block in &self.blocks {
            match block {
                Block::TextureSet(set) => set.write_into(writer)?,
                Block::Raw(bytes) => writer.write_all(bytes)?,
            }
        }
        writer.write_all(&self.footer)
    }

    pub fn save(&self, path: &Path) -> NifResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn header(&self) -> &NifHeader {
        &self.header
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn texture_sets(&self) -> impl Iterator<Item = &TextureSet> {
        self.blocks.iter().filter_map(|block| match block {
            Block::TextureSet(set) => Some(set),
            Block::Raw(_) => None,
        })
    }

    pub fn texture_sets_mut(&mut self) -> impl Iterator<Item = &mut TextureSet> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::TextureSet(set) => Some(set),
            Block::Raw(_) => None,
        })
    }

    /// Names of the renderable shapes, in block order. Unnamed shapes are
    /// reported by block number.
    pub fn shape_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for (index, block) in self.blocks.iter().enumerate() {
            let Some(type_name) = self.header.block_type_name(index) else {
                continue;
            };
            if !SHAPE_TYPES.contains(&type_name) {
                continue;
            }
            let Block::Raw(bytes) = block else {
                continue;
            };
            let name = bytes
                .get(..4)
                .and_then(|raw| raw.try_into().ok())
                .map(u32::from_le_bytes)
                .and_then(|string_index| self.header.string(string_index))
                .map(|raw| String::from_utf8_lossy(raw).into_owned())
                .unwrap_or_else(|| format!("shape #{index}"));
            names.push(name);
        }
        names
    }
}
