//! Sprite identifiers and the texture-region table loaded at startup.
//!
//! The table file is a little-endian blob: an 8-byte header
//! `{payload_size: u32, padding: u32}` followed by `payload_size / 24`
//! records of `{min_uv: [f32; 2], max_uv: [f32; 2], center: [f32; 2]}`.
//! Records are stored in [`SpriteId`] order.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::math::Vec2;

/// Symbolic name of every region in the sprite sheet, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Space,
    MapRight,
    MapLeft,
    MapMiddle,
    Player,
    PlayerHolding,
    Crystal,
    Apple,
    Boards,
    Bridge,
    Pickaxe,
    LongKnife,
    Key,
    PickaxeHead,
    Rope,
    Knife,
    Coin,
    Hole,
    Stick,
    Rod,
    Rock,
    Door,
    Scale,
    ScaleUnbalanced,
}

const LETTERS: [SpriteId; 26] = [
    SpriteId::A,
    SpriteId::B,
    SpriteId::C,
    SpriteId::D,
    SpriteId::E,
    SpriteId::F,
    SpriteId::G,
    SpriteId::H,
    SpriteId::I,
    SpriteId::J,
    SpriteId::K,
    SpriteId::L,
    SpriteId::M,
    SpriteId::N,
    SpriteId::O,
    SpriteId::P,
    SpriteId::Q,
    SpriteId::R,
    SpriteId::S,
    SpriteId::T,
    SpriteId::U,
    SpriteId::V,
    SpriteId::W,
    SpriteId::X,
    SpriteId::Y,
    SpriteId::Z,
];

impl SpriteId {
    /// Number of identifiers; a complete table has exactly this many records.
    pub const COUNT: usize = SpriteId::ScaleUnbalanced as usize + 1;

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Glyph sprite for an upper-case letter or a space.
    pub fn glyph(c: char) -> Option<SpriteId> {
        match c {
            ' ' => Some(SpriteId::Space),
            'A'..='Z' => Some(LETTERS[(c as u8 - b'A') as usize]),
            _ => None,
        }
    }
}

/// Texture-space rectangle of one sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteData {
    pub min_uv: Vec2,
    pub max_uv: Vec2,
    pub center: Vec2,
}

impl SpriteData {
    pub const RECORD_SIZE: usize = 6 * 4;

    fn from_bytes(bytes: &[u8; Self::RECORD_SIZE]) -> Self {
        let float = |i: usize| {
            f32::from_le_bytes([bytes[i * 4], bytes[i * 4 + 1], bytes[i * 4 + 2], bytes[i * 4 + 3]])
        };
        Self {
            min_uv: Vec2::new(float(0), float(1)),
            max_uv: Vec2::new(float(2), float(3)),
            center: Vec2::new(float(4), float(5)),
        }
    }

    fn to_bytes(self) -> [u8; Self::RECORD_SIZE] {
        let fields = [
            self.min_uv.x,
            self.min_uv.y,
            self.max_uv.x,
            self.max_uv.y,
            self.center.x,
            self.center.y,
        ];
        let mut bytes = [0u8; Self::RECORD_SIZE];
        for (chunk, value) in bytes.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }
}

#[derive(Debug, Error)]
pub enum SpriteTableError {
    #[error("failed to read sprite table header: {0}")]
    Header(#[source] io::Error),

    #[error("sprite table truncated: read {read} of {expected} records")]
    Records {
        read: usize,
        expected: usize,
        #[source]
        source: io::Error,
    },
}

/// Dense table of sprite regions indexed by [`SpriteId`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteTable {
    sprites: Vec<SpriteData>,
}

impl SpriteTable {
    const HEADER_SIZE: usize = 8;

    pub fn new(sprites: Vec<SpriteData>) -> Self {
        Self { sprites }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// True when every [`SpriteId`] has a record.
    pub fn is_complete(&self) -> bool {
        self.sprites.len() >= SpriteId::COUNT
    }

    /// `None` only when the table on disk was short.
    pub fn get(&self, id: SpriteId) -> Option<&SpriteData> {
        self.sprites.get(id.index())
    }

    pub fn records(&self) -> &[SpriteData] {
        &self.sprites
    }

    /// Read a complete table, failing on any short read.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, SpriteTableError> {
        let mut sprites = Vec::new();
        read_into(reader, &mut sprites)?;
        Ok(Self { sprites })
    }

    /// Load the table from disk, keeping whatever could be read.
    ///
    /// A missing file or unreadable header yields an empty table; a
    /// truncated payload yields the records before the truncation.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                log::error!("Failed to open sprite table {}: {err}", path.display());
                return Self::default();
            }
        };

        let mut sprites = Vec::new();
        match read_into(BufReader::new(file), &mut sprites) {
            Ok(()) => log::info!("Loaded {} sprites from {}", sprites.len(), path.display()),
            Err(err) => log::error!("Reading {} failed: {err}", path.display()),
        }

        let table = Self { sprites };
        if !table.is_complete() {
            log::warn!(
                "Sprite table has {} of {} records; missing sprites will not be drawn",
                table.len(),
                SpriteId::COUNT
            );
        }
        table
    }

    /// Serialize in the on-disk layout.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let payload = (self.sprites.len() * SpriteData::RECORD_SIZE) as u32;
        writer.write_all(&payload.to_le_bytes())?;
        writer.write_all(&0u32.to_le_bytes())?;
        for sprite in &self.sprites {
            writer.write_all(&sprite.to_bytes())?;
        }
        writer.flush()
    }
}

fn read_into<R: Read>(mut reader: R, sprites: &mut Vec<SpriteData>) -> Result<(), SpriteTableError> {
    let mut header = [0u8; SpriteTable::HEADER_SIZE];
    reader
        .read_exact(&mut header)
        .map_err(SpriteTableError::Header)?;

    let payload = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
    let expected = payload / SpriteData::RECORD_SIZE;
    // The header is untrusted; don't let it drive a huge allocation.
    sprites.reserve(expected.min(SpriteId::COUNT * 4));

    let mut record = [0u8; SpriteData::RECORD_SIZE];
    for read in 0..expected {
        if let Err(source) = reader.read_exact(&mut record) {
            return Err(SpriteTableError::Records {
                read,
                expected,
                source,
            });
        }
        sprites.push(SpriteData::from_bytes(&record));
    }
    Ok(())
}
