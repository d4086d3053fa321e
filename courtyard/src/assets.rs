use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::sprites::SpriteTable;

pub const DEFAULT_ROOT: &str = "assets";
pub const SPRITE_TABLE_FILE: &str = "stuff.file";
pub const ATLAS_FILE: &str = "stuff.png";

/// Where the game's two asset files live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    pub sprite_table: PathBuf,
    pub atlas: PathBuf,
}

impl AssetPaths {
    /// Both files inside `root`.
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            sprite_table: root.join(SPRITE_TABLE_FILE),
            atlas: root.join(ATLAS_FILE),
        }
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_ROOT)
    }
}

/// Decoded RGBA8 pixels, bottom row first.
///
/// Rows are stored from the bottom so that texture coordinate v = 0 is the
/// bottom edge of the image, which is how the sprite table's UVs are laid out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut image = image::load_from_memory(bytes)
            .context("Failed to decode image")?
            .to_rgba8();
        image::imageops::flip_vertical_in_place(&mut image);
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let image = Self::from_bytes(&bytes).with_context(|| format!("Failed to load {}", path.display()))?;
        log::info!("Loaded {}x{} atlas from {}", image.width, image.height, path.display());
        Ok(image)
    }
}

/// Everything loaded from disk at startup.
pub struct Assets {
    pub sprites: SpriteTable,
    pub atlas: TextureImage,
}

impl Assets {
    /// Load the atlas and sprite table.
    ///
    /// A missing or corrupt atlas is an error. A short or missing sprite
    /// table is tolerated; see [`SpriteTable::load`].
    pub fn load(paths: &AssetPaths) -> Result<Self> {
        let atlas = TextureImage::load(&paths.atlas)?;
        let sprites = SpriteTable::load(&paths.sprite_table);
        Ok(Self { sprites, atlas })
    }
}
