use std::collections::HashMap;

use image::{RgbaImage, imageops};
use log::{debug, info};

use super::frame::SpriteKey;
use crate::assets::{AssetSource, load_image};
use crate::config::DemoConfig;
use crate::error::LoadFailure;
use crate::tilemap::{TileImageSource, TileLayer, TileMap, Tileset};

// ── TileImages ───────────────────────────────────────────────────────────────

/// Decoded tile bitmaps keyed by tileset-local tile id.
#[derive(Clone, Debug, Default)]
pub struct TileImages {
    images: HashMap<u32, RgbaImage>,
}

impl TileImages {
    /// Decode every tile of the map's first tileset. A map without tilesets
    /// yields an empty table.
    pub fn from_map(assets: &dyn AssetSource, map: &TileMap) -> Result<Self, LoadFailure> {
        let Some(tileset) = map.tilesets.first() else {
            return Ok(Self::default());
        };
        let images = match &tileset.images {
            TileImageSource::Collection(tiles) => {
                let mut images = HashMap::with_capacity(tiles.len());
                for tile in tiles {
                    images.insert(tile.id, load_image(assets, &tile.image)?);
                }
                images
            }
            TileImageSource::Sheet { image, columns, margin, spacing } => {
                let sheet = load_image(assets, image)?;
                slice_sheet(&sheet, tileset, *columns, *margin, *spacing)
            }
        };
        info!("decoded {} tile image(s) from tileset '{}'", images.len(), tileset.name);
        Ok(Self { images })
    }

    pub fn get(&self, id: u32) -> Option<&RgbaImage> {
        self.images.get(&id)
    }

    pub fn insert(&mut self, id: u32, image: RgbaImage) {
        self.images.insert(id, image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Fail unless every tile used by `layer` comes from the first tileset
    /// and has an image.
    pub fn ensure_covers(&self, layer: &TileLayer) -> Result<(), LoadFailure> {
        layer.ensure_first_tileset()?;
        match layer.tiles.iter().find(|t| !self.images.contains_key(&t.id)) {
            Some(tile) => Err(LoadFailure::MissingTileImage { id: tile.id }),
            None => Ok(()),
        }
    }
}

/// Cut a sheet into per-tile images. Tiles that would run past the sheet's
/// edge are left out.
fn slice_sheet(sheet: &RgbaImage, tileset: &Tileset, columns: u32, margin: u32, spacing: u32) -> HashMap<u32, RgbaImage> {
    let (tw, th) = (tileset.tile_width, tileset.tile_height);
    let mut images = HashMap::new();
    if columns == 0 || tw == 0 || th == 0 {
        return images;
    }
    for id in 0..tileset.tile_count {
        let x = margin + (id % columns) * (tw + spacing);
        let y = margin + (id / columns) * (th + spacing);
        if x + tw > sheet.width() || y + th > sheet.height() {
            debug!("tileset '{}': tile {id} lies outside the sheet", tileset.name);
            continue;
        }
        images.insert(id, imageops::crop_imm(sheet, x, y, tw, th).to_image());
    }
    images
}

// ── SpriteBank ───────────────────────────────────────────────────────────────

/// Every image the demo draws.
#[derive(Clone, Debug)]
pub struct SpriteBank {
    pub tiles: TileImages,
    pub coins: RgbaImage,
    pub actor: RgbaImage,
}

impl SpriteBank {
    pub fn load(assets: &dyn AssetSource, map: &TileMap, config: &DemoConfig) -> Result<Self, LoadFailure> {
        Ok(Self {
            tiles: TileImages::from_map(assets, map)?,
            coins: load_image(assets, &config.coin_image)?,
            actor: load_image(assets, &config.actor_image)?,
        })
    }

    pub fn get(&self, key: SpriteKey) -> Option<&RgbaImage> {
        match key {
            SpriteKey::Tile(id) => self.tiles.get(id),
            SpriteKey::Coins => Some(&self.coins),
            SpriteKey::Actor => Some(&self.actor),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
