//! Tiled map loading.
//!
//! Supports orthogonal, finite maps saved as TMX (XML) or Tiled JSON, with
//! embedded or external tilesets. Layer data may be `csv`, plain XML
//! `<tile gid>` elements, or a JSON array of gids. Compressed or base64
//! layer data is rejected.

use log::info;
use roxmltree::{Document, Node};
use serde::Deserialize;

use crate::assets::{AssetSource, join, parent_dir};
use crate::error::LoadFailure;

/// Tiled stores flip/rotation flags in the top four bits of a gid.
const GID_MASK: u32 = 0x0FFF_FFFF;

// ── Map model ────────────────────────────────────────────────────────────────

/// One cell of a tile layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileRef {
    /// Tileset-local tile id. Empty cells report 0.
    pub id: u32,
    /// Index into [`TileMap::tilesets`], or `None` for an empty cell.
    pub tileset: Option<usize>,
    /// Row-major position inside the layer.
    pub index: usize,
}

impl TileRef {
    pub fn is_empty(&self) -> bool {
        self.tileset.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct TileLayer {
    pub name: String,
    /// Row-major, `width * height` entries.
    pub tiles: Vec<TileRef>,
}

impl TileLayer {
    pub fn ids(&self) -> Vec<u32> {
        self.tiles.iter().map(|t| t.id).collect()
    }

    /// Fail if any non-empty tile comes from a tileset other than the first.
    /// Local ids are only unique within one tileset.
    pub fn ensure_first_tileset(&self) -> Result<(), LoadFailure> {
        let foreign = self.tiles.iter().find_map(|t| match t.tileset {
            Some(tileset) if tileset != 0 => Some((t.index, tileset)),
            _ => None,
        });
        match foreign {
            Some((index, tileset)) => Err(LoadFailure::ForeignTileset { index, tileset }),
            None => Ok(()),
        }
    }
}

/// A single tile of an image-collection tileset.
#[derive(Clone, Debug, PartialEq)]
pub struct TilesetTile {
    pub id: u32,
    /// Asset path of the tile's image.
    pub image: String,
}

/// Where a tileset's pixels come from.
#[derive(Clone, Debug, PartialEq)]
pub enum TileImageSource {
    /// Every tile has its own image file.
    Collection(Vec<TilesetTile>),
    /// One image sliced into a grid of tiles.
    Sheet {
        image: String,
        columns: u32,
        margin: u32,
        spacing: u32,
    },
}

#[derive(Clone, Debug)]
pub struct Tileset {
    pub name: String,
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_count: u32,
    pub images: TileImageSource,
}

/// A loaded map. Immutable after load.
#[derive(Clone, Debug)]
pub struct TileMap {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    pub tile_width: u32,
    pub tile_height: u32,
    pub layers: Vec<TileLayer>,
    /// Sorted by `first_gid`.
    pub tilesets: Vec<Tileset>,
}

impl TileMap {
    /// Load a map, choosing the parser from the file extension.
    pub fn load(assets: &dyn AssetSource, path: &str) -> Result<Self, LoadFailure> {
        let text = assets.read_to_string(path)?;
        let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        let map = match extension.as_deref() {
            Some("tmx") => Self::parse_tmx(assets, path, &text)?,
            Some("tmj") | Some("json") => Self::parse_json(assets, path, &text)?,
            _ => return Err(LoadFailure::unsupported(path, "expected a .tmx, .tmj or .json map")),
        };
        info!(
            "loaded map {path}: {}x{} tiles of {}x{} px, {} layer(s), {} tileset(s)",
            map.width,
            map.height,
            map.tile_width,
            map.tile_height,
            map.layers.len(),
            map.tilesets.len()
        );
        Ok(map)
    }

    /// The layer that is drawn and walked on.
    pub fn base_layer(&self) -> Option<&TileLayer> {
        self.layers.first()
    }

    pub fn pixel_width(&self) -> u32 {
        self.tile_width * self.width as u32
    }

    pub fn pixel_height(&self) -> u32 {
        self.tile_height * self.height as u32
    }

    // ── TMX ──────────────────────────────────────────────────────────────

    pub fn parse_tmx(assets: &dyn AssetSource, path: &str, text: &str) -> Result<Self, LoadFailure> {
        let doc = Document::parse(text)
            .map_err(|e| LoadFailure::malformed(path, format!("malformed XML: {e}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "map" {
            return Err(LoadFailure::malformed(path, "root element must be <map>"));
        }
        check_layout(
            path,
            root.attribute("orientation"),
            root.attribute("infinite") == Some("1"),
        )?;

        let header = MapHeader {
            width: required_u32(path, root, "width")?,
            height: required_u32(path, root, "height")?,
            tile_width: required_u32(path, root, "tilewidth")?,
            tile_height: required_u32(path, root, "tileheight")?,
        };

        let dir = parent_dir(path);
        let mut tilesets = Vec::new();
        let mut layers = Vec::new();
        for child in root.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "tileset" => tilesets.push(tmx_tileset(assets, path, &dir, child)?),
                "layer" | "group" => collect_tmx_layers(path, child, &mut layers)?,
                _ => {}
            }
        }

        assemble(path, header, layers, tilesets)
    }

    // ── JSON ─────────────────────────────────────────────────────────────

    pub fn parse_json(assets: &dyn AssetSource, path: &str, text: &str) -> Result<Self, LoadFailure> {
        let raw: JsonMap = serde_json::from_str(text)
            .map_err(|e| LoadFailure::malformed(path, format!("malformed JSON: {e}")))?;
        check_layout(path, raw.orientation.as_deref(), raw.infinite)?;

        let dir = parent_dir(path);
        let mut tilesets = Vec::with_capacity(raw.tilesets.len());
        for entry in raw.tilesets {
            tilesets.push(json_tileset(assets, path, &dir, entry)?);
        }

        let mut layers = Vec::new();
        collect_json_layers(path, raw.layers, &mut layers)?;

        let header = MapHeader {
            width: raw.width,
            height: raw.height,
            tile_width: raw.tilewidth,
            tile_height: raw.tileheight,
        };
        assemble(path, header, layers, tilesets)
    }
}

// ── Shared assembly ──────────────────────────────────────────────────────────

struct MapHeader {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
}

/// A layer as read from the file: name plus raw gids.
struct RawLayer {
    name: String,
    gids: Vec<u32>,
}

fn check_layout(path: &str, orientation: Option<&str>, infinite: bool) -> Result<(), LoadFailure> {
    match orientation {
        None | Some("orthogonal") => {}
        Some(other) => {
            return Err(LoadFailure::unsupported(path, format!("{other} orientation")));
        }
    }
    if infinite {
        return Err(LoadFailure::unsupported(path, "infinite maps"));
    }
    Ok(())
}

fn assemble(
    path: &str,
    header: MapHeader,
    raw_layers: Vec<RawLayer>,
    mut tilesets: Vec<Tileset>,
) -> Result<TileMap, LoadFailure> {
    if header.width == 0 || header.height == 0 {
        return Err(LoadFailure::malformed(path, "map dimensions must be non-zero"));
    }
    if header.tile_width == 0 || header.tile_height == 0 {
        return Err(LoadFailure::malformed(path, "tile dimensions must be non-zero"));
    }
    tilesets.sort_by_key(|t| t.first_gid);

    let expected = header.width as usize * header.height as usize;
    let mut layers = Vec::with_capacity(raw_layers.len());
    for raw in raw_layers {
        if raw.gids.len() != expected {
            return Err(LoadFailure::malformed(
                path,
                format!("layer '{}' has {} tiles, expected {expected}", raw.name, raw.gids.len()),
            ));
        }
        let tiles = raw
            .gids
            .iter()
            .enumerate()
            .map(|(index, &gid)| resolve_gid(path, gid, index, &tilesets))
            .collect::<Result<Vec<_>, _>>()?;
        layers.push(TileLayer { name: raw.name, tiles });
    }

    Ok(TileMap {
        width: header.width as usize,
        height: header.height as usize,
        tile_width: header.tile_width,
        tile_height: header.tile_height,
        layers,
        tilesets,
    })
}

fn resolve_gid(path: &str, raw: u32, index: usize, tilesets: &[Tileset]) -> Result<TileRef, LoadFailure> {
    let gid = raw & GID_MASK;
    if gid == 0 {
        return Ok(TileRef { id: 0, tileset: None, index });
    }
    let (tileset, owner) = tilesets
        .iter()
        .enumerate()
        .rev()
        .find(|(_, t)| t.first_gid <= gid)
        .ok_or_else(|| LoadFailure::malformed(path, format!("gid {gid} is not covered by any tileset")))?;
    Ok(TileRef { id: gid - owner.first_gid, tileset: Some(tileset), index })
}

/// Column count of a sheet image when the file does not state it.
fn sheet_columns(image_width: u32, tile_width: u32, margin: u32, spacing: u32) -> u32 {
    let usable = image_width.saturating_sub(2 * margin) + spacing;
    usable / (tile_width + spacing).max(1)
}

// ── TMX helpers ──────────────────────────────────────────────────────────────

fn required_u32(path: &str, node: Node<'_, '_>, name: &str) -> Result<u32, LoadFailure> {
    let value = node.attribute(name).ok_or_else(|| {
        LoadFailure::malformed(path, format!("<{}> is missing '{name}'", node.tag_name().name()))
    })?;
    parse_u32(path, node, name, value)
}

fn optional_u32(path: &str, node: Node<'_, '_>, name: &str) -> Result<Option<u32>, LoadFailure> {
    node.attribute(name)
        .map(|value| parse_u32(path, node, name, value))
        .transpose()
}

fn parse_u32(path: &str, node: Node<'_, '_>, name: &str, value: &str) -> Result<u32, LoadFailure> {
    value.trim().parse().map_err(|_| {
        LoadFailure::malformed(
            path,
            format!("<{}> '{name}' is not a number: '{value}'", node.tag_name().name()),
        )
    })
}

fn tmx_tileset(
    assets: &dyn AssetSource,
    path: &str,
    dir: &str,
    node: Node<'_, '_>,
) -> Result<Tileset, LoadFailure> {
    let first_gid = required_u32(path, node, "firstgid")?;
    let Some(source) = node.attribute("source") else {
        return tmx_tileset_body(path, node, first_gid, dir);
    };

    let tileset_path = join(dir, source);
    if tileset_path.ends_with(".tsj") || tileset_path.ends_with(".json") {
        return external_json_tileset(assets, &tileset_path, first_gid);
    }
    let text = assets.read_to_string(&tileset_path)?;
    let doc = Document::parse(&text)
        .map_err(|e| LoadFailure::malformed(&tileset_path, format!("malformed XML: {e}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "tileset" {
        return Err(LoadFailure::malformed(&tileset_path, "root element must be <tileset>"));
    }
    tmx_tileset_body(&tileset_path, root, first_gid, &parent_dir(&tileset_path))
}

fn tmx_tileset_body(
    path: &str,
    node: Node<'_, '_>,
    first_gid: u32,
    image_dir: &str,
) -> Result<Tileset, LoadFailure> {
    let tile_width = required_u32(path, node, "tilewidth")?;
    let tile_height = required_u32(path, node, "tileheight")?;
    let tile_count = optional_u32(path, node, "tilecount")?.unwrap_or(0);
    let margin = optional_u32(path, node, "margin")?.unwrap_or(0);
    let spacing = optional_u32(path, node, "spacing")?.unwrap_or(0);

    let sheet = node.children().find(|n| n.has_tag_name("image"));
    let images = match sheet {
        Some(image) => {
            let source = image
                .attribute("source")
                .ok_or_else(|| LoadFailure::malformed(path, "<image> is missing 'source'"))?;
            let columns = match optional_u32(path, node, "columns")? {
                Some(c) if c > 0 => c,
                _ => sheet_columns(required_u32(path, image, "width")?, tile_width, margin, spacing),
            };
            TileImageSource::Sheet { image: join(image_dir, source), columns, margin, spacing }
        }
        None => {
            let mut tiles = Vec::new();
            for tile in node.children().filter(|n| n.has_tag_name("tile")) {
                let id = required_u32(path, tile, "id")?;
                let Some(image) = tile.children().find(|n| n.has_tag_name("image")) else {
                    continue;
                };
                let source = image
                    .attribute("source")
                    .ok_or_else(|| LoadFailure::malformed(path, format!("tile {id} <image> is missing 'source'")))?;
                tiles.push(TilesetTile { id, image: join(image_dir, source) });
            }
            TileImageSource::Collection(tiles)
        }
    };

    Ok(Tileset {
        name: node.attribute("name").unwrap_or_default().to_string(),
        first_gid,
        tile_width,
        tile_height,
        tile_count,
        images,
    })
}

fn collect_tmx_layers(path: &str, node: Node<'_, '_>, out: &mut Vec<RawLayer>) -> Result<(), LoadFailure> {
    if node.has_tag_name("group") {
        for child in node.children().filter(|n| n.has_tag_name("layer") || n.has_tag_name("group")) {
            collect_tmx_layers(path, child, out)?;
        }
        return Ok(());
    }

    let name = node.attribute("name").unwrap_or_default().to_string();
    let data = node
        .children()
        .find(|n| n.has_tag_name("data"))
        .ok_or_else(|| LoadFailure::malformed(path, format!("layer '{name}' has no <data>")))?;
    if let Some(compression) = data.attribute("compression") {
        return Err(LoadFailure::unsupported(path, format!("{compression} layer compression")));
    }

    let gids = match data.attribute("encoding") {
        Some("csv") => parse_csv(path, data.text().unwrap_or_default())?,
        None => data
            .children()
            .filter(|n| n.has_tag_name("tile"))
            .map(|tile| optional_u32(path, tile, "gid").map(|gid| gid.unwrap_or(0)))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(LoadFailure::unsupported(path, format!("{other} layer encoding")));
        }
    };
    out.push(RawLayer { name, gids });
    Ok(())
}

fn parse_csv(path: &str, text: &str) -> Result<Vec<u32>, LoadFailure> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| LoadFailure::malformed(path, format!("bad gid '{s}' in csv data")))
        })
        .collect()
}

// ── JSON helpers ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    orientation: Option<String>,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTileset>,
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    data: Option<JsonData>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    compression: Option<String>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonData {
    Gids(Vec<u32>),
    Encoded(String),
}

#[derive(Deserialize)]
struct JsonTileset {
    #[serde(default)]
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    tilecount: u32,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    image: Option<String>,
}

fn json_tileset(
    assets: &dyn AssetSource,
    path: &str,
    dir: &str,
    entry: JsonTileset,
) -> Result<Tileset, LoadFailure> {
    let source = match entry.source.clone() {
        Some(source) => source,
        None => return json_tileset_body(path, entry, dir),
    };

    let tileset_path = join(dir, &source);
    if tileset_path.ends_with(".tsx") {
        let text = assets.read_to_string(&tileset_path)?;
        let doc = Document::parse(&text)
            .map_err(|e| LoadFailure::malformed(&tileset_path, format!("malformed XML: {e}")))?;
        return tmx_tileset_body(&tileset_path, doc.root_element(), entry.firstgid, &parent_dir(&tileset_path));
    }
    external_json_tileset(assets, &tileset_path, entry.firstgid)
}

fn external_json_tileset(
    assets: &dyn AssetSource,
    tileset_path: &str,
    first_gid: u32,
) -> Result<Tileset, LoadFailure> {
    let text = assets.read_to_string(tileset_path)?;
    let mut external: JsonTileset = serde_json::from_str(&text)
        .map_err(|e| LoadFailure::malformed(tileset_path, format!("malformed JSON: {e}")))?;
    external.firstgid = first_gid;
    json_tileset_body(tileset_path, external, &parent_dir(tileset_path))
}

fn json_tileset_body(path: &str, raw: JsonTileset, image_dir: &str) -> Result<Tileset, LoadFailure> {
    if raw.tilewidth == 0 || raw.tileheight == 0 {
        return Err(LoadFailure::malformed(path, format!("tileset '{}' has no tile size", raw.name)));
    }
    let images = match raw.image {
        Some(image) => {
            let columns = if raw.columns > 0 {
                raw.columns
            } else {
                sheet_columns(raw.imagewidth, raw.tilewidth, raw.margin, raw.spacing)
            };
            TileImageSource::Sheet {
                image: join(image_dir, &image),
                columns,
                margin: raw.margin,
                spacing: raw.spacing,
            }
        }
        None => TileImageSource::Collection(
            raw.tiles
                .into_iter()
                .filter_map(|t| t.image.map(|image| TilesetTile { id: t.id, image: join(image_dir, &image) }))
                .collect(),
        ),
    };
    Ok(Tileset {
        name: raw.name,
        first_gid: raw.firstgid,
        tile_width: raw.tilewidth,
        tile_height: raw.tileheight,
        tile_count: raw.tilecount,
        images,
    })
}

fn collect_json_layers(path: &str, layers: Vec<JsonLayer>, out: &mut Vec<RawLayer>) -> Result<(), LoadFailure> {
    for layer in layers {
        match layer.kind.as_str() {
            "tilelayer" => {
                if let Some(compression) = layer.compression.filter(|c| !c.is_empty()) {
                    return Err(LoadFailure::unsupported(path, format!("{compression} layer compression")));
                }
                let gids = match layer.data {
                    Some(JsonData::Gids(gids)) => gids,
                    Some(JsonData::Encoded(data)) => {
                        let encoding = layer.encoding.unwrap_or_else(|| "string".to_string());
                        return Err(LoadFailure::unsupported(
                            path,
                            format!("{encoding} layer encoding ({} bytes of data)", data.len()),
                        ));
                    }
                    None => {
                        return Err(LoadFailure::malformed(path, format!("layer '{}' has no data", layer.name)));
                    }
                };
                out.push(RawLayer { name: layer.name, gids });
            }
            "group" => collect_json_layers(path, layer.layers, out)?,
            _ => {}
        }
    }
    Ok(())
}
