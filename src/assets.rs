//! Asset resolution.
//!
//! Every loader takes an [`AssetSource`] instead of reaching for a global
//! file table. Paths are `/`-separated and relative to the asset root, e.g.
//! `tiles/grass.png`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::debug;
use walkdir::WalkDir;

use crate::error::LoadFailure;

// ── AssetSource ──────────────────────────────────────────────────────────────

pub trait AssetSource {
    /// Raw bytes of the asset at `path`.
    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, LoadFailure>;

    fn read_to_string(&self, path: &str) -> Result<String, LoadFailure> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|_| LoadFailure::NotUtf8 { path: path.to_string() })
    }
}

/// Decode the image at `path` into RGBA8.
pub fn load_image(assets: &dyn AssetSource, path: &str) -> Result<RgbaImage, LoadFailure> {
    let bytes = assets.read(path)?;
    let img = image::load_from_memory(&bytes).map_err(|source| LoadFailure::ImageDecode {
        path: path.to_string(),
        source,
    })?;
    Ok(img.to_rgba8())
}

// ── Path helpers ─────────────────────────────────────────────────────────────

/// Collapse `.` and `..` segments, unify separators and strip leading slashes.
/// `..` never climbs above the asset root.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            p => parts.push(p),
        }
    }
    parts.join("/")
}

/// Resolve `relative` against the directory `base`.
pub fn join(base: &str, relative: &str) -> String {
    if base.is_empty() {
        normalize(relative)
    } else {
        normalize(&format!("{base}/{relative}"))
    }
}

/// Directory part of an asset path (`""` for files at the root).
pub fn parent_dir(path: &str) -> String {
    let path = normalize(path);
    match path.rfind('/') {
        Some(i) => path[..i].to_string(),
        None => String::new(),
    }
}

// ── EmbeddedAssets ───────────────────────────────────────────────────────────

const BUNDLED: &[(&str, &[u8])] = &[
    ("MapForPaths.tmx", include_bytes!("../assets/MapForPaths.tmx")),
    ("MapForPaths.tmj", include_bytes!("../assets/MapForPaths.tmj")),
    ("tiles/grass.png", include_bytes!("../assets/tiles/grass.png")),
    ("tiles/sand.png", include_bytes!("../assets/tiles/sand.png")),
    ("tiles/water.png", include_bytes!("../assets/tiles/water.png")),
    ("tiles/rock.png", include_bytes!("../assets/tiles/rock.png")),
    ("goblin.png", include_bytes!("../assets/goblin.png")),
    ("coins.png", include_bytes!("../assets/coins.png")),
];

/// In-memory asset table. [`EmbeddedAssets::bundled`] holds the files
/// compiled into the binary; tests build their own from literals.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedAssets {
    files: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo's map and images, embedded at compile time.
    pub fn bundled() -> Self {
        BUNDLED
            .iter()
            .fold(Self::new(), |assets, &(path, bytes)| assets.with_file(path, bytes))
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.files.insert(normalize(path), bytes.into());
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&normalize(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for EmbeddedAssets {
    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, LoadFailure> {
        self.files
            .get(&normalize(path))
            .map(|bytes| Cow::Borrowed(bytes.as_ref()))
            .ok_or_else(|| LoadFailure::AssetMissing { path: path.to_string() })
    }
}

// ── DirAssets ────────────────────────────────────────────────────────────────

/// Assets read from a directory on disk. The directory is scanned once when
/// opened; files added afterwards are not seen.
#[derive(Debug)]
pub struct DirAssets {
    root: PathBuf,
    files: HashMap<String, PathBuf>,
}

impl DirAssets {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, LoadFailure> {
        let root = root.as_ref().to_path_buf();
        let mut files = HashMap::new();

        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|source| LoadFailure::ScanDir { root: root.clone(), source })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else { continue };
            files.insert(normalize(&relative.to_string_lossy()), entry.path().to_path_buf());
        }

        debug!("asset directory {:?}: {} files", root, files.len());
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for DirAssets {
    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, LoadFailure> {
        let file = self
            .files
            .get(&normalize(path))
            .ok_or_else(|| LoadFailure::AssetMissing { path: path.to_string() })?;
        std::fs::read(file)
            .map(Cow::Owned)
            .map_err(|source| LoadFailure::Io { path: file.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dots_and_separators() {
        assert_eq!(normalize("./tiles//grass.png"), "tiles/grass.png");
        assert_eq!(normalize("maps/../tiles/grass.png"), "tiles/grass.png");
        assert_eq!(normalize("tiles\\rock.png"), "tiles/rock.png");
        assert_eq!(normalize("/goblin.png"), "goblin.png");
    }

    #[test]
    fn parent_climb_stops_at_root() {
        assert_eq!(normalize("../../coins.png"), "coins.png");
    }

    #[test]
    fn join_resolves_against_map_directory() {
        assert_eq!(join("maps", "../tiles/sand.png"), "tiles/sand.png");
        assert_eq!(join("", "tiles/sand.png"), "tiles/sand.png");
        assert_eq!(parent_dir("maps/level.tmx"), "maps");
        assert_eq!(parent_dir("level.tmx"), "");
    }

    #[test]
    fn embedded_lookup_uses_normalized_keys() {
        let assets = EmbeddedAssets::new().with_file("./a/b.txt", b"hi".as_slice());
        assert!(assets.contains("a/b.txt"));
        assert_eq!(assets.read_to_string("a/./b.txt").unwrap(), "hi");
        assert!(matches!(assets.read("a/c.txt"), Err(LoadFailure::AssetMissing { .. })));
    }
}
