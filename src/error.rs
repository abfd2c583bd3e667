use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading the map, its tileset images,
/// or the sprite images. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("asset not found: {path}")]
    AssetMissing { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan asset directory {root}: {source}")]
    ScanDir {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[error("asset {path} is not valid UTF-8")]
    NotUtf8 { path: String },

    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: String,
        source: image::ImageError,
    },

    #[error("malformed map {path}: {message}")]
    MalformedMap { path: String, message: String },

    #[error("unsupported map file {path}: {reason}")]
    Unsupported { path: String, reason: String },

    #[error("map {path} has no tile layer")]
    NoTileLayer { path: String },

    #[error("tile id {id} cannot be written as a single walkability symbol")]
    SymbolOutOfRange { id: u32 },

    #[error("grid width must be non-zero")]
    ZeroWidth,

    #[error("no image for tile id {id}")]
    MissingTileImage { id: u32 },

    #[error("tile {index} of the base layer uses tileset {tileset}; only the first tileset is drawn")]
    ForeignTileset { index: usize, tileset: usize },
}

impl LoadFailure {
    pub(crate) fn malformed(path: &str, message: impl Into<String>) -> Self {
        Self::MalformedMap { path: path.to_string(), message: message.into() }
    }

    pub(crate) fn unsupported(path: &str, reason: impl Into<String>) -> Self {
        Self::Unsupported { path: path.to_string(), reason: reason.into() }
    }
}

/// Failures of the window and GPU host. Returned from
/// [`crate::engine::EngineBuilder::run`].
#[derive(Debug, Error)]
pub enum HostError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
