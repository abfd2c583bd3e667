// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window size snapshot.
///
/// - **logical** dimensions are the frame the game draws into, one pixel per
///   map pixel (`tile_width × columns` by `tile_height × rows`).
/// - **physical** dimensions are the actual pixel size of the OS window,
///   which differs from logical on HiDPI displays.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub physical_width: u32,
    pub physical_height: u32,
    pub logical_width: u32,
    pub logical_height: u32,
}

impl WindowConfig {
    /// A window exactly the size of the rendered map, before any DPI scaling.
    pub fn for_map(pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            physical_width: pixel_width,
            physical_height: pixel_height,
            logical_width: pixel_width,
            logical_height: pixel_height,
        }
    }

    /// Same logical size, new physical size (after the OS reports the real
    /// window size).
    pub fn with_physical(&self, width: u32, height: u32) -> Self {
        Self { physical_width: width, physical_height: height, ..self.clone() }
    }

    /// Aspect ratio of the **logical** resolution (`logical_width / logical_height`).
    ///
    /// Returns `0.0` when `logical_height` is zero to avoid division by zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.logical_height == 0 {
            return 0.0;
        }
        self.logical_width as f32 / self.logical_height as f32
    }
}
