// ── Letterbox viewport math ───────────────────────────────────────────────────
//
// The frame is drawn at the map's pixel size and scaled onto the window
// surface. On HiDPI displays (or if the window manager ignores the requested
// size) the surface is bigger than the frame, so the frame is scaled uniformly
// and centred, and cursor positions have to be mapped back into frame pixels.

use crate::window::WindowConfig;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in physical pixels that the frame occupies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// ── letterbox_viewport ────────────────────────────────────────────────────────

/// Largest uniformly scaled rectangle with the logical aspect ratio that fits
/// inside the physical window, centred on both axes.
///
/// Returns a zero-sized `Viewport` at the origin when either logical dimension
/// is zero.
pub fn letterbox_viewport(config: &WindowConfig) -> Viewport {
    if config.logical_width == 0 || config.logical_height == 0 {
        return Viewport { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };
    }

    let pw = config.physical_width  as f32;
    let ph = config.physical_height as f32;
    let lw = config.logical_width   as f32;
    let lh = config.logical_height  as f32;

    let scale = (pw / lw).min(ph / lh);

    let width  = lw * scale;
    let height = lh * scale;
    let x      = (pw - width)  / 2.0;
    let y      = (ph - height) / 2.0;

    Viewport { x, y, width, height }
}

/// Map a cursor position in physical window pixels to logical frame pixels.
///
/// Positions in the letterbox bars map outside `0..logical` and are left
/// that way; the grid lookup rejects them.
pub fn physical_to_logical(config: &WindowConfig, physical: [f32; 2]) -> [f32; 2] {
    let v = letterbox_viewport(config);
    if v.width == 0.0 || v.height == 0.0 {
        return physical;
    }
    [
        (physical[0] - v.x) * config.logical_width  as f32 / v.width,
        (physical[1] - v.y) * config.logical_height as f32 / v.height,
    ]
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(pw: u32, ph: u32, lw: u32, lh: u32) -> WindowConfig {
        WindowConfig { physical_width: pw, physical_height: ph, logical_width: lw, logical_height: lh }
    }

    #[test]
    fn same_size_is_identity() {
        let config = cfg(512, 512, 512, 512);
        assert_eq!(letterbox_viewport(&config), Viewport { x: 0.0, y: 0.0, width: 512.0, height: 512.0 });
        assert_eq!(physical_to_logical(&config, [80.0, 96.0]), [80.0, 96.0]);
    }

    #[test]
    fn hidpi_2x_halves_cursor_coordinates() {
        let config = cfg(1024, 1024, 512, 512);
        assert_eq!(physical_to_logical(&config, [160.0, 192.0]), [80.0, 96.0]);
    }

    #[test]
    fn pillarbox_offsets_cursor() {
        // 512×512 frame in a 1024×512 window: 256 px bars left and right.
        let config = cfg(1024, 512, 512, 512);
        let v = letterbox_viewport(&config);
        assert_eq!(v.x, 256.0);
        assert_eq!(v.y, 0.0);
        assert_eq!(physical_to_logical(&config, [256.0, 10.0]), [0.0, 10.0]);
        assert!(physical_to_logical(&config, [100.0, 10.0])[0] < 0.0);
    }

    #[test]
    fn zero_logical_size_passes_through() {
        let config = cfg(800, 600, 0, 600);
        assert_eq!(letterbox_viewport(&config), Viewport { x: 0.0, y: 0.0, width: 0.0, height: 0.0 });
        assert_eq!(physical_to_logical(&config, [3.0, 4.0]), [3.0, 4.0]);
    }
}
