use std::path::Path;

use tilewalk::LoadFailure;
use tilewalk::assets::{AssetSource, DirAssets, EmbeddedAssets, load_image};
use tilewalk::config::DemoConfig;
use tilewalk::demo::{Demo, TriggerOutcome};
use tilewalk::tilemap::TileMap;

fn asset_dir() -> DirAssets {
    DirAssets::open(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")).unwrap()
}

#[test]
fn directory_and_embedded_tables_hold_the_same_files() {
    let dir = asset_dir();
    let embedded = EmbeddedAssets::bundled();
    assert_eq!(dir.len(), embedded.len());
    for path in ["MapForPaths.tmx", "tiles/water.png", "goblin.png"] {
        assert_eq!(dir.read(path).unwrap(), embedded.read(path).unwrap(), "{path}");
    }
}

#[test]
fn directory_lookup_normalizes_paths() {
    let dir = asset_dir();
    assert!(dir.read("./tiles/../tiles/sand.png").is_ok());
    assert!(dir.read("tiles\\rock.png").is_ok());
    assert!(matches!(dir.read("tiles/lava.png"), Err(LoadFailure::AssetMissing { .. })));
}

#[test]
fn images_decode_to_rgba() {
    let image = load_image(&asset_dir(), "coins.png").unwrap();
    assert_eq!(image.dimensions(), (32, 32));
}

#[test]
fn map_loads_from_directory() {
    let map = TileMap::load(&asset_dir(), "MapForPaths.tmx").unwrap();
    assert_eq!((map.width, map.height), (16, 16));
}

#[test]
fn demo_runs_from_directory_assets() {
    let mut demo = Demo::load(&asset_dir(), DemoConfig::default()).unwrap();
    let outcome = demo.state_mut().trigger(glam::Vec2::new(80.0, 96.0));
    assert!(matches!(outcome, TriggerOutcome::Routed { .. }));
}

#[test]
fn missing_directory_is_a_scan_error() {
    let result = DirAssets::open(Path::new(env!("CARGO_MANIFEST_DIR")).join("no-such-dir"));
    assert!(matches!(result, Err(LoadFailure::ScanDir { .. })));
}

#[test]
fn non_utf8_text_is_rejected() {
    let assets = EmbeddedAssets::new().with_file("bad.tmx", vec![0xff, 0xfe, 0x00]);
    assert!(matches!(assets.read_to_string("bad.tmx"), Err(LoadFailure::NotUtf8 { .. })));
}
