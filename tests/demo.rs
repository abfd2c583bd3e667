use std::io::Cursor;

use glam::Vec2;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use tilewalk::LoadFailure;
use tilewalk::actor::{ActorState, StepOutcome};
use tilewalk::assets::EmbeddedAssets;
use tilewalk::config::DemoConfig;
use tilewalk::demo::{Demo, DemoState, SpriteKey, TriggerOutcome};
use tilewalk::input::InputState;
use tilewalk::pathfinding::Cell;
use tilewalk::tilemap::TileMap;

const COINS: Cell = Cell::new(10, 12);

fn bundled_state(config: DemoConfig) -> DemoState {
    let assets = EmbeddedAssets::bundled();
    let map = TileMap::load(&assets, &config.map_path).unwrap();
    DemoState::new(&map, config).unwrap()
}

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Per-channel match within 1, allowing for alpha-blend rounding.
fn same_color(a: Rgba<u8>, b: Rgba<u8>) -> bool {
    a.0.iter().zip(b.0).all(|(&x, y)| x.abs_diff(y) <= 1)
}

fn manhattan_to(position: Vec2, target: Vec2) -> f32 {
    (target - position).abs().element_sum()
}

// ── Grid derived from the bundled map ────────────────────────────────────────

#[test]
fn grid_matches_map_and_blocks_water_and_rock() {
    let state = bundled_state(DemoConfig::default());
    let grid = state.grid();
    assert_eq!((grid.width(), grid.height()), (16, 16));
    assert_eq!(state.frame_size(), (512, 512));

    assert!(grid.is_walkable(Cell::new(2, 3)));
    assert!(grid.is_walkable(COINS));
    assert!(!grid.is_walkable(Cell::new(0, 0)));
    assert!(!grid.is_walkable(Cell::new(6, 7)));
    assert_eq!(grid.symbol(Cell::new(6, 7)), Some('2'));
}

// ── Triggers ─────────────────────────────────────────────────────────────────

#[test]
fn click_on_sand_routes_to_the_coins() {
    let mut state = bundled_state(DemoConfig::default());
    let outcome = state.trigger(Vec2::new(80.0, 96.0));

    assert_eq!(outcome, TriggerOutcome::Routed { start: Cell::new(2, 3), goal: COINS, steps: 18 });
    let path = state.actor().path().unwrap();
    assert_eq!(path.first(), Some(Cell::new(2, 3)));
    assert_eq!(path.last(), Some(COINS));
    assert!(path.cells().windows(2).all(|w| (w[0].x - w[1].x).abs() + (w[0].y - w[1].y).abs() == 1));
    assert!(path.cells().iter().all(|&c| state.grid().is_walkable(c)));
}

#[test]
fn actor_walks_monotonically_to_the_coins() {
    let mut state = bundled_state(DemoConfig::default());
    state.trigger(Vec2::new(80.0, 96.0));
    let goal = Vec2::new(320.0, 384.0);

    // The click lands mid-cell; the actor first settles on the start cell.
    let mut previous = None;
    let mut finished = false;
    for _ in 0..1000 {
        let outcome = state.tick(&InputState::new());
        let position = state.actor().position;
        if let Some(previous) = previous {
            assert!(manhattan_to(position, goal) <= manhattan_to(previous, goal));
        }
        let on_route = state.actor().path().map_or(true, |p| p.cursor() >= 1);
        if on_route {
            previous = Some(position);
        }
        if let StepOutcome::Finished(cell) = outcome {
            assert_eq!(cell, COINS);
            finished = true;
            break;
        }
    }
    assert!(finished, "actor never reached the coins");
    assert_eq!(state.actor().state(), ActorState::Idle);
    assert!((state.actor().position - goal).abs().max_element() <= 2.0);
}

#[test]
fn click_on_water_finds_no_path() {
    let mut state = bundled_state(DemoConfig::default());
    let outcome = state.trigger(Vec2::new(200.0, 230.0));

    assert_eq!(outcome, TriggerOutcome::NoPath { start: Some(Cell::new(6, 7)) });
    assert_eq!(state.actor().state(), ActorState::Idle);
    assert_eq!(state.tick(&InputState::new()), StepOutcome::Idle);
    assert_eq!(state.actor().position, Vec2::new(200.0, 230.0));
}

#[test]
fn unblocking_water_lets_the_actor_wade() {
    let mut state = bundled_state(DemoConfig::default().with_blocked_symbols(&['3']));
    assert!(state.grid().is_walkable(Cell::new(6, 7)));
    assert!(!state.grid().is_walkable(Cell::new(0, 0)));

    let outcome = state.trigger(Vec2::new(200.0, 230.0));
    assert!(matches!(outcome, TriggerOutcome::Routed { start, .. } if start == Cell::new(6, 7)));
}

#[test]
fn failed_click_mid_route_interrupts_the_walk() {
    let mut state = bundled_state(DemoConfig::default());
    state.trigger(Vec2::new(80.0, 96.0));
    for _ in 0..20 {
        state.tick(&InputState::new());
    }
    assert_eq!(state.actor().state(), ActorState::Moving);

    state.trigger(Vec2::new(200.0, 230.0));
    assert!(state.actor().path().is_none());
}

#[test]
fn click_mid_route_replaces_the_path() {
    let mut state = bundled_state(DemoConfig::default());
    state.trigger(Vec2::new(80.0, 96.0));
    for _ in 0..40 {
        state.tick(&InputState::new());
    }

    let outcome = state.trigger(Vec2::new(400.0, 64.0));
    let here = state.grid().cell_at_pixel(state.actor().position).unwrap();
    assert_eq!(here, Cell::new(12, 2));
    assert_eq!(outcome, TriggerOutcome::Routed { start: here, goal: COINS, steps: 17 });

    let path = state.actor().path().unwrap();
    assert_eq!(path.first(), Some(here));
    assert_eq!(path.cursor(), 0);
}

#[test]
fn without_relocation_the_route_starts_where_the_actor_stands() {
    let config = DemoConfig { relocate_on_click: false, ..DemoConfig::default() };
    let mut state = bundled_state(config);

    // Still parked off screen.
    assert_eq!(state.trigger(Vec2::new(80.0, 96.0)), TriggerOutcome::NoPath { start: None });
    assert_eq!(state.actor().position, Vec2::new(-100.0, -100.0));

    state.actor_mut().position = Vec2::new(70.0, 100.0);
    let outcome = state.trigger(Vec2::new(400.0, 64.0));
    assert!(matches!(outcome, TriggerOutcome::Routed { start, .. } if start == Cell::new(2, 3)));
    assert_eq!(state.actor().position, Vec2::new(70.0, 100.0));
}

#[test]
fn click_outside_the_map_finds_no_path() {
    let mut state = bundled_state(DemoConfig::default());
    assert_eq!(state.trigger(Vec2::new(-5.0, 40.0)), TriggerOutcome::NoPath { start: None });
    assert_eq!(state.trigger(Vec2::new(600.0, 40.0)), TriggerOutcome::NoPath { start: None });
}

// ── tick ─────────────────────────────────────────────────────────────────────

#[test]
fn press_triggers_and_moves_in_the_same_tick() {
    let mut state = bundled_state(DemoConfig::default());
    let outcome = state.tick(&InputState::click(80.0, 96.0));

    assert_eq!(outcome, StepOutcome::Stepped);
    assert_eq!(state.actor().position, Vec2::new(78.0, 96.0));
    assert_eq!(state.actor().state(), ActorState::Moving);
}

#[test]
fn held_button_does_not_retrigger() {
    let mut state = bundled_state(DemoConfig::default());
    let mut input = InputState::click(80.0, 96.0);
    state.tick(&input);
    input.clear_frame_state();
    input.press_mouse(tilewalk::input::MouseButton::Left);
    assert!(!input.is_mouse_pressed(tilewalk::input::MouseButton::Left));

    input.mouse_pos = [400.0, 64.0];
    state.tick(&input);
    assert_eq!(state.actor().path().unwrap().first(), Some(Cell::new(2, 3)));
}

#[test]
fn right_click_is_ignored() {
    let mut state = bundled_state(DemoConfig::default());
    let mut input = InputState::new();
    input.mouse_pos = [80.0, 96.0];
    input.press_mouse(tilewalk::input::MouseButton::Right);
    assert_eq!(state.tick(&input), StepOutcome::Idle);
}

// ── Drawing ──────────────────────────────────────────────────────────────────

#[test]
fn draw_list_is_tiles_then_coins_then_actor() {
    let state = bundled_state(DemoConfig::default());
    let commands = state.draw_list();
    assert_eq!(commands.len(), 16 * 16 + 2);

    assert_eq!(commands[0].sprite, SpriteKey::Tile(3));
    assert_eq!(commands[0].position, Vec2::ZERO);
    assert_eq!(commands[17].sprite, SpriteKey::Tile(0));
    assert_eq!(commands[17].position, Vec2::new(32.0, 32.0));
    assert_eq!(commands[16 * 7 + 6].sprite, SpriteKey::Tile(2));
    assert_eq!(commands[16 * 7 + 6].position, Vec2::new(192.0, 224.0));

    assert_eq!(commands[256].sprite, SpriteKey::Coins);
    assert_eq!(commands[256].position, Vec2::new(320.0, 384.0));
    assert_eq!(commands[257].sprite, SpriteKey::Actor);
    assert_eq!(commands[257].position, Vec2::new(-100.0, -100.0));
}

#[test]
fn rendered_frame_shows_tiles_coins_and_actor() {
    let mut demo = Demo::load(&EmbeddedAssets::bundled(), DemoConfig::default()).unwrap();
    let water = *demo.sprites().tiles.get(2).unwrap().get_pixel(16, 16);
    let sand = *demo.sprites().tiles.get(1).unwrap().get_pixel(0, 0);
    let coin = *demo.sprites().coins.get_pixel(16, 16);
    let goblin = *demo.sprites().actor.get_pixel(16, 16);

    let frame = demo.render_frame().clone();
    assert_eq!(frame.dimensions(), (512, 512));
    assert!(same_color(*frame.get_pixel(6 * 32 + 16, 7 * 32 + 16), water));
    assert!(same_color(*frame.get_pixel(336, 400), coin));
    // Transparent coin corner shows the sand underneath.
    assert!(same_color(*frame.get_pixel(320, 384), sand));

    demo.state_mut().trigger(Vec2::new(80.0, 96.0));
    let frame = demo.render_frame();
    assert!(same_color(*frame.get_pixel(96, 112), goblin));
}

#[test]
fn window_is_sized_to_the_map() {
    let demo = Demo::load(&EmbeddedAssets::bundled(), DemoConfig::default()).unwrap();
    let window = demo.window_config();
    assert_eq!((window.logical_width, window.logical_height), (512, 512));
    assert_eq!(demo.state().config().title, "Maps Embedded");
}

#[test]
fn json_map_loads_the_same_demo() {
    let config = DemoConfig::default().with_map("MapForPaths.tmj");
    let mut state = bundled_state(config);
    let outcome = state.trigger(Vec2::new(80.0, 96.0));
    assert!(matches!(outcome, TriggerOutcome::Routed { steps: 18, .. }));
}

// ── Load failures ────────────────────────────────────────────────────────────

const TINY_MAP: &str = r#"<map width="2" height="1" tilewidth="4" tileheight="4">
 <tileset firstgid="1" name="t" tilewidth="4" tileheight="4" tilecount="2">
  <tile id="0"><image source="a.png"/></tile>
 </tileset>
 <layer name="L"><data encoding="csv">1,2</data></layer>
</map>"#;

fn tiny_assets(map: &'static str) -> EmbeddedAssets {
    EmbeddedAssets::new()
        .with_file("tiny.tmx", map.as_bytes())
        .with_file("a.png", png(4, 4, [0, 255, 0, 255]))
        .with_file("goblin.png", png(4, 4, [255, 0, 0, 255]))
        .with_file("coins.png", png(4, 4, [255, 255, 0, 255]))
}

#[test]
fn tile_without_an_image_fails_the_load() {
    let config = DemoConfig::default().with_map("tiny.tmx").with_coin_cell(Cell::new(0, 0));
    let result = Demo::load(&tiny_assets(TINY_MAP), config);
    assert!(matches!(result, Err(LoadFailure::MissingTileImage { id: 1 })));
}

const TWO_TILESET_MAP: &str = r#"<map width="2" height="1" tilewidth="4" tileheight="4">
 <tileset firstgid="1" name="ground" tilewidth="4" tileheight="4" tilecount="1">
  <tile id="0"><image source="a.png"/></tile>
 </tileset>
 <tileset firstgid="2" name="walls" tilewidth="4" tileheight="4" tilecount="1">
  <tile id="0"><image source="wall.png"/></tile>
 </tileset>
 <layer name="L"><data encoding="csv">1,2</data></layer>
</map>"#;

#[test]
fn tile_from_a_second_tileset_fails_the_load() {
    let assets = tiny_assets(TWO_TILESET_MAP).with_file("wall.png", png(4, 4, [255, 0, 0, 255]));
    let config = DemoConfig::default().with_map("tiny.tmx").with_coin_cell(Cell::new(0, 0));

    let result = Demo::load(&assets, config.clone());
    assert!(matches!(result, Err(LoadFailure::ForeignTileset { index: 1, tileset: 1 })));

    let map = TileMap::load(&assets, "tiny.tmx").unwrap();
    assert_eq!(map.tilesets.len(), 2);
    assert!(matches!(DemoState::new(&map, config), Err(LoadFailure::ForeignTileset { index: 1, .. })));
}

#[test]
fn small_custom_map_loads() {
    let map = TINY_MAP.replace("1,2", "1,1").leak();
    let config = DemoConfig::default().with_map("tiny.tmx").with_coin_cell(Cell::new(1, 0));
    let mut demo = Demo::load(&tiny_assets(map), config).unwrap();
    assert_eq!(demo.state().frame_size(), (8, 4));
    let frame = demo.render_frame();
    assert!(same_color(*frame.get_pixel(1, 1), Rgba([0, 255, 0, 255])));
    assert!(same_color(*frame.get_pixel(6, 1), Rgba([255, 255, 0, 255])));
}

#[test]
fn map_without_tile_layers_fails_the_load() {
    let map = r#"<map width="1" height="1" tilewidth="4" tileheight="4">
 <tileset firstgid="1" name="t" tilewidth="4" tileheight="4"><tile id="0"><image source="a.png"/></tile></tileset>
</map>"#;
    let config = DemoConfig::default().with_map("tiny.tmx");
    let result = Demo::load(&tiny_assets(map), config);
    assert!(matches!(result, Err(LoadFailure::NoTileLayer { .. })));
}

#[test]
fn missing_sprite_fails_the_load() {
    let config = DemoConfig { actor_image: "nobody.png".into(), ..DemoConfig::default() };
    let result = Demo::load(&EmbeddedAssets::bundled(), config);
    assert!(matches!(result, Err(LoadFailure::AssetMissing { path }) if path == "nobody.png"));
}

#[test]
fn corrupt_image_fails_the_load() {
    let assets = EmbeddedAssets::bundled().with_file("coins.png", b"not a png".as_slice());
    let result = Demo::load(&assets, DemoConfig::default());
    assert!(matches!(result, Err(LoadFailure::ImageDecode { .. })));
}
