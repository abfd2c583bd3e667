// =============================================================================
// DEMO.RS — Click-to-walk demo
//
// `DemoState` is the whole simulation: the walkability grid, the coin pile and
// the actor. `tick` consumes one input snapshot and moves the actor one step;
// `draw_list` describes the frame without touching any image. `Demo` adds the
// decoded sprites and a frame buffer so it can be handed to the engine.
// =============================================================================

use glam::Vec2;
use image::RgbaImage;
use log::{debug, info};

use crate::actor::{Actor, StepOutcome};
use crate::assets::AssetSource;
use crate::config::DemoConfig;
use crate::engine::Game;
use crate::error::LoadFailure;
use crate::input::{InputState, MouseButton};
use crate::pathfinding::{Cell, PathGrid};
use crate::renderer::frame::compose_into;
use crate::renderer::sprites::SpriteBank;
use crate::tilemap::TileMap;
use crate::walkgrid::build_rows;
use crate::window::WindowConfig;

pub use crate::renderer::frame::{DrawCommand, SpriteKey};

// ── CoinPile ─────────────────────────────────────────────────────────────────

/// The fixed goal every path leads to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoinPile {
    pub cell: Cell,
}

// ── TriggerOutcome ───────────────────────────────────────────────────────────

/// Result of a click.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A path was found and replaced the actor's previous one.
    Routed { start: Cell, goal: Cell, steps: usize },
    /// No path; the actor is idle. `start` is `None` when the actor was not
    /// over the grid.
    NoPath { start: Option<Cell> },
}

// ── DemoState ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct DemoState {
    grid: PathGrid,
    /// Base layer tile ids, row-major.
    tiles: Vec<u32>,
    columns: usize,
    rows: usize,
    tile_width: u32,
    tile_height: u32,
    coins: CoinPile,
    actor: Actor,
    config: DemoConfig,
}

impl DemoState {
    /// Derive the walkability grid from the map's base layer and place the
    /// actor and coin pile.
    pub fn new(map: &TileMap, config: DemoConfig) -> Result<Self, LoadFailure> {
        let layer = map
            .base_layer()
            .ok_or_else(|| LoadFailure::NoTileLayer { path: config.map_path.clone() })?;
        layer.ensure_first_tileset()?;
        let tiles = layer.ids();
        let rows = build_rows(&tiles, map.width)?;

        let mut grid = PathGrid::from_rows(&rows, map.tile_width, map.tile_height);
        for &symbol in &config.blocked_symbols {
            grid.set_walkable(symbol, false);
        }
        info!(
            "walkability grid {}x{} from layer '{}', blocked symbols {:?}",
            grid.width(),
            grid.height(),
            layer.name,
            config.blocked_symbols
        );

        Ok(Self {
            grid,
            tiles,
            columns: map.width,
            rows: map.height,
            tile_width: map.tile_width,
            tile_height: map.tile_height,
            coins: CoinPile { cell: config.coin_cell },
            actor: Actor::new(config.actor_start),
            config,
        })
    }

    /// One update: a fresh left-button press triggers a new route, then the
    /// actor takes its step.
    pub fn tick(&mut self, input: &InputState) -> StepOutcome {
        if input.is_mouse_pressed(MouseButton::Left) {
            let [x, y] = input.mouse_pos;
            self.trigger(Vec2::new(x, y));
        }
        self.actor.step(&self.grid, self.config.motion)
    }

    /// Route the actor to the coin pile in response to a click at `click`
    /// (frame pixels).
    ///
    /// The actor's previous path is always replaced, even when no new path is
    /// found.
    pub fn trigger(&mut self, click: Vec2) -> TriggerOutcome {
        if self.config.relocate_on_click {
            self.actor.position = click;
        }

        let goal = self.coins.cell;
        let start = self.grid.cell_at_pixel(self.actor.position);
        let path = start.and_then(|start| {
            self.grid
                .path_between(start, goal, self.config.allow_diagonals, self.config.cut_corners)
        });

        let outcome = match (start, &path) {
            (Some(start), Some(path)) => TriggerOutcome::Routed { start, goal, steps: path.len() },
            _ => TriggerOutcome::NoPath { start },
        };
        match outcome {
            TriggerOutcome::Routed { start, goal, steps } => debug!(
                "click at ({}, {}): route ({}, {}) -> ({}, {}), {} cell(s)",
                click.x, click.y, start.x, start.y, goal.x, goal.y, steps
            ),
            TriggerOutcome::NoPath { start } => debug!(
                "click at ({}, {}): no path from {:?} to ({}, {})",
                click.x, click.y, start, goal.x, goal.y
            ),
        }

        self.actor.set_path(path);
        outcome
    }

    /// Everything to draw this frame, back to front: the base layer row by
    /// row, then the coin pile, then the actor.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.tiles.len() + 2);
        if self.columns > 0 {
            for (index, &id) in self.tiles.iter().enumerate() {
                let column = (index % self.columns) as u32;
                let row = (index / self.columns) as u32;
                commands.push(DrawCommand {
                    sprite: SpriteKey::Tile(id),
                    position: Vec2::new((column * self.tile_width) as f32, (row * self.tile_height) as f32),
                });
            }
        }
        commands.push(DrawCommand {
            sprite: SpriteKey::Coins,
            position: self.grid.cell_origin(self.coins.cell),
        });
        commands.push(DrawCommand { sprite: SpriteKey::Actor, position: self.actor.position });
        commands
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    pub fn grid(&self) -> &PathGrid {
        &self.grid
    }

    pub fn coins(&self) -> CoinPile {
        self.coins
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Frame size in pixels: one map pixel per frame pixel.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.columns as u32 * self.tile_width, self.rows as u32 * self.tile_height)
    }
}

// ── Demo ─────────────────────────────────────────────────────────────────────

/// `DemoState` plus the images needed to draw it.
pub struct Demo {
    state: DemoState,
    sprites: SpriteBank,
    frame: RgbaImage,
}

impl Demo {
    /// Load the map and every image up front. Any missing or broken asset
    /// fails here, before a window exists.
    pub fn load(assets: &dyn AssetSource, config: DemoConfig) -> Result<Self, LoadFailure> {
        let map = TileMap::load(assets, &config.map_path)?;
        let sprites = SpriteBank::load(assets, &map, &config)?;
        if let Some(layer) = map.base_layer() {
            sprites.tiles.ensure_covers(layer)?;
        }
        let state = DemoState::new(&map, config)?;

        let (width, height) = state.frame_size();
        Ok(Self { state, sprites, frame: RgbaImage::new(width, height) })
    }

    pub fn state(&self) -> &DemoState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DemoState {
        &mut self.state
    }

    pub fn sprites(&self) -> &SpriteBank {
        &self.sprites
    }

    pub fn window_config(&self) -> WindowConfig {
        let (width, height) = self.state.frame_size();
        WindowConfig::for_map(width, height)
    }

    /// Compose the current state into the frame buffer.
    pub fn render_frame(&mut self) -> &RgbaImage {
        let commands = self.state.draw_list();
        compose_into(&mut self.frame, &commands, &self.sprites);
        &self.frame
    }
}

impl Game for Demo {
    fn update(&mut self, input: &InputState) {
        self.state.tick(input);
    }

    fn render(&mut self) -> &RgbaImage {
        self.render_frame()
    }
}
