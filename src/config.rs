use glam::Vec2;

use crate::actor::Motion;
use crate::pathfinding::Cell;

/// Settings for the path-walking demo. There is no config file; the defaults
/// reproduce the bundled demo and tests override fields directly.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Map asset, relative to the asset root.
    pub map_path: String,
    pub actor_image: String,
    pub coin_image: String,
    /// Where the coin pile sits; every path leads here.
    pub coin_cell: Cell,
    /// Walkability symbols (see [`crate::walkgrid::tile_symbol`]) that block movement.
    pub blocked_symbols: Vec<char>,
    pub motion: Motion,
    /// Starting pixel position of the actor (off screen by default).
    pub actor_start: Vec2,
    /// Drop the actor at the click point before routing. When off, the route
    /// starts from the cell the actor is standing in.
    pub relocate_on_click: bool,
    pub allow_diagonals: bool,
    pub cut_corners: bool,
    pub title: String,
    /// Fixed update rate, in ticks per second.
    pub ups: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            map_path: "MapForPaths.tmx".into(),
            actor_image: "goblin.png".into(),
            coin_image: "coins.png".into(),
            coin_cell: Cell::new(10, 12),
            blocked_symbols: vec!['2', '3'],
            motion: Motion::default(),
            actor_start: Vec2::new(-100.0, -100.0),
            relocate_on_click: true,
            allow_diagonals: false,
            cut_corners: false,
            title: "Maps Embedded".into(),
            ups: 60,
        }
    }
}

impl DemoConfig {
    pub fn with_map(mut self, path: &str) -> Self {
        self.map_path = path.into();
        self
    }

    pub fn with_coin_cell(mut self, cell: Cell) -> Self {
        self.coin_cell = cell;
        self
    }

    pub fn with_blocked_symbols(mut self, symbols: &[char]) -> Self {
        self.blocked_symbols = symbols.to_vec();
        self
    }
}
