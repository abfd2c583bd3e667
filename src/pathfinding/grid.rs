use std::collections::HashMap;

use glam::Vec2;

use super::astar::{astar, astar_8dir};
use super::path::{Cell, Path};

/// Searchable grid built from walkability rows.
///
/// Each cell holds one symbol; walkability is set per symbol and defaults to
/// walkable. Cells missing from a ragged (short) row are never walkable.
#[derive(Clone, Debug)]
pub struct PathGrid {
    width: i32,
    height: i32,
    cell_width: u32,
    cell_height: u32,
    symbols: Vec<Option<char>>,
    walkable: HashMap<char, bool>,
}

impl PathGrid {
    /// `cell_width`/`cell_height` are the pixel size of one cell.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], cell_width: u32, cell_height: u32) -> Self {
        let width = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);
        let height = rows.len();

        let mut symbols = vec![None; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.as_ref().chars().enumerate() {
                symbols[y * width + x] = Some(symbol);
            }
        }

        Self {
            width: width as i32,
            height: height as i32,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
            symbols,
            walkable: HashMap::new(),
        }
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }
    pub fn cell_width(&self) -> u32 { self.cell_width }
    pub fn cell_height(&self) -> u32 { self.cell_height }

    pub fn set_walkable(&mut self, symbol: char, walkable: bool) {
        self.walkable.insert(symbol, walkable);
    }

    /// The cell at (`x`, `y`), or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        (x >= 0 && y >= 0 && x < self.width && y < self.height).then_some(Cell::new(x, y))
    }

    pub fn symbol(&self, cell: Cell) -> Option<char> {
        let cell = self.get(cell.x, cell.y)?;
        self.symbols[(cell.y * self.width + cell.x) as usize]
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.symbol(cell)
            .map(|s| self.walkable.get(&s).copied().unwrap_or(true))
            .unwrap_or(false)
    }

    /// Cell containing the pixel position, using floor division so negative
    /// coordinates fall outside the grid.
    pub fn cell_at_pixel(&self, position: Vec2) -> Option<Cell> {
        let x = (position.x / self.cell_width as f32).floor();
        let y = (position.y / self.cell_height as f32).floor();
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.get(x as i32, y as i32)
    }

    /// Top-left pixel of `cell`.
    pub fn cell_origin(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.x * self.cell_width as i32) as f32,
            (cell.y * self.cell_height as i32) as f32,
        )
    }

    /// Shortest path from `start` to `goal`, both inclusive.
    ///
    /// `None` when either end is outside the grid or not walkable, or when
    /// the two are not connected.
    pub fn path_between(
        &self,
        start: Cell,
        goal: Cell,
        allow_diagonals: bool,
        cut_corners: bool,
    ) -> Option<Path> {
        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return None;
        }

        let passable = |x: i32, y: i32| self.is_walkable(Cell::new(x, y));
        let max_iterations = (self.width * self.height) as usize * 8 + 1;
        let cells = if allow_diagonals {
            astar_8dir(
                (start.x, start.y),
                (goal.x, goal.y),
                self.width,
                self.height,
                passable,
                cut_corners,
                max_iterations,
            )?
        } else {
            astar(
                (start.x, start.y),
                (goal.x, goal.y),
                self.width,
                self.height,
                passable,
                max_iterations,
            )?
        };

        Path::new(cells.into_iter().map(Cell::from).collect())
    }
}
