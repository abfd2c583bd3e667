mod astar;
mod grid;
mod path;

pub use astar::{astar, astar_8dir};
pub use grid::PathGrid;
pub use path::{Cell, Path};

pub mod prelude {
    pub use crate::pathfinding::astar::*;
    pub use crate::pathfinding::grid::*;
    pub use crate::pathfinding::path::*;
}
