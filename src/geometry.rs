// =============================================================================
// GEOMETRY.RS — Grid distances and neighbour offsets
//
// Used by the A* search: the distances are its heuristics, the offset tables
// its neighbour expansion. Coordinates are (column, row) with y growing down.
// =============================================================================

/// Manhattan distance: steps needed when only moving along the axes.
#[inline]
pub fn distance_manhattan(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs() + (y1 - y2).abs()
}

/// Chebyshev distance: steps needed when diagonal moves are allowed.
#[inline]
pub fn distance_chebyshev(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs().max((y1 - y2).abs())
}

/// Up, right, down, left.
pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
