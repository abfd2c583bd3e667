use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::geometry::{CARDINALS, DIAGONALS, distance_chebyshev, distance_manhattan};

// =============================================================================
// A* PATHFINDING
// =============================================================================
///
/// A* pathfinding over a `width` x `height` grid with 4-directional moves.
///
/// Returns the full path as a Vec of (x, y) coordinates, including
/// start and goal. Returns None if no path exists, if either end lies
/// outside the grid, or if the search gives up.
///
/// Every step, the goal included, must satisfy `is_passable`. The start
/// cell itself is not checked.
///
/// # Arguments
/// * `start` - Starting position (x, y)
/// * `goal` - Target position (x, y)
/// * `width`, `height` - Grid dimensions
/// * `is_passable` - Function that returns true if a tile can be walked on
/// * `max_iterations` - Maximum nodes to explore (prevents infinite loops)
pub fn astar(
    start: (i32, i32),
    goal: (i32, i32),
    width: i32,
    height: i32,
    is_passable: impl Fn(i32, i32) -> bool,
    max_iterations: usize,
) -> Option<Vec<(i32, i32)>> {
    if !in_bounds(start, width, height) || !in_bounds(goal, width, height) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    // Priority queue: (f_score, x, y) - use Reverse for min-heap
    let mut open: BinaryHeap<Reverse<(i32, i32, i32)>> = BinaryHeap::new();
    let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut g_score: HashMap<(i32, i32), i32> = HashMap::new();

    g_score.insert(start, 0);
    let h = distance_manhattan(start.0, start.1, goal.0, goal.1);
    open.push(Reverse((h, start.0, start.1)));

    let mut iterations = 0;

    while let Some(Reverse((_, cx, cy))) = open.pop() {
        iterations += 1;
        if iterations > max_iterations {
            return None;
        }

        let current = (cx, cy);

        // Reached goal — reconstruct path
        if current == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }

        let current_g = g_score[&current];

        for (dx, dy) in CARDINALS {
            let next = (cx + dx, cy + dy);
            if !in_bounds(next, width, height) || !is_passable(next.0, next.1) {
                continue;
            }

            let new_g = current_g + 1;
            let existing_g = g_score.get(&next).copied().unwrap_or(i32::MAX);

            if new_g < existing_g {
                g_score.insert(next, new_g);
                came_from.insert(next, current);
                let f = new_g + distance_manhattan(next.0, next.1, goal.0, goal.1);
                open.push(Reverse((f, next.0, next.1)));
            }
        }
    }

    None // No path found
}

/// A* pathfinding with 8-directional movement (including diagonals).
///
/// With `cut_corners` off, a diagonal step is only taken when both
/// orthogonal cells it squeezes past are passable.
pub fn astar_8dir(
    start: (i32, i32),
    goal: (i32, i32),
    width: i32,
    height: i32,
    is_passable: impl Fn(i32, i32) -> bool,
    cut_corners: bool,
    max_iterations: usize,
) -> Option<Vec<(i32, i32)>> {
    if !in_bounds(start, width, height) || !in_bounds(goal, width, height) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let passable = |x: i32, y: i32| in_bounds((x, y), width, height) && is_passable(x, y);

    let mut open: BinaryHeap<Reverse<(i32, i32, i32)>> = BinaryHeap::new();
    let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut g_score: HashMap<(i32, i32), i32> = HashMap::new();

    g_score.insert(start, 0);
    let h = distance_chebyshev(start.0, start.1, goal.0, goal.1) * 10;
    open.push(Reverse((h, start.0, start.1)));

    let mut iterations = 0;

    while let Some(Reverse((_, cx, cy))) = open.pop() {
        iterations += 1;
        if iterations > max_iterations {
            return None;
        }

        let current = (cx, cy);

        if current == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }

        let current_g = g_score[&current];

        for (dx, dy) in CARDINALS.into_iter().chain(DIAGONALS) {
            let next = (cx + dx, cy + dy);
            if !passable(next.0, next.1) {
                continue;
            }

            let diagonal = dx != 0 && dy != 0;
            if diagonal && !cut_corners && !(passable(cx + dx, cy) && passable(cx, cy + dy)) {
                continue;
            }

            // Diagonal movement costs slightly more (approximation of sqrt(2))
            let cost = if diagonal { 14 } else { 10 };
            let new_g = current_g + cost;
            let existing_g = g_score.get(&next).copied().unwrap_or(i32::MAX);

            if new_g < existing_g {
                g_score.insert(next, new_g);
                came_from.insert(next, current);
                let f = new_g + distance_chebyshev(next.0, next.1, goal.0, goal.1) * 10;
                open.push(Reverse((f, next.0, next.1)));
            }
        }
    }

    None
}

#[inline]
fn in_bounds((x, y): (i32, i32), width: i32, height: i32) -> bool {
    x >= 0 && y >= 0 && x < width && y < height
}

/// Reconstruct path from came_from map.
fn reconstruct_path(
    came_from: &HashMap<(i32, i32), (i32, i32)>,
    start: (i32, i32),
    goal: (i32, i32),
) -> Vec<(i32, i32)> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        current = came_from[&current];
        path.push(current);
    }

    path.reverse();
    path
}
