use glam::Vec2;
use log::trace;

use crate::pathfinding::{Cell, Path, PathGrid};

// ── Motion ───────────────────────────────────────────────────────────────────

/// Per-tick movement rules.
///
/// `step` should not exceed `2 * tolerance`, otherwise the actor can hop
/// back and forth over a target without ever arriving.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Motion {
    /// Pixels moved per axis per tick.
    pub step: f32,
    /// An axis counts as arrived when within this many pixels of the target.
    pub tolerance: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self { step: 2.0, tolerance: 2.0 }
    }
}

/// -1, 0 or +1: the way to go along one axis to get from `from` to `to`.
#[inline]
pub fn axis_direction(from: f32, to: f32) -> f32 {
    if to > from {
        1.0
    } else if to < from {
        -1.0
    } else {
        0.0
    }
}

/// Move `position` by `step` pixels on each axis toward `target`. The axes
/// are decided independently, so the move can be diagonal.
pub fn step_toward(position: Vec2, target: Vec2, step: f32) -> Vec2 {
    let direction = Vec2::new(
        axis_direction(position.x, target.x),
        axis_direction(position.y, target.y),
    );
    position + direction * step
}

pub fn within_tolerance(position: Vec2, target: Vec2, tolerance: f32) -> bool {
    let delta = (target - position).abs();
    delta.x <= tolerance && delta.y <= tolerance
}

// ── Actor ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActorState {
    /// No path; ticks do nothing.
    Idle,
    /// Walking toward the path's current cell.
    Moving,
}

/// What a single tick did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepOutcome {
    Idle,
    Stepped,
    /// Reached this cell; the cursor moved on to the next one.
    Arrived(Cell),
    /// Reached the final cell; the actor is idle again.
    Finished(Cell),
}

/// The walking character: a pixel position and an optional path.
#[derive(Clone, Debug)]
pub struct Actor {
    pub position: Vec2,
    path: Option<Path>,
}

impl Actor {
    pub fn new(position: Vec2) -> Self {
        Self { position, path: None }
    }

    pub fn state(&self) -> ActorState {
        match self.path {
            Some(_) => ActorState::Moving,
            None => ActorState::Idle,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Replace the current path. `None` leaves the actor idle.
    pub fn set_path(&mut self, path: Option<Path>) {
        self.path = path.filter(|p| !p.is_finished());
    }

    pub fn clear_path(&mut self) {
        self.path = None;
    }

    /// Advance one tick: either arrive at the current cell and move the
    /// cursor on, or step toward it.
    pub fn step(&mut self, grid: &PathGrid, motion: Motion) -> StepOutcome {
        let Some(path) = self.path.as_mut() else {
            return StepOutcome::Idle;
        };
        let Some(cell) = path.current() else {
            self.path = None;
            return StepOutcome::Idle;
        };

        let target = grid.cell_origin(cell);
        if within_tolerance(self.position, target, motion.tolerance) {
            path.advance();
            if path.is_finished() {
                trace!("actor reached final cell ({}, {})", cell.x, cell.y);
                self.path = None;
                return StepOutcome::Finished(cell);
            }
            trace!("actor reached cell ({}, {})", cell.x, cell.y);
            return StepOutcome::Arrived(cell);
        }

        self.position = step_toward(self.position, target, motion.step);
        StepOutcome::Stepped
    }
}
