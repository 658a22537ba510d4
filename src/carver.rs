use rand::prelude::*;

use crate::error::{MazeError, Result};
use crate::grid::Grid;

/// Outcome of one discrete carving advance, so the host can drive
/// highlight/audio feedback per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveStep {
    /// a passage was opened into this (row, col), now the frontier
    Opened((usize, usize)),
    Backtracked,
    /// the stack just emptied, the maze is done
    Complete,
    /// stepping a finished carver is a no-op, not an error
    AlreadyComplete,
}

/// Randomized iterative depth-first backtracker. Produces a perfect maze:
/// the opened passages form a spanning tree over the grid.
///
/// The carver owns only its stack and randomness source; cells belong to
/// the `Grid` passed into each call.
pub struct Backtracker<R: Rng> {
    stack: Vec<usize>,
    rng: R,
    started: bool,
}

impl Backtracker<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for Backtracker<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Backtracker<R> {
    /// Carving is inherently random; inject a seeded rng for reproducible
    /// runs.
    pub fn with_rng(rng: R) -> Self {
        Self {
            stack: Vec::new(),
            rng,
            started: false,
        }
    }

    /// Clears the stack and pushes the origin, marking it visited. The grid
    /// is expected to have been reset beforehand.
    pub fn start(&mut self, grid: &mut Grid, origin: (usize, usize)) -> Result<()> {
        let index = grid
            .index_of(origin.0, origin.1)
            .ok_or(MazeError::OutOfBounds {
                row: origin.0,
                col: origin.1,
            })?;

        self.stack.clear();
        grid.cell_mut(index).visited = true;
        self.stack.push(index);
        self.started = true;

        Ok(())
    }

    /// Starts from a uniformly random origin cell, for hosts that want a
    /// maze without a user-designated start. Returns the chosen origin.
    pub fn start_anywhere(&mut self, grid: &mut Grid) -> (usize, usize) {
        let pick = (self.rng.gen::<f32>() * grid.cells.len() as f32) as usize;
        let origin = grid.coords_of(pick);

        self.stack.clear();
        grid.cell_mut(pick).visited = true;
        self.stack.push(pick);
        self.started = true;

        origin
    }

    /// Forgets any in-progress carve. Pair with `Grid::reset`.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.started = false;
    }

    /// Drops the remaining stack, freezing the maze as carved so far.
    pub fn abandon(&mut self) {
        self.stack.clear();
    }

    /// Single advance: open a passage into a random unvisited neighbor of
    /// the stack top, or backtrack when there is none.
    pub fn step(&mut self, grid: &mut Grid) -> CarveStep {
        let current = match self.stack.last() {
            Some(&index) => index,
            None => return CarveStep::AlreadyComplete,
        };

        let unvisited: Vec<usize> = grid
            .neighborhood_of(current)
            .map(|(n, _)| n)
            .filter(|&n| !grid.cell(n).visited)
            .collect();

        if unvisited.is_empty() {
            self.stack.pop();

            if self.stack.is_empty() {
                log::debug!("carving complete, stack drained");
                CarveStep::Complete
            } else {
                CarveStep::Backtracked
            }
        } else {
            let pick = (self.rng.gen::<f32>() * unvisited.len() as f32) as usize;
            let next = unvisited[pick];

            grid.cell_mut(next).visited = true;
            grid.clear_wall_between(current, next)
                .expect("unvisited neighbors are grid-adjacent");
            self.stack.push(next);

            CarveStep::Opened(grid.coords_of(next))
        }
    }

    /// True once `start` has been called and the stack has drained.
    pub fn is_complete(&self) -> bool {
        self.started && self.stack.is_empty()
    }

    /// Current stack top, the cell the host should highlight.
    pub fn frontier(&self, grid: &Grid) -> Option<(usize, usize)> {
        self.stack.last().map(|&index| grid.coords_of(index))
    }

    /// Drives `step` to completion in one call.
    pub fn carve_all(&mut self, grid: &mut Grid) {
        loop {
            match self.step(grid) {
                CarveStep::Complete | CarveStep::AlreadyComplete => break,
                _ => {}
            }
        }
    }
}
