use crate::error::{MazeError, Result};
use crate::grid::Grid;

/// Manhattan distance; admissible and consistent under unit-cost grid
/// movement, so the search below returns a shortest path.
pub fn manhattan(a: (usize, usize), b: (usize, usize)) -> u32 {
    let dr = if a.0 > b.0 { a.0 - b.0 } else { b.0 - a.0 };
    let dc = if a.1 > b.1 { a.1 - b.1 } else { b.1 - a.1 };

    (dr + dc) as u32
}

/// A* from `start` to `goal` over opened passages only. Returns the ordered
/// cell sequence from start to goal inclusive, or an empty vector when the
/// goal is unreachable (which a completed carve should make impossible).
///
/// Cost fields on the cells are overwritten lazily as cells are first
/// touched, so stale values from a prior run are never read. The open and
/// closed sets are transient to this call.
pub fn find_path(
    grid: &mut Grid,
    start: (usize, usize),
    goal: (usize, usize),
) -> Result<Vec<(usize, usize)>> {
    let start_idx = grid
        .index_of(start.0, start.1)
        .ok_or(MazeError::OutOfBounds {
            row: start.0,
            col: start.1,
        })?;
    let goal_idx = grid.index_of(goal.0, goal.1).ok_or(MazeError::OutOfBounds {
        row: goal.0,
        col: goal.1,
    })?;

    let mut open: Vec<usize> = vec![start_idx];
    let mut in_open = vec![false; grid.cells.len()];
    let mut closed = vec![false; grid.cells.len()];
    in_open[start_idx] = true;

    {
        let h = manhattan(start, goal);
        let cell = grid.cell_mut(start_idx);
        cell.g = 0;
        cell.h = h;
        cell.f = h;
        cell.parent = None;
    }

    while !open.is_empty() {
        // linear min-f scan with strict less, so ties break toward the
        // earliest open-set entry and a run is fully deterministic
        let mut lowest = 0;
        for i in 1..open.len() {
            if grid.cell(open[i]).f < grid.cell(open[lowest]).f {
                lowest = i;
            }
        }

        let current = open.remove(lowest);
        in_open[current] = false;

        if current == goal_idx {
            return Ok(reconstruct(grid, current));
        }

        closed[current] = true;
        let tentative = grid.cell(current).g + 1;

        for n in grid.open_neighbors(current) {
            if closed[n] {
                continue;
            }

            if !in_open[n] {
                open.push(n);
                in_open[n] = true;
            } else if grid.cell(n).g <= tentative {
                continue;
            }

            let h = manhattan(grid.coords_of(n), goal);
            let cell = grid.cell_mut(n);
            cell.g = tentative;
            cell.h = h;
            cell.f = tentative + h;
            cell.parent = Some(current);
        }
    }

    // only a carving bug can disconnect two cells of a finished maze
    log::warn!(
        "no open-passage path from {:?} to {:?}, maze looks disconnected",
        start,
        goal
    );
    Ok(Vec::new())
}

fn reconstruct(grid: &Grid, goal_idx: usize) -> Vec<(usize, usize)> {
    let mut path = Vec::new();
    let mut cursor = Some(goal_idx);

    while let Some(index) = cursor {
        path.push(grid.coords_of(index));
        cursor = grid.cell(index).parent;
    }

    path.reverse();
    path
}
