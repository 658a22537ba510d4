use rand::prelude::*;
use rand::rngs::StdRng;

use maze_steps::{Backtracker, CarveStep, Direction, Grid};

/// Terminal stand-in for the canvas host: carve a full maze, solve it
/// corner to corner, and dump the result as ASCII.
///
/// Usage: maze-steps [rows] [cols] [seed]
fn main() -> maze_steps::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let rows: usize = args.get(0).and_then(|s| s.parse().ok()).unwrap_or(15);
    let cols: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(15);
    let seed: Option<u64> = args.get(2).and_then(|s| s.parse().ok());

    let rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    let mut grid = Grid::with_dims(rows, cols);
    let mut carver = Backtracker::with_rng(rng);
    carver.start(&mut grid, (0, 0))?;

    let mut steps = 0u64;
    loop {
        steps += 1;
        if carver.step(&mut grid) == CarveStep::Complete {
            break;
        }
    }
    log::info!(
        "carved {} passages in {} steps",
        grid.open_passage_count(),
        steps
    );

    let goal = (rows - 1, cols - 1);
    let path = maze_steps::find_path(&mut grid, (0, 0), goal)?;
    log::info!("path from (0, 0) to {:?} visits {} cells", goal, path.len());

    print!("{}", render_ascii(&grid, &path));
    Ok(())
}

fn render_ascii(grid: &Grid, path: &[(usize, usize)]) -> String {
    let mut out = String::new();

    for row in 0..grid.dims.rows {
        for col in 0..grid.dims.columns {
            let index = grid.index_of(row, col).unwrap();
            out.push('+');
            out.push_str(if grid.passage_open(index, Direction::North) {
                "   "
            } else {
                "---"
            });
        }
        out.push_str("+\n");

        for col in 0..grid.dims.columns {
            let index = grid.index_of(row, col).unwrap();
            out.push(if grid.passage_open(index, Direction::West) {
                ' '
            } else {
                '|'
            });
            out.push_str(if path.contains(&(row, col)) {
                " * "
            } else {
                "   "
            });
        }
        out.push_str("|\n");
    }

    for _ in 0..grid.dims.columns {
        out.push_str("+---");
    }
    out.push_str("+\n");

    out
}
