use rand::prelude::*;

use crate::carver::{Backtracker, CarveStep};
use crate::error::{MazeError, Result};
use crate::grid::Grid;
use crate::solver;

/// pixels per cell-size step; the host control maps 1..=6 onto 10..=60 px
pub const CELL_SCALAR: u32 = 10;
pub const MIN_CELL_STEP: u32 = 1;
pub const MAX_CELL_STEP: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Placing,
    Carving,
    Carved,
}

/// What happened on one external tick, so the host can drive its highlight
/// and tone feedback without knowing the algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// one carving step ran; this cell is the current frontier
    Carving { frontier: (usize, usize) },
    /// carving finished on this tick
    Carved,
    /// the next cell of the computed path was revealed
    PathCell((usize, usize)),
    /// the reveal ran out of cells on this tick
    PathDone,
    Idle,
}

/// One interactive run, owned by the host: the grid, the carver and its
/// stack, the designated endpoints, and the computed path with its reveal
/// cursor. The host calls `tick` once per frame and forwards clicks; all
/// drawing, audio and widgets stay on the host side.
pub struct Session<R: Rng = ThreadRng> {
    pub grid: Grid,
    carver: Backtracker<R>,

    pub start: Option<(usize, usize)>,
    pub goal: Option<(usize, usize)>,
    setting_start: bool,

    phase: Phase,
    using_random: bool,

    path: Vec<(usize, usize)>,
    path_index: usize,
    revealing: bool,

    width: f32,
    height: f32,
    cell_px: f32,
}

impl Session<ThreadRng> {
    pub fn new(width: f32, height: f32, step: u32) -> Result<Self> {
        Self::with_rng(width, height, step, rand::thread_rng())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(width: f32, height: f32, step: u32, rng: R) -> Result<Self> {
        let (rows, cols) = grid_dims(width, height, step)?;

        Ok(Self {
            grid: Grid::with_dims(rows, cols),
            carver: Backtracker::with_rng(rng),
            start: None,
            goal: None,
            setting_start: true,
            phase: Phase::Placing,
            using_random: false,
            path: Vec::new(),
            path_index: 0,
            revealing: false,
            width,
            height,
            cell_px: cell_px(step),
        })
    }

    /// Rebuilds the grid at a new granularity and discards the current run.
    pub fn set_cell_size(&mut self, step: u32) -> Result<()> {
        let (rows, cols) = grid_dims(self.width, self.height, step)?;

        self.cell_px = cell_px(step);
        self.grid = Grid::with_dims(rows, cols);
        self.clear_run_state();

        Ok(())
    }

    /// Discards all carving, search, and designation state. This is the
    /// only cancellation mechanism.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.clear_run_state();
    }

    fn clear_run_state(&mut self) {
        self.carver.reset();
        self.start = None;
        self.goal = None;
        self.setting_start = true;
        self.phase = Phase::Placing;
        self.using_random = false;
        self.path.clear();
        self.path_index = 0;
        self.revealing = false;
    }

    /// Maps a canvas click to a cell and forwards to `select_cell`. Clicks
    /// outside the grid are ignored, like the host canvas would.
    pub fn handle_click(&mut self, x: f32, y: f32) {
        if x < 0. || y < 0. {
            return;
        }

        let row = (y / self.cell_px) as usize;
        let col = (x / self.cell_px) as usize;

        if row < self.grid.dims.rows && col < self.grid.dims.columns {
            // in-bounds by the check above
            let _ = self.select_cell(row, col);
        }
    }

    /// Designation state machine: first selection is the start, the next
    /// distinct one is the goal, and once both are set carving begins from
    /// the start. Selections during or after carving are ignored.
    pub fn select_cell(&mut self, row: usize, col: usize) -> Result<()> {
        if self.grid.index_of(row, col).is_none() {
            return Err(MazeError::OutOfBounds { row, col });
        }

        if self.phase != Phase::Placing {
            return Ok(());
        }

        if self.setting_start {
            self.start = Some((row, col));
            self.setting_start = false;
        } else if self.start != Some((row, col)) {
            self.goal = Some((row, col));
            self.setting_start = true;
        }

        if let (Some(start), Some(_)) = (self.start, self.goal) {
            self.carver.start(&mut self.grid, start)?;
            self.phase = Phase::Carving;
        }

        Ok(())
    }

    /// Begins carving from a random origin without designated endpoints.
    /// Returns the chosen origin.
    pub fn random_maze(&mut self) -> (usize, usize) {
        self.reset();
        let origin = self.carver.start_anywhere(&mut self.grid);
        self.start = Some(origin);
        self.setting_start = false;
        self.phase = Phase::Carving;
        self.using_random = true;

        origin
    }

    /// Freezes a random carve: the current frontier becomes the goal and
    /// the remaining stack is dropped, leaving the maze as carved so far.
    pub fn stop_random(&mut self) -> Result<(usize, usize)> {
        if !self.using_random {
            return Err(MazeError::NotReady("no random carve in progress"));
        }

        let goal = self
            .carver
            .frontier(&self.grid)
            .or(self.start)
            .ok_or(MazeError::NotReady("no random carve in progress"))?;

        self.goal = Some(goal);
        self.carver.abandon();
        self.phase = Phase::Carved;
        self.using_random = false;

        Ok(goal)
    }

    /// One cooperative advance per external frame: a carving step while
    /// carving, a path-reveal step while revealing, otherwise idle.
    pub fn tick(&mut self) -> TickEvent {
        match self.phase {
            Phase::Placing => TickEvent::Idle,
            Phase::Carving => match self.carver.step(&mut self.grid) {
                CarveStep::Opened(frontier) => TickEvent::Carving { frontier },
                CarveStep::Backtracked => match self.carver.frontier(&self.grid) {
                    Some(frontier) => TickEvent::Carving { frontier },
                    None => TickEvent::Idle,
                },
                CarveStep::Complete | CarveStep::AlreadyComplete => {
                    log::info!(
                        "carved {} passages on a {}x{} grid",
                        self.grid.open_passage_count(),
                        self.grid.dims.rows,
                        self.grid.dims.columns
                    );
                    self.phase = Phase::Carved;
                    TickEvent::Carved
                }
            },
            Phase::Carved => {
                if !self.revealing {
                    return TickEvent::Idle;
                }

                if self.path_index < self.path.len() {
                    let (row, col) = self.path[self.path_index];
                    self.path_index += 1;
                    // in-bounds: the path came out of this grid
                    if let Some(index) = self.grid.index_of(row, col) {
                        self.grid.cell_mut(index).is_path = true;
                    }
                    TickEvent::PathCell((row, col))
                } else {
                    self.revealing = false;
                    TickEvent::PathDone
                }
            }
        }
    }

    /// Runs A* between the designated endpoints and arms the incremental
    /// reveal. Rejected until carving is complete and both endpoints exist,
    /// or while a reveal is still playing out.
    pub fn show_path(&mut self) -> Result<&[(usize, usize)]> {
        if self.revealing {
            return Err(MazeError::NotReady("path reveal in progress"));
        }
        if self.phase != Phase::Carved {
            return Err(MazeError::NotReady("carving not complete"));
        }

        let start = self
            .start
            .ok_or(MazeError::NotReady("start not designated"))?;
        let goal = self.goal.ok_or(MazeError::NotReady("goal not designated"))?;

        self.clear_path();
        self.path = solver::find_path(&mut self.grid, start, goal)?;
        self.revealing = !self.path.is_empty();

        Ok(&self.path)
    }

    fn clear_path(&mut self) {
        for &(row, col) in &self.path {
            if let Some(index) = self.grid.index_of(row, col) {
                self.grid.cells[index].is_path = false;
            }
        }
        self.path.clear();
        self.path_index = 0;
    }

    pub fn is_carving_complete(&self) -> bool {
        self.phase == Phase::Carved
    }

    pub fn path(&self) -> &[(usize, usize)] {
        &self.path
    }
}

fn cell_px(step: u32) -> f32 {
    (step * CELL_SCALAR) as f32
}

fn grid_dims(width: f32, height: f32, step: u32) -> Result<(usize, usize)> {
    if step < MIN_CELL_STEP || step > MAX_CELL_STEP {
        return Err(MazeError::BadCellSize(step));
    }

    let px = cell_px(step);
    let rows = (height / px) as usize;
    let cols = (width / px) as usize;

    if rows == 0 || cols == 0 {
        return Err(MazeError::NotReady("canvas smaller than one cell"));
    }

    Ok((rows, cols))
}

#[cfg(test)]
mod test_session {
    use super::*;

    /// zero rng: carving always picks the first unvisited neighbor
    struct FirstChoice;

    impl RngCore for FirstChoice {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest.iter_mut() {
                *byte = 0;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn two_by_two() -> Session<FirstChoice> {
        // 20x20 px canvas at step 1 (10 px cells) is a 2x2 grid
        Session::with_rng(20., 20., 1, FirstChoice).unwrap()
    }

    #[test]
    fn cell_size_bounds() {
        assert_eq!(
            Session::with_rng(600., 600., 0, FirstChoice).err(),
            Some(MazeError::BadCellSize(0))
        );
        assert_eq!(
            Session::with_rng(600., 600., 7, FirstChoice).err(),
            Some(MazeError::BadCellSize(7))
        );

        let session = Session::with_rng(600., 600., 4, FirstChoice).unwrap();
        assert_eq!(session.grid.dims.rows, 15);
        assert_eq!(session.grid.dims.columns, 15);
    }

    #[test]
    fn set_cell_size_rebuilds_the_grid() {
        let mut session = Session::with_rng(600., 600., 4, FirstChoice).unwrap();
        session.select_cell(0, 0).unwrap();

        session.set_cell_size(6).unwrap();
        assert_eq!(session.grid.dims.rows, 10);
        assert_eq!(session.start, None);
        assert!(!session.is_carving_complete());
    }

    #[test]
    fn click_designation_starts_carving() {
        let mut session = two_by_two();

        assert_eq!(session.tick(), TickEvent::Idle);

        session.select_cell(0, 0).unwrap();
        assert_eq!(session.start, Some((0, 0)));
        assert_eq!(session.goal, None);

        // re-selecting the start cell is not a goal
        session.select_cell(0, 0).unwrap();
        assert_eq!(session.goal, None);

        session.select_cell(1, 0).unwrap();
        assert_eq!(session.goal, Some((1, 0)));

        // carving is underway now; further selections are ignored
        session.select_cell(1, 1).unwrap();
        assert_eq!(session.goal, Some((1, 0)));
    }

    #[test]
    fn select_cell_rejects_out_of_bounds() {
        let mut session = two_by_two();
        assert_eq!(
            session.select_cell(2, 0),
            Err(MazeError::OutOfBounds { row: 2, col: 0 })
        );
    }

    #[test]
    fn pixel_clicks_map_to_cells() {
        let mut session = two_by_two();

        session.handle_click(15., 5.); // col 1, row 0
        assert_eq!(session.start, Some((0, 1)));

        session.handle_click(-3., 5.); // off canvas, ignored
        session.handle_click(25., 5.); // past the grid, ignored
        assert_eq!(session.goal, None);

        session.handle_click(5., 15.); // col 0, row 1
        assert_eq!(session.goal, Some((1, 0)));
    }

    #[test]
    fn full_run_carve_solve_reveal() {
        let mut session = two_by_two();
        session.select_cell(0, 0).unwrap();
        session.select_cell(1, 0).unwrap();

        assert_eq!(
            session.show_path().err(),
            Some(MazeError::NotReady("carving not complete"))
        );

        // deterministic first-choice carve: three openings, three
        // backtracks, then completion
        assert_eq!(session.tick(), TickEvent::Carving { frontier: (0, 1) });
        assert_eq!(session.tick(), TickEvent::Carving { frontier: (1, 1) });
        assert_eq!(session.tick(), TickEvent::Carving { frontier: (1, 0) });
        assert_eq!(session.tick(), TickEvent::Carving { frontier: (1, 1) });
        assert_eq!(session.tick(), TickEvent::Carving { frontier: (0, 1) });
        assert_eq!(session.tick(), TickEvent::Carving { frontier: (0, 0) });
        assert_eq!(session.tick(), TickEvent::Carved);
        assert!(session.is_carving_complete());

        let path = session.show_path().unwrap().to_vec();
        assert_eq!(path, vec![(0, 0), (0, 1), (1, 1), (1, 0)]);

        // reveal plays the path back one cell per tick
        assert_eq!(session.tick(), TickEvent::PathCell((0, 0)));
        assert_eq!(session.tick(), TickEvent::PathCell((0, 1)));
        assert_eq!(session.tick(), TickEvent::PathCell((1, 1)));
        assert_eq!(session.tick(), TickEvent::PathCell((1, 0)));
        assert_eq!(session.tick(), TickEvent::PathDone);
        assert_eq!(session.tick(), TickEvent::Idle);

        let corner = session.grid.index_of(1, 1).unwrap();
        assert!(session.grid.cell(corner).is_path);
    }

    #[test]
    fn show_path_is_rejected_mid_reveal() {
        let mut session = two_by_two();
        session.select_cell(0, 0).unwrap();
        session.select_cell(1, 1).unwrap();
        while session.tick() != TickEvent::Carved {}

        session.show_path().unwrap();
        session.tick();
        assert_eq!(
            session.show_path().err(),
            Some(MazeError::NotReady("path reveal in progress"))
        );
    }

    #[test]
    fn random_maze_stop_freezes_the_frontier_as_goal() {
        let mut session = two_by_two();

        let origin = session.random_maze();
        assert_eq!(session.start, Some(origin));

        session.tick();
        session.tick();

        let goal = session.stop_random().unwrap();
        assert_eq!(session.goal, Some(goal));
        assert!(session.is_carving_complete());

        // the partial carve still connects start and frontier
        let path = session.show_path().unwrap();
        assert_eq!(path.first(), Some(&origin));
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn stop_random_requires_a_random_carve() {
        let mut session = two_by_two();
        assert_eq!(
            session.stop_random().err(),
            Some(MazeError::NotReady("no random carve in progress"))
        );
    }

    #[test]
    fn reset_discards_the_run() {
        let mut session = two_by_two();
        session.select_cell(0, 0).unwrap();
        session.select_cell(1, 1).unwrap();
        while session.tick() != TickEvent::Carved {}
        session.show_path().unwrap();

        session.reset();

        assert_eq!(session.start, None);
        assert_eq!(session.goal, None);
        assert!(session.path().is_empty());
        assert!(!session.is_carving_complete());
        assert_eq!(session.grid.open_passage_count(), 0);
        assert_eq!(session.tick(), TickEvent::Idle);
    }
}
