//! Step-driven maze carving and shortest-path solving on a wall grid.
//!
//! The core is a grid of walled cells plus two algorithms: a randomized
//! depth-first backtracker that opens one passage per [`Backtracker::step`],
//! and an A* search over the opened passages. A host drives everything
//! through a [`Session`], one [`Session::tick`] per frame, and handles all
//! drawing, audio, and input itself.

pub mod carver;
pub mod error;
pub mod grid;
pub mod session;
pub mod solver;

pub use carver::{Backtracker, CarveStep};
pub use error::{MazeError, Result};
pub use grid::{Cell, Dimensions, Direction, Grid, Neighborhood};
pub use session::{Session, TickEvent};
pub use solver::find_path;
