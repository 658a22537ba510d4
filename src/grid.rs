use crate::error::{MazeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl std::ops::Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Self::Output {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

impl From<usize> for Direction {
    fn from(dir: usize) -> Self {
        match dir {
            0 => Direction::North,
            1 => Direction::East,
            2 => Direction::South,
            3 => Direction::West,
            _ => unreachable!(),
        }
    }
}

pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

/// A single grid square: four wall flags plus the carving and search
/// bookkeeping that lives on the cell between runs. `parent` is an index
/// into the grid's cell vector, never a reference.
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// indexed by `Direction as usize`, all present initially
    pub walls: [bool; 4],
    pub visited: bool,

    pub g: u32,
    pub h: u32,
    pub f: u32,
    pub parent: Option<usize>,
    pub is_path: bool,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            walls: [true; 4],
            visited: false,
            g: 0,
            h: 0,
            f: 0,
            parent: None,
            is_path: false,
        }
    }

    fn clear(&mut self) {
        self.walls = [true; 4];
        self.visited = false;
        self.g = 0;
        self.h = 0;
        self.f = 0;
        self.parent = None;
        self.is_path = false;
    }
}

/// Grid-adjacent cell indices of one cell, iterated in N, E, S, W order.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood {
    pub north: Option<usize>,
    pub east: Option<usize>,
    pub south: Option<usize>,
    pub west: Option<usize>,

    counter: Option<Direction>,
}

impl Iterator for Neighborhood {
    type Item = (usize, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.counter {
                Some(Direction::North) => {
                    self.counter = Some(Direction::East);
                    if let Some(north) = self.north {
                        return Some((north, Direction::North));
                    }
                }
                Some(Direction::East) => {
                    self.counter = Some(Direction::South);
                    if let Some(east) = self.east {
                        return Some((east, Direction::East));
                    }
                }
                Some(Direction::South) => {
                    self.counter = Some(Direction::West);
                    if let Some(south) = self.south {
                        return Some((south, Direction::South));
                    }
                }
                Some(Direction::West) => {
                    self.counter = None;

                    return if let Some(west) = self.west {
                        Some((west, Direction::West))
                    } else {
                        None
                    };
                }
                None => return None,
            }
        }
    }
}

pub struct Grid {
    pub dims: Dimensions,
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn with_dims(rows: usize, columns: usize) -> Self {
        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for col in 0..columns {
                cells.push(Cell::new(row, col));
            }
        }

        Self {
            dims: Dimensions { rows, columns },
            cells,
        }
    }

    /// Bounds-checked addressing; `None` is the only out-of-bounds signal,
    /// callers never compute a raw offset themselves.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.dims.rows && col < self.dims.columns {
            Some((self.dims.columns * row) + col)
        } else {
            None
        }
    }

    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index / self.dims.columns, index % self.dims.columns)
    }

    #[inline]
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    #[inline]
    pub fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Restores every cell to all-walls-present with cleared bookkeeping.
    /// Called between independent runs sharing the same dimensions.
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }
    }

    pub fn neighborhood_of(&self, index: usize) -> Neighborhood {
        let (row, col) = self.coords_of(index);

        Neighborhood {
            north: if row > 0 {
                Some(index - self.dims.columns)
            } else {
                None
            },
            east: if col < self.dims.columns - 1 {
                Some(index + 1)
            } else {
                None
            },
            south: if row < self.dims.rows - 1 {
                Some(index + self.dims.columns)
            } else {
                None
            },
            west: if col > 0 { Some(index - 1) } else { None },
            counter: Some(Direction::North),
        }
    }

    /// True when the passage toward `dir` has been opened from both sides.
    pub fn passage_open(&self, index: usize, dir: Direction) -> bool {
        let neighbor = match dir {
            Direction::North => self.neighborhood_of(index).north,
            Direction::East => self.neighborhood_of(index).east,
            Direction::South => self.neighborhood_of(index).south,
            Direction::West => self.neighborhood_of(index).west,
        };

        match neighbor {
            Some(n) => {
                !self.cells[index].walls[dir as usize] && !self.cells[n].walls[(-dir) as usize]
            }
            None => false,
        }
    }

    /// Adjacent cells reachable through an already-opened wall, in N, E, S, W
    /// order. This is the adjacency the solver sees.
    pub fn open_neighbors(&self, index: usize) -> Vec<usize> {
        self.neighborhood_of(index)
            .filter(|&(_, dir)| self.passage_open(index, dir))
            .map(|(n, _)| n)
            .collect()
    }

    /// Removes the matching wall pair between two adjacent cells, keeping
    /// walls symmetric. Non-adjacent arguments are a caller bug and are
    /// rejected rather than silently ignored.
    pub fn clear_wall_between(&mut self, one: usize, two: usize) -> Result<()> {
        let dir = self.direction_between(one, two)?;

        self.cells[one].walls[dir as usize] = false;
        self.cells[two].walls[(-dir) as usize] = false;

        Ok(())
    }

    fn direction_between(&self, one: usize, two: usize) -> Result<Direction> {
        let (r1, c1) = self.coords_of(one);
        let (r2, c2) = self.coords_of(two);

        if r1 == r2 && c1 + 1 == c2 {
            Ok(Direction::East)
        } else if r1 == r2 && c2 + 1 == c1 {
            Ok(Direction::West)
        } else if c1 == c2 && r1 + 1 == r2 {
            Ok(Direction::South)
        } else if c1 == c2 && r2 + 1 == r1 {
            Ok(Direction::North)
        } else {
            Err(MazeError::NotAdjacent)
        }
    }

    /// Number of opened wall pairs. A perfect maze on a full grid has
    /// exactly `rows * columns - 1` of them.
    pub fn open_passage_count(&self) -> usize {
        (0..self.cells.len())
            .map(|i| {
                let east = self.passage_open(i, Direction::East) as usize;
                let south = self.passage_open(i, Direction::South) as usize;
                east + south
            })
            .sum()
    }
}
