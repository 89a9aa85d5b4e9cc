//! Cave grid storage
//!
//! A fixed-size, row-major grid of wall and floor cells. The grid never wraps:
//! every coordinate is checked against the bounds.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Solid rock, not walkable
    #[default]
    Wall,
    /// Excavated, walkable
    Floor,
}

impl Cell {
    pub fn is_floor(self) -> bool {
        self == Cell::Floor
    }
}

/// An (x, y) position on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Whether `other` is one of the four orthogonal neighbours of this coordinate.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 2D cave grid. Dimensions are fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Unchecked serialised form of a [`Grid`]
#[derive(Deserialize)]
struct GridData {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridData> for Grid {
    type Error = LevelError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let expected = data.width.checked_mul(data.height);
        if expected != Some(data.cells.len()) {
            return Err(LevelError::InvalidConfiguration(format!(
                "a {}x{} grid needs {} cells, got {}",
                data.width,
                data.height,
                data.width as u128 * data.height as u128,
                data.cells.len()
            )));
        }
        Ok(Self {
            width: data.width,
            height: data.height,
            cells: data.cells,
        })
    }
}

impl Grid {
    /// Create a grid filled with a single cell state.
    pub fn new_with(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    /// Create a grid of solid rock.
    pub fn solid(width: usize, height: usize) -> Self {
        Self::new_with(width, height, Cell::Wall)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Return an error if `coord` lies outside the grid.
    pub fn check_bounds(&self, coord: Coord) -> Result<(), LevelError> {
        if self.in_bounds(coord) {
            Ok(())
        } else {
            Err(LevelError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Index into the cell vector. Callers must have checked the bounds.
    fn index(&self, coord: Coord) -> usize {
        coord.y * self.width + coord.x
    }

    /// Get the cell at `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        if self.in_bounds(coord) {
            Some(self.cells[self.index(coord)])
        } else {
            None
        }
    }

    pub fn is_floor(&self, coord: Coord) -> bool {
        self.get(coord) == Some(Cell::Floor)
    }

    pub fn is_wall(&self, coord: Coord) -> bool {
        self.get(coord) == Some(Cell::Wall)
    }

    /// Set the cell at `coord`.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> Result<(), LevelError> {
        self.check_bounds(coord)?;
        let idx = self.index(coord);
        self.cells[idx] = cell;
        Ok(())
    }

    /// Turn every cell of a horizontal or vertical run into floor, endpoints included.
    pub fn carve_line(&mut self, from: Coord, to: Coord) -> Result<(), LevelError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if from.y == to.y {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.set(Coord::new(x, from.y), Cell::Floor)?;
            }
        } else if from.x == to.x {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                self.set(Coord::new(from.x, y), Cell::Floor)?;
            }
        } else {
            return Err(LevelError::InvalidConfiguration(format!(
                "cannot carve a diagonal line from {} to {}",
                from, to
            )));
        }
        Ok(())
    }

    /// In-bounds 4-connected neighbours in the fixed order left, right, up, down.
    ///
    /// This order decides which of several equally short paths the solver returns.
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        let mut result = Vec::with_capacity(4);

        if coord.x > 0 {
            result.push(Coord::new(coord.x - 1, coord.y));
        }
        if coord.x + 1 < self.width {
            result.push(Coord::new(coord.x + 1, coord.y));
        }
        if coord.y > 0 {
            result.push(Coord::new(coord.x, coord.y - 1));
        }
        if coord.y + 1 < self.height {
            result.push(Coord::new(coord.x, coord.y + 1));
        }

        result
    }

    /// Number of floor cells.
    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_floor()).count()
    }

    /// Iterate over all cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            (Coord::new(idx % self.width, idx / self.width), *cell)
        })
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() rejects a zero chunk size
        self.cells.chunks(self.width.max(1))
    }
}
