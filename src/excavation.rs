//! Drunken-walk cave excavation
//!
//! A walker starts at the centre of a solid grid and staggers one cell at a
//! time in a random orthogonal direction, turning every wall it stands on into
//! floor until its removal budget is spent. Moves that would take it into the
//! padding margin are dropped and the walker stays put for that step.

use clap::ValueEnum;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::grid::{Cell, Coord, Grid};

/// Named parameter sets for common level shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LevelPreset {
    /// 55x35 cave, the usual candidate for best-of-N selection
    #[default]
    Classic,
    /// Wide 95x35 cavern with a large budget
    Cavern,
    /// Tiny 12x8 layout sized for an LED matrix
    Matrix,
}

impl LevelPreset {
    pub fn all() -> &'static [Self] {
        &[Self::Classic, Self::Cavern, Self::Matrix]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Classic => "55x35 cave, 500 cells removed",
            Self::Cavern => "95x35 cavern, 1500 cells removed",
            Self::Matrix => "12x8 LED matrix, 20 cells removed",
        }
    }
}

impl std::fmt::Display for LevelPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => write!(f, "classic"),
            Self::Cavern => write!(f, "cavern"),
            Self::Matrix => write!(f, "matrix"),
        }
    }
}

/// Parameters of a single excavation run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcavationParams {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Wall cells to remove; the walk removes one more than this (see [`excavate`])
    pub removal_budget: usize,
    /// Margin along every edge the walker may not enter
    pub padding: usize,
}

impl Default for ExcavationParams {
    fn default() -> Self {
        Self::from_preset(LevelPreset::Classic)
    }
}

impl ExcavationParams {
    pub fn new(width: usize, height: usize, removal_budget: usize, padding: usize) -> Self {
        Self {
            width,
            height,
            removal_budget,
            padding,
        }
    }

    pub fn from_preset(preset: LevelPreset) -> Self {
        match preset {
            LevelPreset::Classic => Self::new(55, 35, 500, 2),
            LevelPreset::Cavern => Self::new(95, 35, 1500, 2),
            LevelPreset::Matrix => Self::new(12, 8, 20, 2),
        }
    }

    /// Where every walk starts.
    pub fn center(&self) -> Coord {
        Coord::new(self.width / 2, self.height / 2)
    }

    /// Number of cells the walker can reach, or `None` if the padding leaves no room.
    pub fn interior_capacity(&self) -> Option<usize> {
        let margin = self.padding.checked_mul(2)?;
        let inner_w = self.width.checked_sub(margin).filter(|w| *w > 0)?;
        let inner_h = self.height.checked_sub(margin).filter(|h| *h > 0)?;
        inner_w.checked_mul(inner_h)
    }

    /// Check the preconditions of [`excavate`].
    pub fn validate(&self) -> Result<(), LevelError> {
        let capacity = self.interior_capacity().ok_or_else(|| {
            LevelError::InvalidConfiguration(format!(
                "a {}x{} grid leaves no room to walk with padding {}",
                self.width, self.height, self.padding
            ))
        })?;

        // The walk runs until the budget drops below zero, so it needs budget + 1 cells
        if self.removal_budget >= capacity {
            return Err(LevelError::InvalidConfiguration(format!(
                "removal budget {} needs {} cells but only {} are reachable inside padding {}",
                self.removal_budget,
                self.removal_budget as u128 + 1,
                capacity,
                self.padding
            )));
        }

        Ok(())
    }
}

/// One of the four moves the walker can roll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// In die-roll order: a roll of 1 is `Left`, 4 is `Down`.
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Roll a uniformly random direction: a die in 1..=4 indexes [`Self::ALL`].
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[usize::from(rng.gen_range(1..=4u8) - 1)]
    }
}

/// Progress of one walk. Owned by a single [`excavate`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkState {
    pub position: Coord,
    /// Remaining removals; the walk continues while this is >= 0
    pub remaining: i64,
    pub padding: usize,
}

impl WalkState {
    pub fn new(position: Coord, removal_budget: usize, padding: usize) -> Result<Self, LevelError> {
        let remaining = i64::try_from(removal_budget).map_err(|_| {
            LevelError::InvalidConfiguration(format!(
                "removal budget {} is too large",
                removal_budget
            ))
        })?;
        Ok(Self {
            position,
            remaining,
            padding,
        })
    }

    pub fn is_active(&self) -> bool {
        self.remaining >= 0
    }

    /// Move one cell in `direction` unless that leaves `[padding, dim - 1 - padding]`.
    ///
    /// Returns whether the walker moved.
    pub fn advance(&mut self, direction: Direction, width: usize, height: usize) -> bool {
        let Coord { x, y } = self.position;
        let p = self.padding;
        let next = match direction {
            Direction::Left if x > p => Coord::new(x - 1, y),
            Direction::Right if x + 1 + p < width => Coord::new(x + 1, y),
            Direction::Up if y > p => Coord::new(x, y - 1),
            Direction::Down if y + 1 + p < height => Coord::new(x, y + 1),
            _ => return false,
        };
        self.position = next;
        true
    }
}

/// Output of one excavation run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub grid: Grid,
    /// Grid centre, where the walk began
    pub start: Coord,
    /// Cell the walker stood on during its final step
    pub end: Coord,
}

/// Carve a cave with a drunken walk.
///
/// Each step the walker excavates its cell if it is still wall (spending one
/// unit of budget), then rolls a direction and moves if the move stays out of
/// the padding. The walk ends once the budget has gone below zero, so exactly
/// `removal_budget + 1` cells are excavated. The end coordinate is the cell of
/// the last step; it may equal the start.
///
/// # Errors
///
/// Returns [`LevelError::InvalidConfiguration`] before touching the grid when
/// the padding leaves no interior or the budget cannot be met.
pub fn excavate<R: Rng + ?Sized>(
    params: &ExcavationParams,
    rng: &mut R,
) -> Result<Candidate, LevelError> {
    params.validate()?;

    let mut grid = Grid::solid(params.width, params.height);
    let start = params.center();
    let mut walk = WalkState::new(start, params.removal_budget, params.padding)?;
    let mut end = start;
    let mut steps = 0usize;

    while walk.is_active() {
        end = walk.position;

        if grid.is_wall(end) {
            grid.set(end, Cell::Floor)?;
            walk.remaining -= 1;
        }

        let direction = Direction::roll(rng);
        walk.advance(direction, params.width, params.height);
        steps += 1;
    }

    debug!(
        "Excavated {} cells in {} steps, start {} end {}",
        grid.floor_count(),
        steps,
        start,
        end
    );

    Ok(Candidate { grid, start, end })
}
