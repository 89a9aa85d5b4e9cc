//! Cave generation library
//!
//! Carves caves with a drunken walk, measures each one by the length of its
//! shortest start-to-end route and keeps the best of a batch.

pub mod ascii;
pub mod config;
pub mod error;
pub mod excavation;
pub mod grid;
pub mod pathfinding;
pub mod seeds;
pub mod selection;

pub use error::LevelError;
pub use excavation::{excavate, Candidate, ExcavationParams};
pub use grid::{Cell, Coord, Grid};
pub use pathfinding::{solve, SearchPath};
pub use selection::{select_best, select_best_parallel, Selection};
