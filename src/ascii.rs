//! ASCII rendering and export for cave levels
//!
//! Turns a grid into text using one of the glyph sets below, optionally
//! marking the start, the end and the solution route.

use std::fs::File;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::excavation::Candidate;
use crate::grid::{Cell, Coord, Grid};
use crate::pathfinding::SearchPath;

/// Glyph sets for walls and floors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// `#` walls, `.` floors
    #[default]
    Classic,
    /// `#` walls, blank floors
    Cavern,
    /// `1` walls, `0` floors, for LED matrices
    Matrix,
}

impl RenderStyle {
    pub fn all() -> &'static [RenderStyle] {
        &[RenderStyle::Classic, RenderStyle::Cavern, RenderStyle::Matrix]
    }

    pub fn wall_char(&self) -> char {
        match self {
            RenderStyle::Classic | RenderStyle::Cavern => '#',
            RenderStyle::Matrix => '1',
        }
    }

    pub fn floor_char(&self) -> char {
        match self {
            RenderStyle::Classic => '.',
            RenderStyle::Cavern => ' ',
            RenderStyle::Matrix => '0',
        }
    }

    pub fn cell_char(&self, cell: Cell) -> char {
        match cell {
            Cell::Wall => self.wall_char(),
            Cell::Floor => self.floor_char(),
        }
    }
}

pub const START_CHAR: char = 'S';
pub const END_CHAR: char = 'E';
pub const PATH_CHAR: char = '*';

/// Markers drawn over the plain grid
#[derive(Clone, Copy, Debug, Default)]
pub struct Overlay<'a> {
    pub start: Option<Coord>,
    pub end: Option<Coord>,
    pub path: Option<&'a SearchPath>,
}

impl<'a> Overlay<'a> {
    /// Start and end markers for a candidate, plus its route if given.
    pub fn for_candidate(candidate: &Candidate, path: Option<&'a SearchPath>) -> Self {
        Self {
            start: Some(candidate.start),
            end: Some(candidate.end),
            path,
        }
    }

    fn glyph(&self, coord: Coord) -> Option<char> {
        // End wins over start when they coincide
        if self.end == Some(coord) {
            Some(END_CHAR)
        } else if self.start == Some(coord) {
            Some(START_CHAR)
        } else if self.path.is_some_and(|p| p.contains(coord)) {
            Some(PATH_CHAR)
        } else {
            None
        }
    }
}

/// Grid rows as strings, without overlay.
pub fn row_strings(grid: &Grid, style: RenderStyle) -> Vec<String> {
    grid.rows()
        .map(|row| row.iter().map(|c| style.cell_char(*c)).collect())
        .collect()
}

/// Render the grid, one line per row.
pub fn render_grid(grid: &Grid, style: RenderStyle) -> String {
    render_with_overlay(grid, style, &Overlay::default())
}

pub fn render_with_overlay(grid: &Grid, style: RenderStyle, overlay: &Overlay<'_>) -> String {
    let mut result = String::with_capacity((grid.width() + 1) * grid.height());

    for (coord, cell) in grid.iter() {
        let ch = overlay.glyph(coord).unwrap_or_else(|| style.cell_char(cell));
        result.push(ch);
        if coord.x + 1 == grid.width() {
            result.push('\n');
        }
    }

    result
}

pub fn print_level(
    candidate: &Candidate,
    path: Option<&SearchPath>,
    style: RenderStyle,
    markers: bool,
) {
    let overlay = if markers {
        Overlay::for_candidate(candidate, path)
    } else {
        Overlay::default()
    };
    print!("{}", render_with_overlay(&candidate.grid, style, &overlay));
}

/// Write a level to a text file with a short header.
pub fn export_level_file(
    candidate: &Candidate,
    path: &SearchPath,
    style: RenderStyle,
    seed: u64,
    file_path: &str,
) -> io::Result<()> {
    let mut file = File::create(file_path)?;
    let grid = &candidate.grid;

    writeln!(file, "=== CAVE LEVEL ===")?;
    writeln!(file, "Seed: {}", seed)?;
    writeln!(file, "Size: {}x{}", grid.width(), grid.height())?;
    writeln!(file, "Floor cells: {}", grid.floor_count())?;
    writeln!(file, "Start: {}  End: {}", candidate.start, candidate.end)?;
    writeln!(file, "Solution length: {}", path.len())?;
    writeln!(file)?;

    write!(file, "{}", render_grid(grid, style))?;
    writeln!(file)?;

    writeln!(file, "=== SOLUTION ===")?;
    let overlay = Overlay::for_candidate(candidate, Some(path));
    write!(file, "{}", render_with_overlay(grid, style, &overlay))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::solve;

    fn corridor() -> Candidate {
        let mut grid = Grid::solid(5, 3);
        grid.carve_line(Coord::new(1, 1), Coord::new(3, 1)).unwrap();
        Candidate {
            grid,
            start: Coord::new(1, 1),
            end: Coord::new(3, 1),
        }
    }

    #[test]
    fn test_styles() {
        let level = corridor();
        assert_eq!(render_grid(&level.grid, RenderStyle::Classic), "#####\n#...#\n#####\n");
        assert_eq!(render_grid(&level.grid, RenderStyle::Cavern), "#####\n#   #\n#####\n");
        assert_eq!(render_grid(&level.grid, RenderStyle::Matrix), "11111\n10001\n11111\n");

        for style in RenderStyle::all() {
            assert_ne!(style.wall_char(), style.floor_char());
            assert_eq!(style.cell_char(Cell::Floor), style.floor_char());
        }
    }

    #[test]
    fn test_overlay_marks_route() {
        let level = corridor();
        let path = solve(&level.grid, level.start, level.end).unwrap();
        let overlay = Overlay::for_candidate(&level, Some(&path));

        let text = render_with_overlay(&level.grid, RenderStyle::Classic, &overlay);
        assert_eq!(text, "#####\n#S*E#\n#####\n");
    }

    #[test]
    fn test_row_strings() {
        let level = corridor();
        let rows = row_strings(&level.grid, RenderStyle::Matrix);
        assert_eq!(rows, vec!["11111", "10001", "11111"]);
    }

    #[test]
    fn test_export_level_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("level.txt");
        let level = corridor();
        let path = solve(&level.grid, level.start, level.end).unwrap();

        let out = file_path.to_str().unwrap();
        export_level_file(&level, &path, RenderStyle::Classic, 42, out).unwrap();

        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("Seed: 42"));
        assert!(contents.contains("Solution length: 3"));
        assert!(contents.contains("#S*E#"));
    }
}
