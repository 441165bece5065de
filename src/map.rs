use std::fmt;

use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

pub const EMPTY: char = '.';
pub const OBSTACLE: char = '#';
pub const GUARD_START: char = '^';
pub const VISITED: char = 'X';
pub const TRIAL_OBSTACLE: char = 'O';

#[derive(Debug, Error, Diagnostic)]
pub enum MapError {
    #[error("failed to parse map: {0}")]
    Parse(String),
    #[error("no guard marker '^' in map")]
    MissingGuard,
}

/// Grid coordinates, x growing right and y growing down.
///
/// Signed so a one-step probe can land outside the grid and still be
/// representable before the bounds check rejects it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    #[default]
    North, // ^
    South, // v
    East,  // >
    West,  // <
}

impl Direction {
    pub fn turn_right(&self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Unit step vector for this facing.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// The patrol area as rows of single-character cells.
///
/// Cells are overwritten in place to record visited markers; `Clone` is the
/// deep copy used for trial grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    grid: Vec<Vec<char>>,
}

impl Map {
    pub fn parse(input: &str) -> Result<Self, MapError> {
        let trimmed = input.trim();
        let (rest, grid) =
            parser::parse_rows(trimmed).map_err(|e| MapError::Parse(e.to_string()))?;

        if !rest.is_empty() {
            return Err(MapError::Parse(format!(
                "unexpected input starting at {:?}",
                rest.lines().next().unwrap_or(rest)
            )));
        }

        Ok(Self { grid })
    }

    /// First `^` cell, scanning rows top to bottom and columns left to right.
    pub fn guard_start(&self) -> Result<Position, MapError> {
        let (y, row) = self
            .grid
            .iter()
            .find_position(|row| row.contains(&GUARD_START))
            .ok_or(MapError::MissingGuard)?;
        let x = row
            .iter()
            .position(|&cell| cell == GUARD_START)
            .ok_or(MapError::MissingGuard)?;

        Ok(Position::new(x as i32, y as i32))
    }

    /// Bounds are checked against the specific row's length; rows may be
    /// ragged.
    pub fn is_within_bounds(&self, position: Position) -> bool {
        position.y >= 0
            && (position.y as usize) < self.grid.len()
            && position.x >= 0
            && (position.x as usize) < self.grid[position.y as usize].len()
    }

    pub fn get(&self, position: Position) -> Option<char> {
        if !self.is_within_bounds(position) {
            return None;
        }
        Some(self.grid[position.y as usize][position.x as usize])
    }

    /// Overwrites a cell in place; out-of-bounds writes are ignored.
    pub fn set(&mut self, position: Position, value: char) {
        if self.is_within_bounds(position) {
            self.grid[position.y as usize][position.x as usize] = value;
        }
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

mod parser {
    use nom::{
        character::complete::{line_ending, one_of, space0},
        multi::{many1, separated_list1},
        sequence::preceded,
        IResult,
    };

    use super::{EMPTY, GUARD_START, OBSTACLE, TRIAL_OBSTACLE, VISITED};

    fn parse_cell(input: &str) -> IResult<&str, char> {
        one_of(&[EMPTY, OBSTACLE, GUARD_START, VISITED, TRIAL_OBSTACLE][..])(input)
    }

    // Rows separated by one or more line endings; trailing blanks on a line
    // and whitespace-only lines drop out with the separator.
    pub(crate) fn parse_rows(input: &str) -> IResult<&str, Vec<Vec<char>>> {
        separated_list1(many1(preceded(space0, line_ending)), many1(parse_cell))(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn test_parse() -> miette::Result<()> {
        let map = Map::parse(".#.\n.^.\n...")?;
        assert_eq!(Some(OBSTACLE), map.get(Position::new(1, 0)));
        assert_eq!(Some(GUARD_START), map.get(Position::new(1, 1)));
        assert_eq!(Some(EMPTY), map.get(Position::new(2, 2)));
        Ok(())
    }

    #[test]
    fn test_parse_skips_blank_lines() -> miette::Result<()> {
        let map = Map::parse("\n\n.#.\n   \n.^.  \n\n")?;
        assert_eq!(Position::new(1, 1), map.guard_start()?);
        assert_eq!(".#.\n.^.\n", format!("{}", map));
        Ok(())
    }

    #[test]
    fn test_parse_crlf_line_endings() -> miette::Result<()> {
        let map = Map::parse(".#.\r\n.^.\r\n")?;
        assert_eq!(Position::new(1, 1), map.guard_start()?);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(Map::parse(""), Err(MapError::Parse(_))));
        assert!(matches!(Map::parse("  \n \n"), Err(MapError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_cell() {
        assert!(matches!(Map::parse(".#.\n.?."), Err(MapError::Parse(_))));
    }

    #[test]
    fn test_guard_start_missing() -> miette::Result<()> {
        let map = Map::parse(".#.\n...")?;
        assert!(matches!(map.guard_start(), Err(MapError::MissingGuard)));
        Ok(())
    }

    #[test]
    fn test_guard_start_finds_first_marker() -> miette::Result<()> {
        let map = Map::parse("...\n..^\n^..")?;
        assert_eq!(Position::new(2, 1), map.guard_start()?);
        Ok(())
    }

    #[test]
    fn test_bounds() -> miette::Result<()> {
        let map = Map::parse("...\n...")?;
        assert!(map.is_within_bounds(Position::new(0, 0)));
        assert!(map.is_within_bounds(Position::new(2, 1)));
        assert!(!map.is_within_bounds(Position::new(3, 0)));
        assert!(!map.is_within_bounds(Position::new(0, 2)));
        assert!(!map.is_within_bounds(Position::new(-1, 0)));
        assert!(!map.is_within_bounds(Position::new(0, -1)));
        Ok(())
    }

    #[test]
    fn test_bounds_uses_row_length() -> miette::Result<()> {
        // Ragged rows are legal; each row answers for its own width.
        let map = Map::parse(".....\n..\n...")?;
        assert!(map.is_within_bounds(Position::new(4, 0)));
        assert!(!map.is_within_bounds(Position::new(2, 1)));
        assert!(map.is_within_bounds(Position::new(2, 2)));
        Ok(())
    }

    #[test]
    fn test_set_marks_cell() -> miette::Result<()> {
        let mut map = Map::parse("...\n.^.")?;
        map.set(Position::new(0, 0), VISITED);
        assert_eq!(Some(VISITED), map.get(Position::new(0, 0)));

        // Out-of-bounds writes are dropped
        map.set(Position::new(5, 5), VISITED);
        assert_eq!(None, map.get(Position::new(5, 5)));
        Ok(())
    }

    #[rstest]
    #[case(Direction::North, Direction::East)]
    #[case(Direction::East, Direction::South)]
    #[case(Direction::South, Direction::West)]
    #[case(Direction::West, Direction::North)]
    fn test_turn_right(#[case] from: Direction, #[case] to: Direction) {
        assert_eq!(to, from.turn_right());
    }

    #[rstest]
    #[case(Direction::North)]
    #[case(Direction::East)]
    #[case(Direction::South)]
    #[case(Direction::West)]
    fn test_turn_right_is_clockwise_rotation(#[case] direction: Direction) {
        // Turning right maps the step vector (dx, dy) to (-dy, dx).
        let (dx, dy) = direction.delta();
        assert_eq!((-dy, dx), direction.turn_right().delta());
    }

    #[test]
    fn test_map_display() -> miette::Result<()> {
        let map = Map::parse(".#\n^.")?;
        assert_eq!(".#\n^.\n", format!("{}", map));
        Ok(())
    }
}
