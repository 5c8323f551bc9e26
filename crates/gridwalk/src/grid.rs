//! Grid representation shared by every traversal.
//!
//! Positions are `(row, col)` with row 0 at the top of the input. Coordinates
//! are signed so that a step off the edge is still a valid `Position`; it just
//! fails `in_bounds`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use smallvec::SmallVec;
use strum::{Display, VariantArray};

use crate::error::{Error, Result};

/// Direction of travel - also the neighbor iteration order (`VARIANTS`)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Clockwise: up -> right -> down -> left -> up
    pub fn turn_right(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// `(d_row, d_col)`
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Parse the arrow glyphs used to mark a walker on a map.
    pub fn from_arrow(c: char) -> Option<Direction> {
        match c {
            '^' => Some(Direction::Up),
            '>' => Some(Direction::Right),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            _ => None,
        }
    }

    /// True for directions whose edges run horizontally (up/down facing).
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Position on the grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.offset(d_row, d_col)
    }

    /// Vector from `self` to `other`.
    pub fn delta_to(self, other: Position) -> (i32, i32) {
        (other.row - self.row, other.col - self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row-major grid of cells. Rows may be ragged; callers that need a rectangle
/// check with [`Grid::require_rectangular`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: Vec<Vec<T>>,
}

impl Grid<char> {
    /// Load a character grid from text lines.
    pub fn load<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::parse(lines, Some)
    }
}

impl<T> Grid<T> {
    /// Load a grid, mapping every character through `cell`. A `None` from
    /// `cell` is reported as a format error at that line and column.
    pub fn parse<I, S, F>(lines: I, mut cell: F) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(char) -> Option<T>,
    {
        let mut rows = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim_end_matches('\r');
            let mut row = Vec::with_capacity(line.len());
            for (col, c) in line.chars().enumerate() {
                match cell(c) {
                    Some(value) => row.push(value),
                    None => {
                        return Err(Error::format(
                            index + 1,
                            format!("unexpected character {:?} at column {}", c, col + 1),
                        ))
                    }
                }
            }
            rows.push(row);
        }

        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(Error::format(1, "empty grid"));
        }

        Ok(Self { rows })
    }

    /// Width of the first row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Width of `row`, or 0 if the row does not exist.
    pub fn row_width(&self, row: i32) -> usize {
        if row < 0 {
            return 0;
        }
        self.rows.get(row as usize).map_or(0, Vec::len)
    }

    pub fn require_rectangular(&self) -> Result<()> {
        let width = self.width();
        match self.rows.iter().position(|row| row.len() != width) {
            None => Ok(()),
            Some(index) => Err(Error::format(
                index + 1,
                format!(
                    "row has {} cells, expected {}",
                    self.rows[index].len(),
                    width
                ),
            )),
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && (pos.col as usize) < self.row_width(pos.row)
    }

    /// Bounds-checked lookup
    pub fn cell(&self, pos: Position) -> Option<&T> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        self.rows
            .get(pos.row as usize)
            .and_then(|row| row.get(pos.col as usize))
    }

    pub fn get(&self, pos: Position) -> Result<&T> {
        self.cell(pos).ok_or(Error::OutOfBounds {
            row: pos.row,
            col: pos.col,
        })
    }

    /// In-bounds 4-neighbors of `pos`, in `Direction::VARIANTS` order.
    pub fn neighbors4(&self, pos: Position) -> impl Iterator<Item = Position> {
        let out: SmallVec<[Position; 4]> = Direction::VARIANTS
            .iter()
            .map(|&direction| pos.step(direction))
            .filter(|&next| self.in_bounds(next))
            .collect();
        out.into_iter()
    }

    /// Every in-bounds position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            (0..cells.len()).map(move |col| Position::new(row as i32, col as i32))
        })
    }

    /// Positions paired with their cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, value)| (Position::new(row as i32, col as i32), value))
        })
    }

    /// First position (row-major) whose cell satisfies `pred`.
    pub fn find<F>(&self, mut pred: F) -> Option<Position>
    where
        F: FnMut(&T) -> bool,
    {
        self.cells()
            .find(|(_, value)| pred(*value))
            .map(|(pos, _)| pos)
    }

    pub fn position_of(&self, value: &T) -> Option<Position>
    where
        T: PartialEq,
    {
        self.find(|cell| cell == value)
    }

    /// A copy of this grid with the cell at `pos` replaced.
    pub fn with_cell(&self, pos: Position, value: T) -> Result<Self>
    where
        T: Clone,
    {
        self.get(pos)?;
        let mut rows = self.rows.clone();
        rows[pos.row as usize][pos.col as usize] = value;
        Ok(Self { rows })
    }
}

impl FromStr for Grid<char> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::load(s.lines())
    }
}

impl fmt::Display for Grid<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for c in row {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}
