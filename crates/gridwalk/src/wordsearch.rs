//! Word search over a text grid. Rows may have different lengths.

use crate::grid::{Grid, Position};

const OFFSETS8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn reads(grid: &Grid<char>, start: Position, (d_row, d_col): (i32, i32), word: &[char]) -> bool {
    word.iter().enumerate().all(|(i, expected)| {
        let i = i as i32;
        grid.cell(start.offset(d_row * i, d_col * i)) == Some(expected)
    })
}

/// Occurrences of `word` in any of the 8 directions.
pub fn count_word(grid: &Grid<char>, word: &str) -> usize {
    let word: Vec<char> = word.chars().collect();
    if word.is_empty() {
        return 0;
    }
    grid.positions()
        .map(|start| {
            OFFSETS8
                .iter()
                .filter(|&&offset| reads(grid, start, offset, &word))
                .count()
        })
        .sum()
}

/// Cells holding `A` whose two diagonals both read `MAS` in either direction.
pub fn count_crosses(grid: &Grid<char>) -> usize {
    let is_mas = |a: Option<&char>, b: Option<&char>| {
        matches!((a, b), (Some('M'), Some('S')) | (Some('S'), Some('M')))
    };

    grid.cells()
        .filter(|&(_, &c)| c == 'A')
        .filter(|(pos, _)| {
            is_mas(grid.cell(pos.offset(-1, -1)), grid.cell(pos.offset(1, 1)))
                && is_mas(grid.cell(pos.offset(-1, 1)), grid.cell(pos.offset(1, -1)))
        })
        .count()
}
