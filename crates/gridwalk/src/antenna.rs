//! Antinodes of same-frequency antenna pairs.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::grid::{Grid, Position};

const EMPTY: char = '.';

/// Antenna positions grouped by frequency, row-major within a group.
pub fn antennas(grid: &Grid<char>) -> BTreeMap<char, Vec<Position>> {
    let mut groups: BTreeMap<char, Vec<Position>> = BTreeMap::new();
    for (pos, &c) in grid.cells() {
        if c != EMPTY {
            groups.entry(c).or_default().push(pos);
        }
    }
    groups
}

/// In-bounds points that sit on the line through two same-frequency antennas,
/// as far beyond one antenna as the other antenna is on the near side.
pub fn antinodes(grid: &Grid<char>) -> Result<BTreeSet<Position>> {
    grid.require_rectangular()?;

    let mut found = BTreeSet::new();
    for (frequency, positions) in antennas(grid) {
        for (&a, &b) in positions.iter().tuple_combinations() {
            let (d_row, d_col) = b.delta_to(a);
            for candidate in [a.offset(d_row, d_col), b.offset(-d_row, -d_col)] {
                if grid.in_bounds(candidate) {
                    found.insert(candidate);
                }
            }
        }
        debug!("frequency {:?}: {} antennas", frequency, positions.len());
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_single_pair() {
        let grid: Grid<char> = indoc! {"
            ..........
            ..........
            ..........
            ....a.....
            ..........
            .....a....
            ..........
            ..........
            ..........
            ..........
        "}
        .parse()
        .unwrap();
        let found = antinodes(&grid).unwrap();
        let expected: BTreeSet<_> = [Position::new(1, 3), Position::new(7, 6)].into();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_sample() {
        let grid: Grid<char> = indoc! {"
            ............
            ........0...
            .....0......
            .......0....
            ....0.......
            ......A.....
            ............
            ............
            ........A...
            .........A..
            ............
            ............
        "}
        .parse()
        .unwrap();
        assert_eq!(antennas(&grid).len(), 2);
        assert_eq!(antinodes(&grid).unwrap().len(), 14);
    }

    #[test]
    fn test_lone_antenna_has_no_antinodes() {
        let grid: Grid<char> = "..a..\n.....".parse().unwrap();
        assert!(antinodes(&grid).unwrap().is_empty());
    }
}
