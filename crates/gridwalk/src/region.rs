//! Flood-fill region discovery with perimeter and side accounting.
//!
//! Regions are grown breadth-first from row-major seeds. A neighbor joins the
//! region when `same_region(seed_value, neighbor_value)` holds and it has not
//! been claimed by an earlier region, so the result always partitions the grid.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use strum::VariantArray;
use tracing::{debug, trace};

use crate::grid::{Direction, Grid, Position};

/// A maximal connected set of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<T> {
    /// Value of the cell the flood fill started from
    pub value: T,
    pub members: BTreeSet<Position>,
    pub perimeter: usize,
    /// Distinct straight-line sides of the boundary
    pub sides: usize,
}

impl<T> Region<T> {
    pub fn area(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.members.contains(&pos)
    }

    /// Area times perimeter
    pub fn fence_cost(&self) -> usize {
        self.area() * self.perimeter
    }

    /// Area times number of sides
    pub fn bulk_cost(&self) -> usize {
        self.area() * self.sides
    }
}

/// Partition `grid` into regions under `same_region`.
pub fn find_regions<T, P>(grid: &Grid<T>, mut same_region: P) -> Vec<Region<T>>
where
    T: Clone,
    P: FnMut(&T, &T) -> bool,
{
    let mut assigned: HashSet<Position> = HashSet::new();
    let mut regions = Vec::new();

    for (seed, seed_value) in grid.cells() {
        if assigned.contains(&seed) {
            continue;
        }

        let mut members = BTreeSet::new();
        let mut queue = VecDeque::from([seed]);
        assigned.insert(seed);

        while let Some(pos) = queue.pop_front() {
            members.insert(pos);
            for next in grid.neighbors4(pos) {
                if assigned.contains(&next) {
                    continue;
                }
                let joins = grid
                    .cell(next)
                    .is_some_and(|value| same_region(seed_value, value));
                if joins {
                    assigned.insert(next);
                    queue.push_back(next);
                }
            }
        }

        let region = Region {
            value: seed_value.clone(),
            perimeter: perimeter(&members),
            sides: count_sides(&members),
            members,
        };
        trace!(
            "region at {} area={} perimeter={} sides={}",
            seed,
            region.area(),
            region.perimeter,
            region.sides
        );
        regions.push(region);
    }

    debug!("found {} regions", regions.len());
    regions
}

/// Regions of identical characters (garden plots).
pub fn find_plots(grid: &Grid<char>) -> Vec<Region<char>> {
    find_regions(grid, |a, b| a == b)
}

pub fn total_fence_cost<T>(regions: &[Region<T>]) -> usize {
    regions.iter().map(Region::fence_cost).sum()
}

pub fn total_bulk_cost<T>(regions: &[Region<T>]) -> usize {
    regions.iter().map(Region::bulk_cost).sum()
}

/// Each member contributes one edge per 4-neighbor outside the region.
fn perimeter(members: &BTreeSet<Position>) -> usize {
    members
        .iter()
        .map(|&pos| {
            Direction::VARIANTS
                .iter()
                .filter(|&&direction| !members.contains(&pos.step(direction)))
                .count()
        })
        .sum()
}

/// Count straight sides: boundary edges facing the same way are bucketed by
/// the coordinate that stays fixed along them, and each run of consecutive
/// cells within one bucket is one side.
fn count_sides(members: &BTreeSet<Position>) -> usize {
    let mut sides = 0;

    for &direction in Direction::VARIANTS {
        let mut buckets: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
        for &pos in members {
            if members.contains(&pos.step(direction)) {
                continue;
            }
            let (fixed, varying) = if direction.is_vertical() {
                (pos.row, pos.col)
            } else {
                (pos.col, pos.row)
            };
            buckets.entry(fixed).or_default().push(varying);
        }

        for run in buckets.values_mut() {
            run.sort_unstable();
            sides += 1 + run.windows(2).filter(|w| w[1] - w[0] > 1).count();
        }
    }

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use proptest::prelude::*;

    fn plots(text: &str) -> Vec<Region<char>> {
        let grid: Grid<char> = text.parse().unwrap();
        find_plots(&grid)
    }

    #[test]
    fn test_single_cell_perimeter() {
        let regions = plots("A");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].perimeter, 4);
        assert_eq!(regions[0].sides, 4);
    }

    #[test]
    fn test_straight_row_of_four() {
        let regions = plots("AAAA");
        assert_eq!(regions[0].area(), 4);
        assert_eq!(regions[0].perimeter, 10);
        assert_eq!(regions[0].sides, 4);
        assert_eq!(regions[0].bulk_cost(), 16);
    }

    #[test]
    fn test_small_garden() {
        let regions = plots(indoc! {"
            AAAA
            BBCD
            BBCC
            EEEC
        "});
        assert_eq!(regions.len(), 5);
        assert_eq!(total_fence_cost(&regions), 140);
        assert_eq!(total_bulk_cost(&regions), 80);
    }

    #[test]
    fn test_enclosed_regions() {
        let regions = plots(indoc! {"
            OOOOO
            OXOXO
            OOOOO
            OXOXO
            OOOOO
        "});
        assert_eq!(regions.len(), 5);
        assert_eq!(total_fence_cost(&regions), 772);
        assert_eq!(total_bulk_cost(&regions), 436);
    }

    #[test]
    fn test_larger_garden() {
        let regions = plots(indoc! {"
            RRRRIICCFF
            RRRRIICCCF
            VVRRRCCFFF
            VVRCCCJFFF
            VVVVCJJCFE
            VVIVCCJJEE
            VVIIICJJEE
            MIIIIIJJEE
            MIIISIJEEE
            MMMISSJEEE
        "});
        assert_eq!(regions.len(), 11);
        assert_eq!(total_fence_cost(&regions), 1930);
        assert_eq!(total_bulk_cost(&regions), 1206);
    }

    #[test]
    fn test_e_shape_sides() {
        let regions = plots(indoc! {"
            EEEEE
            EXXXX
            EEEEE
            EXXXX
            EEEEE
        "});
        assert_eq!(total_bulk_cost(&regions), 236);
    }

    #[test]
    fn test_diagonal_touch_sides() {
        let regions = plots(indoc! {"
            AAAAAA
            AAABBA
            AAABBA
            ABBAAA
            ABBAAA
            AAAAAA
        "});
        assert_eq!(total_bulk_cost(&regions), 368);
    }

    #[test]
    fn test_gapped_edges_are_separate_sides() {
        // Both top edges of the U face up on row 0 but are not adjacent.
        let regions = plots("A.A\nAAA");
        let u = regions.iter().find(|r| r.value == 'A').unwrap();
        assert_eq!(u.area(), 5);
        assert_eq!(u.sides, 8);
    }

    #[test]
    fn test_offset_edges_in_different_rows_do_not_merge() {
        // Up-facing edges at (0, 0) and (1, 1) have adjacent columns but sit
        // on different rows.
        let regions = plots("A.\nAA");
        let l = regions.iter().find(|r| r.value == 'A').unwrap();
        assert_eq!(l.sides, 6);
        assert_eq!(l.perimeter, 8);
    }

    #[test]
    fn test_custom_predicate() {
        // Digits within one of the seed join its region.
        let grid = Grid::parse(["1290"], |c| c.to_digit(10)).unwrap();
        let regions = find_regions(&grid, |seed, next| seed.abs_diff(*next) <= 1);
        let sizes: Vec<_> = regions.iter().map(Region::area).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
    }

    proptest! {
        #[test]
        fn regions_partition_the_grid(lines in prop::collection::vec("[ABC]{4}", 1..6)) {
            let grid = Grid::load(&lines).unwrap();
            let regions = find_plots(&grid);

            let mut seen = BTreeSet::new();
            for region in &regions {
                for &pos in &region.members {
                    prop_assert!(seen.insert(pos), "{} is in two regions", pos);
                }
            }
            let all: BTreeSet<_> = grid.positions().collect();
            prop_assert_eq!(seen, all);
        }

        #[test]
        fn perimeter_matches_neighbor_count(lines in prop::collection::vec("[AB]{5}", 1..6)) {
            let grid = Grid::load(&lines).unwrap();
            for region in find_plots(&grid) {
                let expected: usize = region
                    .members
                    .iter()
                    .map(|&pos| 4 - grid.neighbors4(pos).filter(|n| region.contains(*n)).count())
                    .sum();
                prop_assert_eq!(region.perimeter, expected);
                prop_assert!(region.sides <= region.perimeter);
            }
        }
    }
}
