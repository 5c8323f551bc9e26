//! Trailhead to peak reachability over a height map.
//!
//! The height map is turned into an explicit graph owned by the caller: one
//! node per traversable cell, and an edge A -> B whenever B is a 4-neighbor of
//! A exactly one unit higher. Counting is then plain breadth-first search.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::error::Result;
use crate::grid::{Grid, Position};

/// Height of cells that are not part of the map
pub const IMPASSABLE: u8 = u8::MAX;
pub const TRAILHEAD: u8 = 0;
pub const PEAK: u8 = 9;

/// `0`-`9` are heights, `.` is impassable.
pub fn parse_height(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        '.' => Some(IMPASSABLE),
        _ => None,
    }
}

pub fn load_height_map<I, S>(lines: I) -> Result<Grid<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Grid::parse(lines, parse_height)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailNode {
    pub position: Position,
    pub height: u8,
}

/// Uphill step graph over the traversable cells of a height map
#[derive(Debug, Clone)]
pub struct HeightGraph {
    graph: DiGraph<TrailNode, ()>,
    index: HashMap<Position, NodeIndex>,
}

impl HeightGraph {
    pub fn build(grid: &Grid<u8>) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for (pos, &height) in grid.cells() {
            if height <= PEAK {
                let node = graph.add_node(TrailNode {
                    position: pos,
                    height,
                });
                index.insert(pos, node);
            }
        }

        for (pos, &height) in grid.cells() {
            let Some(&from) = index.get(&pos) else {
                continue;
            };
            for next in grid.neighbors4(pos) {
                if let Some(&to) = index.get(&next) {
                    if graph[to].height == height + 1 {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        let built = Self { graph, index };
        debug!(
            "height graph: {} nodes, {} edges",
            built.node_count(),
            built.edge_count()
        );
        built
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Trailhead positions, row-major.
    pub fn trailheads(&self) -> impl Iterator<Item = Position> + '_ {
        self.graph
            .node_weights()
            .filter(|node| node.height == TRAILHEAD)
            .map(|node| node.position)
    }

    /// Number of distinct peaks reachable from `start` (its score).
    pub fn count_reachable_peaks(&self, start: Position) -> usize {
        self.reachable_peaks(start, false)
    }

    fn reachable_peaks(&self, start: Position, reverse: bool) -> usize {
        let Some(&start) = self.index.get(&start) else {
            return 0;
        };

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut peaks = 0;

        while let Some(node) = queue.pop_front() {
            if self.graph[node].height == PEAK {
                peaks += 1;
            }
            let mut next: Vec<NodeIndex> = self.graph.neighbors(node).collect();
            if reverse {
                next.reverse();
            }
            for child in next {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        peaks
    }

    /// Number of distinct uphill paths from `start` to any peak (its rating).
    /// Same search as [`Self::count_reachable_peaks`] without deduplication.
    pub fn count_distinct_trails(&self, start: Position) -> usize {
        let Some(&start) = self.index.get(&start) else {
            return 0;
        };

        let mut queue = VecDeque::from([start]);
        let mut trails = 0;

        while let Some(node) = queue.pop_front() {
            if self.graph[node].height == PEAK {
                trails += 1;
            }
            queue.extend(self.graph.neighbors(node));
        }

        trails
    }

    pub fn total_score(&self) -> usize {
        self.trailheads()
            .map(|head| self.count_reachable_peaks(head))
            .sum()
    }

    pub fn total_rating(&self) -> usize {
        self.trailheads()
            .map(|head| self.count_distinct_trails(head))
            .sum()
    }
}

/// Sum of trailhead scores for a height map.
pub fn total_score(grid: &Grid<u8>) -> usize {
    HeightGraph::build(grid).total_score()
}

/// Sum of trailhead ratings for a height map.
pub fn total_rating(grid: &Grid<u8>) -> usize {
    HeightGraph::build(grid).total_rating()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use indoc::indoc;

    fn graph(text: &str) -> HeightGraph {
        HeightGraph::build(&load_height_map(text.lines()).unwrap())
    }

    const SAMPLE: &str = indoc! {"
        89010123
        78121874
        87430965
        96549874
        45678903
        32019012
        01329801
        10456732
    "};

    #[test]
    fn test_parse_height_rejects_letters() {
        assert!(matches!(
            load_height_map(["01", "2a"]),
            Err(Error::Format { line: 2, .. })
        ));
        assert_eq!(parse_height('.'), Some(IMPASSABLE));
    }

    #[test]
    fn test_single_trail() {
        let g = graph("0123\n1234\n8765\n9876");
        assert_eq!(g.total_score(), 1);
        assert_eq!(g.count_reachable_peaks(Position::new(0, 0)), 1);
    }

    #[test]
    fn test_impassable_cells_split_trails() {
        let g = graph(indoc! {"
            ...0...
            ...1...
            ...2...
            6543456
            7.....7
            8.....8
            9.....9
        "});
        assert_eq!(g.total_score(), 2);
        assert_eq!(g.node_count(), 16);
    }

    #[test]
    fn test_sample_score_and_rating() {
        let g = graph(SAMPLE);
        assert_eq!(g.trailheads().count(), 9);
        assert_eq!(g.total_score(), 36);
        assert_eq!(g.total_rating(), 81);
    }

    #[test]
    fn test_rating_counts_paths() {
        let g = graph(indoc! {"
            .....0.
            ..4321.
            ..5..2.
            ..6543.
            ..7..4.
            ..8765.
            ..9....
        "});
        assert_eq!(g.count_distinct_trails(Position::new(0, 5)), 3);
        assert_eq!(g.count_reachable_peaks(Position::new(0, 5)), 1);

        let open = graph(indoc! {"
            012345
            123456
            234567
            345678
            4.6789
            56789.
        "});
        assert_eq!(open.total_rating(), 227);
    }

    #[test]
    fn test_score_ignores_neighbor_order() {
        let g = graph(SAMPLE);
        for head in g.trailheads() {
            assert_eq!(
                g.reachable_peaks(head, false),
                g.reachable_peaks(head, true),
                "trailhead {}",
                head
            );
        }
    }

    #[test]
    fn test_non_node_start_counts_nothing() {
        let g = graph("0.9");
        assert_eq!(g.count_reachable_peaks(Position::new(0, 1)), 0);
        assert_eq!(g.count_distinct_trails(Position::new(3, 3)), 0);
    }

    #[test]
    fn test_free_functions_match_graph() {
        let grid = load_height_map(SAMPLE.lines()).unwrap();
        assert_eq!(total_score(&grid), 36);
        assert_eq!(total_rating(&grid), 81);
    }
}
