//! Single-agent patrol simulation with loop detection.
//!
//! The walker moves straight ahead and turns clockwise in place whenever the
//! cell ahead is an obstacle. It stops when it steps off the grid (`Exited`)
//! or when it would repeat an exact (position, direction) pair (`Looped`).

use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::grid::{Direction, Grid, Position};

/// Configuration for the simulator
#[derive(Debug, Clone)]
pub struct PatrolConfig {
    /// Cells the walker cannot enter, in addition to `placed_obstacle`
    pub obstacles: Vec<char>,
    /// Marker written into a candidate cell by [`loop_obstructions`]. Always
    /// blocks, whether or not it is listed in `obstacles`.
    pub placed_obstacle: char,
    /// Run candidate simulations on the rayon pool
    pub parallel: bool,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            obstacles: vec!['#', 'O'],
            placed_obstacle: 'O',
            parallel: true,
        }
    }
}

impl PatrolConfig {
    pub fn is_obstacle(&self, cell: char) -> bool {
        cell == self.placed_obstacle || self.obstacles.contains(&cell)
    }
}

/// Simulator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatrolState {
    Running,
    /// Walked off the grid
    Exited,
    /// Repeated a (position, direction) pair, or is boxed in
    Looped,
}

/// Result of running a patrol to completion
#[derive(Debug, Clone)]
pub struct PatrolOutcome {
    pub state: PatrolState,
    /// Distinct positions occupied, start included
    pub visited: HashSet<Position>,
    /// Every tick, including the one that stepped off the grid
    pub ticks: usize,
}

/// A walker on a borrowed grid
pub struct Patrol<'a> {
    grid: &'a Grid<char>,
    config: &'a PatrolConfig,
    position: Position,
    direction: Direction,
    state: PatrolState,
    seen: HashSet<(Position, Direction)>,
    visited: HashSet<Position>,
    ticks: usize,
    turns_in_place: u8,
}

impl<'a> Patrol<'a> {
    pub fn new(
        grid: &'a Grid<char>,
        start: Position,
        direction: Direction,
        config: &'a PatrolConfig,
    ) -> Self {
        Self {
            grid,
            config,
            position: start,
            direction,
            state: PatrolState::Running,
            seen: HashSet::from([(start, direction)]),
            visited: HashSet::from([start]),
            ticks: 0,
            turns_in_place: 0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> PatrolState {
        self.state
    }

    /// Advance one tick. Terminal states are sticky.
    pub fn tick(&mut self) -> PatrolState {
        if self.state != PatrolState::Running {
            return self.state;
        }
        self.ticks += 1;

        let next = self.position.step(self.direction);
        match self.grid.cell(next) {
            None => {
                self.state = PatrolState::Exited;
            }
            Some(&cell) if self.config.is_obstacle(cell) => {
                self.direction = self.direction.turn_right();
                self.turns_in_place += 1;
                if self.turns_in_place >= 4 {
                    self.state = PatrolState::Looped;
                }
            }
            Some(_) => {
                self.position = next;
                self.turns_in_place = 0;
                self.visited.insert(next);
                if !self.seen.insert((next, self.direction)) {
                    self.state = PatrolState::Looped;
                }
            }
        }

        self.state
    }

    /// Tick until a terminal state.
    pub fn run(mut self) -> PatrolOutcome {
        while self.tick() == PatrolState::Running {}
        PatrolOutcome {
            state: self.state,
            visited: self.visited,
            ticks: self.ticks,
        }
    }
}

/// Locate the walker marker (`^`, `>`, `v` or `<`).
pub fn find_guard(grid: &Grid<char>) -> Result<(Position, Direction)> {
    grid.cells()
        .find_map(|(pos, &c)| Direction::from_arrow(c).map(|direction| (pos, direction)))
        .ok_or_else(|| Error::format(0, "no walker marker (^ > v <) in grid"))
}

/// Simulate with the default obstacle markers.
pub fn run(grid: &Grid<char>, start: Position, direction: Direction) -> Result<PatrolOutcome> {
    run_with(grid, start, direction, &PatrolConfig::default())
}

pub fn run_with(
    grid: &Grid<char>,
    start: Position,
    direction: Direction,
    config: &PatrolConfig,
) -> Result<PatrolOutcome> {
    grid.require_rectangular()?;
    grid.get(start)?;

    let outcome = Patrol::new(grid, start, direction, config).run();
    debug!(
        "patrol from {} facing {}: {:?} after {} ticks, {} cells",
        start,
        direction,
        outcome.state,
        outcome.ticks,
        outcome.visited.len()
    );
    Ok(outcome)
}

/// Positions where one extra obstacle makes the walker loop.
///
/// Candidates are the cells the walker visits on the unmodified grid, minus
/// the start. Each candidate is simulated from scratch on its own copy.
pub fn loop_obstructions(
    grid: &Grid<char>,
    start: Position,
    direction: Direction,
    config: &PatrolConfig,
) -> Result<Vec<Position>> {
    let base = run_with(grid, start, direction, config)?;
    let candidates: Vec<Position> = base
        .visited
        .iter()
        .copied()
        .filter(|&pos| pos != start)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let simulate = |pos: &Position| -> Result<Option<Position>> {
        let blocked = grid.with_cell(*pos, config.placed_obstacle)?;
        let outcome = Patrol::new(&blocked, start, direction, config).run();
        trace!("obstacle at {}: {:?}", pos, outcome.state);
        Ok((outcome.state == PatrolState::Looped).then_some(*pos))
    };

    let results: Vec<Option<Position>> = if config.parallel {
        candidates.par_iter().map(simulate).collect::<Result<_>>()?
    } else {
        candidates.iter().map(simulate).collect::<Result<_>>()?
    };

    let looping: Vec<Position> = results.into_iter().flatten().collect();
    info!(
        "{} of {} candidate obstacles cause a loop",
        looping.len(),
        candidates.len()
    );
    Ok(looping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {"
        ....#.....
        .........#
        ..........
        ..#.......
        .......#..
        ..........
        .#..^.....
        ........#.
        #.........
        ......#...
    "};

    fn grid(text: &str) -> Grid<char> {
        text.parse().unwrap()
    }

    #[test]
    fn test_find_guard() {
        let g = grid(SAMPLE);
        assert_eq!(find_guard(&g), Ok((Position::new(6, 4), Direction::Up)));
        assert!(matches!(find_guard(&grid("..#")), Err(Error::Format { .. })));
    }

    #[test]
    fn test_exit_after_distance_to_edge() {
        let g = grid("..........");
        let outcome = run(&g, Position::new(0, 0), Direction::Right).unwrap();
        assert_eq!(outcome.state, PatrolState::Exited);
        assert_eq!(outcome.ticks, 10);
        assert_eq!(outcome.visited.len(), 10);

        let outcome = run(&g, Position::new(0, 6), Direction::Left).unwrap();
        assert_eq!(outcome.ticks, 7);
    }

    #[test]
    fn test_turn_then_exit() {
        let g = grid("....#.....\n.........#\n..........");
        let outcome = run(&g, Position::new(0, 0), Direction::Right).unwrap();
        assert_eq!(outcome.state, PatrolState::Exited);
        let expected: HashSet<Position> = [(0, 0), (0, 1), (0, 2), (0, 3), (1, 3), (2, 3)]
            .into_iter()
            .map(|(r, c)| Position::new(r, c))
            .collect();
        assert_eq!(outcome.visited, expected);
        // 5 moves, 1 turn, 1 step off the edge
        assert_eq!(outcome.ticks, 7);
    }

    #[test]
    fn test_tick_by_tick() {
        let g = grid(".#\n..");
        let config = PatrolConfig::default();
        let mut patrol = Patrol::new(&g, Position::new(1, 1), Direction::Up, &config);
        assert_eq!(patrol.tick(), PatrolState::Running);
        assert_eq!(patrol.position(), Position::new(1, 1));
        assert_eq!(patrol.direction(), Direction::Right);
        assert_eq!(patrol.tick(), PatrolState::Exited);
        assert_eq!(patrol.tick(), PatrolState::Exited);
        assert_eq!(patrol.state(), PatrolState::Exited);
    }

    #[test]
    fn test_detects_loop() {
        let g = grid(indoc! {"
            .#..
            ...#
            #...
            ..#.
        "});
        let outcome = run(&g, Position::new(1, 1), Direction::Up).unwrap();
        assert_eq!(outcome.state, PatrolState::Looped);
        assert_eq!(outcome.visited.len(), 4);
    }

    #[test]
    fn test_boxed_in_walker_loops() {
        let g = grid(".#.\n#^#\n.#.");
        let outcome = run(&g, Position::new(1, 1), Direction::Up).unwrap();
        assert_eq!(outcome.state, PatrolState::Looped);
        assert_eq!(outcome.ticks, 4);
    }

    #[test]
    fn test_rejects_bad_start_and_ragged_grid() {
        let g = grid("...\n...");
        assert_eq!(
            run(&g, Position::new(5, 0), Direction::Up).unwrap_err(),
            Error::OutOfBounds { row: 5, col: 0 }
        );
        assert!(matches!(
            run(&grid("...\n."), Position::new(0, 0), Direction::Up),
            Err(Error::Format { line: 2, .. })
        ));
    }

    #[test]
    fn test_sample_visited_and_obstructions() {
        let g = grid(SAMPLE);
        let (start, direction) = find_guard(&g).unwrap();
        let outcome = run(&g, start, direction).unwrap();
        assert_eq!(outcome.state, PatrolState::Exited);
        assert_eq!(outcome.visited.len(), 41);

        let parallel = loop_obstructions(&g, start, direction, &PatrolConfig::default()).unwrap();
        assert_eq!(parallel.len(), 6);
        assert!(parallel.contains(&Position::new(6, 3)));

        let sequential = PatrolConfig {
            parallel: false,
            ..Default::default()
        };
        assert_eq!(
            loop_obstructions(&g, start, direction, &sequential).unwrap(),
            parallel
        );
    }

    #[test]
    fn test_custom_obstacles() {
        let g = grid("..X.");
        let config = PatrolConfig {
            obstacles: vec!['X'],
            ..Default::default()
        };
        let outcome = run_with(&g, Position::new(0, 0), Direction::Right, &config).unwrap();
        // Turns down at the X and leaves immediately.
        assert_eq!(outcome.visited.len(), 2);
        assert_eq!(outcome.state, PatrolState::Exited);
    }

    #[test]
    fn test_placed_obstacle_always_blocks() {
        let config = PatrolConfig {
            obstacles: vec!['X'],
            placed_obstacle: '@',
            ..Default::default()
        };
        assert!(config.is_obstacle('X'));
        assert!(config.is_obstacle('@'));
        assert!(!config.is_obstacle('O'));
        assert!(!config.is_obstacle('#'));

        let g = grid(".@..");
        let outcome = run_with(&g, Position::new(0, 0), Direction::Right, &config).unwrap();
        assert_eq!(outcome.visited.len(), 1);
        assert_eq!(outcome.ticks, 2);
    }
}
